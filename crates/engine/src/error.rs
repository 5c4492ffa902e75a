use std::fmt;

/// Errors raised by the sync engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncError {
    /// A row-position or point-index translation targeted a nonexistent
    /// record. Fatal to the reconciliation pass that raised it; the pass is
    /// aborted before any partial application.
    UnknownIdentity { index: usize, len: usize },
    /// The external tabular source could not be read at session start.
    /// Fatal: there is no default data.
    Load(String),
    /// The persistence collaborator failed. Non-fatal; in-memory state is
    /// retained and the next edit pass retries the write.
    Persist(String),
}

impl fmt::Display for SyncError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownIdentity { index, len } => {
                write!(f, "unknown record identity {index} (store has {len} records)")
            }
            Self::Load(msg) => write!(f, "load failed: {msg}"),
            Self::Persist(msg) => write!(f, "persist failed: {msg}"),
        }
    }
}

impl std::error::Error for SyncError {}
