// Canonical record model.
//
// A record's identity is its position in the canonical store at load time.
// Identities are never reused or reassigned; only `code` is mutable.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Stable positional identity of a record in the canonical store.
///
/// Canvas point indices are in this space directly (the canvas always plots
/// the full set); grid row positions are NOT and must be translated through
/// the current filtered view first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(pub usize);

impl RecordId {
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// One labeled point: an editable `code`, fixed canvas coordinates, and a
/// read-only source label.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    /// The one editable field.
    pub code: String,
    /// Canvas x coordinate. Fixed after load.
    pub x1: f64,
    /// Canvas y coordinate. Fixed after load.
    pub x2: f64,
    /// Where the record came from. Read-only in the grid.
    pub source: String,
}

impl Record {
    pub fn new(code: impl Into<String>, x1: f64, x2: f64, source: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            x1,
            x2,
            source: source.into(),
        }
    }
}
