// Filter View - the ordered identity subset visible in the grid.
//
// Row positions index into this sequence and are meaningless outside it.
// Every grid row must be translated through `row_to_id` before touching the
// store or the selection set; storing or comparing raw row positions against
// identities is exactly the stale-index bug this layer exists to prevent.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::SyncError;
use crate::record::RecordId;
use crate::selection::SelectionSet;
use crate::store::RecordStore;

/// Grid filter predicates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FilterPredicate {
    /// Every record.
    #[default]
    All,
    /// Records in the selection set.
    Selected,
    /// Records whose `code` differs from baseline.
    Modified,
}

impl fmt::Display for FilterPredicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::All => "all",
            Self::Selected => "selected",
            Self::Modified => "modified",
        };
        f.write_str(name)
    }
}

impl FromStr for FilterPredicate {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "all" => Ok(Self::All),
            "selected" => Ok(Self::Selected),
            "modified" => Ok(Self::Modified),
            other => Err(format!(
                "unknown filter '{other}' (expected all, selected, or modified)"
            )),
        }
    }
}

/// Ordered subset of identities satisfying the active predicate.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilteredView {
    ids: Vec<RecordId>,
}

impl FilteredView {
    /// Pure recomputation from current state. Preserves canonical relative
    /// order (stable filter, not a re-sort); deterministic for unchanged
    /// inputs.
    pub fn compute(
        store: &RecordStore,
        selection: &SelectionSet,
        predicate: FilterPredicate,
    ) -> Self {
        let ids = store
            .ids()
            .filter(|&id| match predicate {
                FilterPredicate::All => true,
                FilterPredicate::Selected => selection.contains(id),
                FilterPredicate::Modified => store.is_modified(id),
            })
            .collect();
        Self { ids }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    /// Visible identities in view order.
    pub fn ids(&self) -> &[RecordId] {
        &self.ids
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Translate a grid row position to a canonical identity. The only
    /// sanctioned row→identity conversion.
    pub fn row_to_id(&self, row: usize) -> Result<RecordId, SyncError> {
        self.ids
            .get(row)
            .copied()
            .ok_or(SyncError::UnknownIdentity {
                index: row,
                len: self.ids.len(),
            })
    }
}
