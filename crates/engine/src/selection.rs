// Selection set - globally scoped record identities.
//
// Membership lives in identity space, never in filtered-view space, so
// changing the filter never changes what is selected; it only changes what
// is visible.

use rustc_hash::FxHashSet;

use crate::record::RecordId;

/// The authoritative selection shared by the canvas and the grid.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionSet {
    ids: FxHashSet<RecordId>,
}

impl SelectionSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, id: RecordId) -> bool {
        self.ids.contains(&id)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Flip membership. Selecting an already-selected identity deselects it
    /// (canvas click semantics).
    pub fn toggle(&mut self, id: RecordId) {
        if !self.ids.insert(id) {
            self.ids.remove(&id);
        }
    }

    /// Set membership to an absolute value (grid checkbox semantics:
    /// replace, not toggle). Returns true when membership actually changed.
    pub fn set(&mut self, id: RecordId, selected: bool) -> bool {
        if selected {
            self.ids.insert(id)
        } else {
            self.ids.remove(&id)
        }
    }

    /// Per-identity membership mask aligned to canonical store order, for
    /// marker coloring.
    pub fn mask(&self, record_count: usize) -> Vec<bool> {
        (0..record_count).map(|i| self.contains(RecordId(i))).collect()
    }

    /// Members in canonical order.
    pub fn sorted(&self) -> Vec<RecordId> {
        let mut ids: Vec<RecordId> = self.ids.iter().copied().collect();
        ids.sort_unstable();
        ids
    }
}
