// Selection and edit reconciliation.
//
// Exactly one external event drives one pass; the orchestrator decides
// which reconciler(s) run. Canvas payloads are compared against the
// last-seen snapshot so a re-render echo is never mistaken for new user
// input. Translation errors abort a pass before any mutation: no partial
// application.

use crate::error::SyncError;
use crate::events::{CanvasEvent, GridSubmission};
use crate::filter::FilteredView;
use crate::record::RecordId;
use crate::selection::SelectionSet;
use crate::store::RecordStore;

/// Merges selection events from both widgets into the authoritative set.
#[derive(Debug, Clone, Default)]
pub struct SelectionReconciler {
    /// Last canvas payload actually applied. Equality against this is the
    /// feedback-loop guard: re-rendering the canvas after a pass delivers
    /// the same payload again, and that must be a no-op.
    last_canvas: CanvasEvent,
}

impl SelectionReconciler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply a canvas click/select payload by toggling each listed
    /// identity. Returns false when the payload is an echo of the last
    /// applied one (guard hit, nothing done).
    pub fn apply_canvas(
        &mut self,
        event: &CanvasEvent,
        selection: &mut SelectionSet,
        record_count: usize,
    ) -> Result<bool, SyncError> {
        if *event == self.last_canvas {
            return Ok(false);
        }

        // Validate before mutating: an unknown point index aborts the pass
        // with no partial toggles and leaves the snapshot unchanged.
        for &point in &event.points {
            if point >= record_count {
                return Err(SyncError::UnknownIdentity {
                    index: point,
                    len: record_count,
                });
            }
        }

        for &point in &event.points {
            selection.toggle(RecordId(point));
        }
        self.last_canvas = event.clone();
        Ok(true)
    }

    /// Apply the checkbox column of a grid submission. Row positions are
    /// translated through the current filtered view; membership is replaced
    /// with the checkbox value (absolute), not toggled. Returns true when
    /// any membership actually changed.
    pub fn apply_grid(
        &mut self,
        submission: &GridSubmission,
        view: &FilteredView,
        selection: &mut SelectionSet,
    ) -> Result<bool, SyncError> {
        let mut resolved = Vec::with_capacity(submission.rows.len());
        for row in &submission.rows {
            resolved.push((view.row_to_id(row.row)?, row.selected));
        }

        let mut changed = false;
        for (id, selected) in resolved {
            if selection.set(id, selected) {
                changed = true;
            }
        }
        Ok(changed)
    }

    /// The payload the guard currently compares against.
    pub fn last_canvas(&self) -> &CanvasEvent {
        &self.last_canvas
    }
}

/// Result of one edit application.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EditOutcome {
    /// Rows whose submitted code differed from the store and were patched.
    pub patched: usize,
    /// The modified-flag array differs from the previous pass.
    pub flags_changed: bool,
}

/// Merges grid `code` edits into the Record Store.
#[derive(Debug, Clone, Default)]
pub struct EditReconciler {
    /// Modified flags after the previous pass.
    last_flags: Vec<bool>,
}

impl EditReconciler {
    pub fn new(store: &RecordStore) -> Self {
        Self {
            last_flags: store.modified_flags(),
        }
    }

    /// Apply the code column of a grid submission. Only rows present in the
    /// submission (and therefore visible under the active filter) are
    /// touched; everything hidden is untouched by construction.
    pub fn apply(
        &mut self,
        submission: &GridSubmission,
        view: &FilteredView,
        store: &mut RecordStore,
    ) -> Result<EditOutcome, SyncError> {
        // Validate every translation before the first patch.
        let mut resolved = Vec::with_capacity(submission.rows.len());
        for row in &submission.rows {
            resolved.push((view.row_to_id(row.row)?, row.code.as_str()));
        }

        let mut patched = 0;
        for (id, code) in resolved {
            let current = store.get(id).map(|r| r.code.as_str());
            if current != Some(code) {
                store.patch_code(id, code)?;
                patched += 1;
            }
        }

        let flags = store.modified_flags();
        let flags_changed = flags != self.last_flags;
        self.last_flags = flags;
        Ok(EditOutcome {
            patched,
            flags_changed,
        })
    }
}
