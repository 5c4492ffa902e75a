//! External event payloads and the view models emitted back to the widgets.
//!
//! Events come in two spaces. Canvas payloads carry point indices, which are
//! identity-space because the canvas always plots the complete record set.
//! Grid payloads carry row positions, which are filtered-view-space and must
//! be translated before use. The view models are what the renderers consume
//! after each reconciliation pass.

use serde::{Deserialize, Serialize};

use crate::record::RecordId;

/// Canvas click/select payload.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CanvasEvent {
    /// Point indices, identity space.
    pub points: Vec<usize>,
}

impl CanvasEvent {
    pub fn new(points: Vec<usize>) -> Self {
        Self { points }
    }
}

/// One edited grid row, as submitted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GridRow {
    /// Row position within the filtered view that was on screen.
    pub row: usize,
    /// Select checkbox value.
    pub selected: bool,
    /// Code cell value (possibly edited).
    pub code: String,
}

/// Snapshot of the grid on submission, in filtered-view order.
///
/// One submission carries both the checkbox column and the editable code
/// column; the orchestrator decides which reconcilers run off it.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct GridSubmission {
    pub rows: Vec<GridRow>,
}

/// What the canvas renderer needs after a pass. Coordinates are static
/// after the initial plot; only colors and hover text update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CanvasViewModel {
    /// Selected mask aligned to canonical store order.
    pub selected: Vec<bool>,
    /// Current `code` per record, shown on hover. Follows edits.
    pub hover_codes: Vec<String>,
}

/// One grid row as rendered.
///
/// `selected` renders as an editable checkbox, `modified` as a read-only
/// indicator; `x1`, `x2`, and `source` are display-only columns.
#[derive(Debug, Clone, PartialEq)]
pub struct GridRowView {
    pub id: RecordId,
    pub selected: bool,
    pub modified: bool,
    pub code: String,
    pub x1: f64,
    pub x2: f64,
    pub source: String,
}

/// What the grid renderer needs after a pass, in filtered-view order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct GridViewModel {
    pub rows: Vec<GridRowView>,
}

/// Result of one reconciliation pass, emitted on the `Reconciling -> Idle`
/// transition.
#[derive(Debug, Clone, PartialEq)]
pub struct SyncOutcome {
    pub canvas: CanvasViewModel,
    pub grid: GridViewModel,
    /// The pass changed the selection set.
    pub selection_changed: bool,
    /// Code patches applied (grid passes only).
    pub patched: usize,
    /// Persist ran and succeeded this pass.
    pub persisted: bool,
    /// Persist failure, surfaced as a warning. In-memory state is intact
    /// and the next edit pass retries.
    pub persist_error: Option<String>,
}
