//! Sync Orchestrator - one reconciliation pass per external event.
//!
//! The session is the single owner of all sync state: the record store, the
//! selection set, the active filter, both reconcilers, and the persistence
//! collaborator. Each external event runs one synchronous pass to
//! completion; the `Reconciling -> Idle` transition recomputes the filtered
//! view and both view models exactly once, and nothing inside a pass can
//! synthesize a new canvas or grid event.

use crate::error::SyncError;
use crate::events::{
    CanvasEvent, CanvasViewModel, GridRowView, GridSubmission, GridViewModel, SyncOutcome,
};
use crate::filter::{FilterPredicate, FilteredView};
use crate::reconcile::{EditReconciler, SelectionReconciler};
use crate::record::{Record, RecordId};
use crate::selection::SelectionSet;
use crate::store::RecordStore;

/// Persistence collaborator. Invoked synchronously at the end of an edit
/// pass when the store is dirty; failure is surfaced in the pass outcome,
/// never retried automatically, and never invalidates in-memory state.
pub trait Persist {
    fn save(&mut self, records: &[Record]) -> Result<(), String>;
}

/// Discards writes. For sessions without a backing file.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoPersist;

impl Persist for NoPersist {
    fn save(&mut self, _records: &[Record]) -> Result<(), String> {
        Ok(())
    }
}

/// Orchestrator state. `Reconciling` spans exactly one pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncState {
    Idle,
    Reconciling,
}

/// One interactive session over one record set.
pub struct Session {
    store: RecordStore,
    selection: SelectionSet,
    predicate: FilterPredicate,
    view: FilteredView,
    selection_rec: SelectionReconciler,
    edit_rec: EditReconciler,
    persist: Box<dyn Persist>,
    state: SyncState,
}

impl Session {
    pub fn new(records: Vec<Record>, persist: Box<dyn Persist>) -> Self {
        let store = RecordStore::new(records);
        let selection = SelectionSet::new();
        let predicate = FilterPredicate::All;
        let view = FilteredView::compute(&store, &selection, predicate);
        let edit_rec = EditReconciler::new(&store);
        Self {
            store,
            selection,
            predicate,
            view,
            selection_rec: SelectionReconciler::new(),
            edit_rec,
            persist,
            state: SyncState::Idle,
        }
    }

    /// Session with no persistence collaborator.
    pub fn in_memory(records: Vec<Record>) -> Self {
        Self::new(records, Box::new(NoPersist))
    }

    pub fn store(&self) -> &RecordStore {
        &self.store
    }

    pub fn selection(&self) -> &SelectionSet {
        &self.selection
    }

    pub fn predicate(&self) -> FilterPredicate {
        self.predicate
    }

    /// The filtered view as of the last completed pass or filter change.
    /// Grid row positions in the next submission refer to this sequence.
    pub fn view(&self) -> &FilteredView {
        &self.view
    }

    pub fn state(&self) -> SyncState {
        self.state
    }

    /// Records whose `code` differs from baseline, in canonical order.
    pub fn modified_records(&self) -> Vec<(RecordId, &Record)> {
        self.store.modified_records()
    }

    /// Canvas interaction: Selection Reconciler only.
    pub fn handle_canvas_event(&mut self, event: &CanvasEvent) -> Result<SyncOutcome, SyncError> {
        self.begin_pass();
        match self
            .selection_rec
            .apply_canvas(event, &mut self.selection, self.store.len())
        {
            Ok(applied) => Ok(self.finish_pass(applied, 0, false, None)),
            Err(e) => {
                self.state = SyncState::Idle;
                Err(e)
            }
        }
    }

    /// Grid submission: Edit Reconciler, then the Selection Reconciler for
    /// the checkbox column. One submission may drive both since grid rows
    /// carry both an editable code and a checkbox.
    pub fn handle_grid_event(
        &mut self,
        submission: &GridSubmission,
    ) -> Result<SyncOutcome, SyncError> {
        self.begin_pass();
        match self.run_grid_pass(submission) {
            Ok(outcome) => Ok(outcome),
            Err(e) => {
                self.state = SyncState::Idle;
                Err(e)
            }
        }
    }

    fn run_grid_pass(&mut self, submission: &GridSubmission) -> Result<SyncOutcome, SyncError> {
        // Both reconcilers translate through the view the submission was
        // made against; it is only recomputed when the pass finishes.
        let edit = self
            .edit_rec
            .apply(submission, &self.view, &mut self.store)?;
        let selection_changed =
            self.selection_rec
                .apply_grid(submission, &self.view, &mut self.selection)?;

        // One persistence call per pass, full record set, only when
        // something was actually patched.
        let mut persisted = false;
        let mut persist_error = None;
        if self.store.is_dirty() {
            match self.persist.save(self.store.get_all()) {
                Ok(()) => {
                    persisted = true;
                    self.store.clear_dirty();
                }
                // Store stays dirty so the next edit pass retries
                Err(msg) => persist_error = Some(msg),
            }
        }

        Ok(self.finish_pass(selection_changed, edit.patched, persisted, persist_error))
    }

    /// Filter change is not a reconciliation pass: no reconciler runs and
    /// the selection set is untouched, even for identities that drop out of
    /// view. Only the view and its view model are recomputed.
    pub fn set_filter(&mut self, predicate: FilterPredicate) -> GridViewModel {
        self.predicate = predicate;
        self.view = FilteredView::compute(&self.store, &self.selection, self.predicate);
        self.grid_view_model()
    }

    pub fn canvas_view_model(&self) -> CanvasViewModel {
        CanvasViewModel {
            selected: self.selection.mask(self.store.len()),
            hover_codes: self.store.get_all().iter().map(|r| r.code.clone()).collect(),
        }
    }

    pub fn grid_view_model(&self) -> GridViewModel {
        let rows = self
            .view
            .ids()
            .iter()
            .filter_map(|&id| {
                self.store.get(id).map(|record| GridRowView {
                    id,
                    selected: self.selection.contains(id),
                    modified: self.store.is_modified(id),
                    code: record.code.clone(),
                    x1: record.x1,
                    x2: record.x2,
                    source: record.source.clone(),
                })
            })
            .collect();
        GridViewModel { rows }
    }

    fn begin_pass(&mut self) {
        debug_assert_eq!(
            self.state,
            SyncState::Idle,
            "reconciliation passes never overlap"
        );
        self.state = SyncState::Reconciling;
    }

    /// `Reconciling -> Idle`: recompute the filtered view and both view
    /// models exactly once per accepted event.
    fn finish_pass(
        &mut self,
        selection_changed: bool,
        patched: usize,
        persisted: bool,
        persist_error: Option<String>,
    ) -> SyncOutcome {
        self.view = FilteredView::compute(&self.store, &self.selection, self.predicate);
        let outcome = SyncOutcome {
            canvas: self.canvas_view_model(),
            grid: self.grid_view_model(),
            selection_changed,
            patched,
            persisted,
            persist_error,
        };
        self.state = SyncState::Idle;
        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::GridRow;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn records() -> Vec<Record> {
        vec![
            Record::new("A", 1.0, 1.0, "manual"),
            Record::new("B", 2.0, 2.0, "manual"),
        ]
    }

    fn grid(rows: Vec<(usize, bool, &str)>) -> GridSubmission {
        GridSubmission {
            rows: rows
                .into_iter()
                .map(|(row, selected, code)| GridRow {
                    row,
                    selected,
                    code: code.to_string(),
                })
                .collect(),
        }
    }

    /// Records every save for inspection; optionally fails.
    #[derive(Default)]
    struct SpyPersist {
        saves: Rc<RefCell<Vec<Vec<Record>>>>,
        fail: bool,
    }

    impl Persist for SpyPersist {
        fn save(&mut self, records: &[Record]) -> Result<(), String> {
            if self.fail {
                return Err("disk full".to_string());
            }
            self.saves.borrow_mut().push(records.to_vec());
            Ok(())
        }
    }

    #[test]
    fn test_select_filter_edit_persist_scenario() {
        let saves = Rc::new(RefCell::new(Vec::new()));
        let mut session = Session::new(
            records(),
            Box::new(SpyPersist {
                saves: saves.clone(),
                fail: false,
            }),
        );

        // Canvas selects point 0
        let outcome = session
            .handle_canvas_event(&CanvasEvent::new(vec![0]))
            .unwrap();
        assert!(outcome.selection_changed);
        assert_eq!(outcome.canvas.selected, vec![true, false]);

        // Filter to Selected: view is [0]
        session.set_filter(FilterPredicate::Selected);
        assert_eq!(session.view().ids(), &[RecordId(0)]);

        // Grid edits row 0's code to "Z"
        let outcome = session
            .handle_grid_event(&grid(vec![(0, true, "Z")]))
            .unwrap();
        assert_eq!(outcome.patched, 1);
        assert!(outcome.persisted);
        assert_eq!(session.store().get(RecordId(0)).unwrap().code, "Z");
        assert_eq!(session.store().modified_flags(), vec![true, false]);

        // Persist received the full two-record set, once
        let saves = saves.borrow();
        assert_eq!(saves.len(), 1);
        assert_eq!(saves[0].len(), 2);
        assert_eq!(saves[0][0].code, "Z");
        assert_eq!(saves[0][1].code, "B");
    }

    #[test]
    fn test_empty_modified_view_empty_submission() {
        let mut session = Session::in_memory(records());
        session.set_filter(FilterPredicate::Modified);
        assert!(session.view().is_empty());

        let outcome = session.handle_grid_event(&GridSubmission::default()).unwrap();
        assert_eq!(outcome.patched, 0);
        assert!(!outcome.persisted);
        assert!(outcome.grid.rows.is_empty());
    }

    #[test]
    fn test_uncheck_under_selected_filter_shrinks_view() {
        let mut session = Session::in_memory(records());
        session
            .handle_canvas_event(&CanvasEvent::new(vec![0, 1]))
            .unwrap();
        session.set_filter(FilterPredicate::Selected);
        assert_eq!(session.view().ids(), &[RecordId(0), RecordId(1)]);

        // Uncheck row 0 (identity 0); row 1 keeps its state
        let outcome = session
            .handle_grid_event(&grid(vec![(0, false, "A"), (1, true, "B")]))
            .unwrap();
        assert!(outcome.selection_changed);
        assert!(!session.selection().contains(RecordId(0)));
        assert_eq!(session.view().ids(), &[RecordId(1)]);
        assert_eq!(outcome.grid.rows.len(), 1);
        assert_eq!(outcome.grid.rows[0].id, RecordId(1));
    }

    #[test]
    fn test_canvas_echo_is_idempotent() {
        let mut session = Session::in_memory(records());
        let event = CanvasEvent::new(vec![0]);

        let first = session.handle_canvas_event(&event).unwrap();
        assert!(first.selection_changed);

        let second = session.handle_canvas_event(&event).unwrap();
        assert!(!second.selection_changed);
        assert_eq!(first.canvas, second.canvas);
    }

    #[test]
    fn test_filter_change_never_mutates_selection() {
        let mut session = Session::in_memory(records());
        session
            .handle_canvas_event(&CanvasEvent::new(vec![1]))
            .unwrap();

        session.set_filter(FilterPredicate::Modified);
        assert!(session.view().is_empty());
        // Identity 1 dropped out of view but stays selected
        assert!(session.selection().contains(RecordId(1)));

        session.set_filter(FilterPredicate::Selected);
        assert_eq!(session.view().ids(), &[RecordId(1)]);
    }

    #[test]
    fn test_persist_failure_is_a_warning_and_retried_on_next_edit() {
        let mut session = Session::new(records(), Box::new(SpyPersist {
            saves: Rc::new(RefCell::new(Vec::new())),
            fail: true,
        }));

        let outcome = session
            .handle_grid_event(&grid(vec![(0, false, "Z")]))
            .unwrap();
        assert!(!outcome.persisted);
        assert_eq!(outcome.persist_error.as_deref(), Some("disk full"));
        // In-memory store is still authoritative
        assert_eq!(session.store().get(RecordId(0)).unwrap().code, "Z");
        assert!(session.store().is_dirty());

        // The next edit pass retries the write
        let outcome = session
            .handle_grid_event(&grid(vec![(0, false, "Z")]))
            .unwrap();
        assert_eq!(outcome.patched, 0);
        assert!(outcome.persist_error.is_some());
    }

    #[test]
    fn test_edit_error_returns_session_to_idle() {
        let mut session = Session::in_memory(records());
        let err = session
            .handle_grid_event(&grid(vec![(9, false, "Z")]))
            .unwrap_err();
        assert_eq!(err, SyncError::UnknownIdentity { index: 9, len: 2 });
        assert_eq!(session.state(), SyncState::Idle);

        // The session still accepts events
        session
            .handle_canvas_event(&CanvasEvent::new(vec![0]))
            .unwrap();
    }

    #[test]
    fn test_hover_codes_follow_edits() {
        let mut session = Session::in_memory(records());
        let outcome = session
            .handle_grid_event(&grid(vec![(0, false, "edited")]))
            .unwrap();
        assert_eq!(outcome.canvas.hover_codes, vec!["edited", "B"]);
    }

    #[test]
    fn test_grid_view_model_marks_modified_rows() {
        let mut session = Session::in_memory(records());
        session
            .handle_grid_event(&grid(vec![(1, false, "Q")]))
            .unwrap();

        let vm = session.grid_view_model();
        assert!(!vm.rows[0].modified);
        assert!(vm.rows[1].modified);
        assert_eq!(vm.rows[1].code, "Q");
        assert_eq!(session.modified_records().len(), 1);
    }
}
