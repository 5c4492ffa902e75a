// Headless replay: apply a JSON event script through one session.
//
// A script is a JSON array of events applied in order:
//
//   [{"canvas": {"points": [0, 3]}},
//    {"filter": "selected"},
//    {"grid": {"rows": [{"row": 0, "selected": true, "code": "Z"}]}}]
//
// Canvas payloads are in identity space; grid row positions refer to the
// filtered view in effect when that event is applied, exactly as they would
// coming from the live widgets.

use serde::Deserialize;

use codeplot_engine::error::SyncError;
use codeplot_engine::events::{CanvasEvent, GridSubmission};
use codeplot_engine::filter::FilterPredicate;
use codeplot_engine::session::Session;

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScriptEvent {
    Canvas(CanvasEvent),
    Grid(GridSubmission),
    Filter(String),
}

pub fn parse_script(text: &str) -> Result<Vec<ScriptEvent>, String> {
    serde_json::from_str(text).map_err(|e| format!("invalid event script: {}", e))
}

/// Totals across one replayed script.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReplayReport {
    /// Reconciliation passes run (canvas + grid events).
    pub passes: usize,
    /// Filter selector changes (not reconciliation passes).
    pub filter_changes: usize,
    /// Passes that changed the selection set.
    pub selection_changes: usize,
    /// Code patches applied.
    pub patched: usize,
    /// Successful persistence calls.
    pub persisted: usize,
    /// Persistence failures, in order of occurrence.
    pub warnings: Vec<String>,
}

/// Apply a script to a session. Stops at the first fatal error (a bad
/// identity aborts its pass and the rest of the script with it).
pub fn run(session: &mut Session, events: &[ScriptEvent]) -> Result<ReplayReport, String> {
    let mut report = ReplayReport::default();

    for event in events {
        match event {
            ScriptEvent::Canvas(canvas) => {
                let outcome = session
                    .handle_canvas_event(canvas)
                    .map_err(|e| e.to_string())?;
                report.passes += 1;
                if outcome.selection_changed {
                    report.selection_changes += 1;
                }
            }
            ScriptEvent::Grid(submission) => {
                let outcome = session
                    .handle_grid_event(submission)
                    .map_err(|e| e.to_string())?;
                report.passes += 1;
                report.patched += outcome.patched;
                if outcome.selection_changed {
                    report.selection_changes += 1;
                }
                if outcome.persisted {
                    report.persisted += 1;
                }
                if let Some(warning) = outcome.persist_error {
                    report.warnings.push(SyncError::Persist(warning).to_string());
                }
            }
            ScriptEvent::Filter(name) => {
                let predicate: FilterPredicate = name.parse()?;
                session.set_filter(predicate);
                report.filter_changes += 1;
            }
        }
    }
    Ok(report)
}
