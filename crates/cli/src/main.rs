// codeplot CLI - headless scatter/grid sync sessions

use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};

use codeplot_cli::replay;
use codeplot_config::settings::Settings;
use codeplot_engine::error::SyncError;
use codeplot_engine::filter::FilterPredicate;
use codeplot_engine::session::{NoPersist, Session};

pub const EXIT_SUCCESS: u8 = 0;
pub const EXIT_ERROR: u8 = 1;
pub const EXIT_USAGE: u8 = 2;
pub const EXIT_IO_ERROR: u8 = 3;

#[derive(Parser)]
#[command(name = "codeplot")]
#[command(about = "Scatter/grid record synchronization (headless)")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Load a record table and print it
    Inspect {
        /// Record table (.xlsx/.xls/.ods or .csv/.tsv); defaults to the
        /// data_file configured in settings
        file: Option<PathBuf>,
    },

    /// Print the rows visible under a filter predicate
    Filter {
        file: Option<PathBuf>,

        /// all, selected, or modified
        #[arg(long, default_value = "all")]
        by: String,
    },

    /// Apply a JSON event script through one session and report the outcome
    #[command(after_help = "\
Examples:
  codeplot replay points.xlsx --events session.json
  codeplot replay points.csv --events session.json --save")]
    Replay {
        file: Option<PathBuf>,

        /// Event script: a JSON array of canvas/grid/filter events
        #[arg(long)]
        events: PathBuf,

        /// Write edits back to the record table
        #[arg(long)]
        save: bool,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let code = match cli.command {
        Commands::Inspect { file } => cmd_inspect(file),
        Commands::Filter { file, by } => cmd_filter(file, &by),
        Commands::Replay { file, events, save } => cmd_replay(file, &events, save),
    };
    ExitCode::from(code)
}

/// Resolve the record table path: explicit argument, or settings fallback.
fn resolve_file(file: Option<PathBuf>) -> Result<PathBuf, String> {
    if let Some(path) = file {
        return Ok(path);
    }
    Settings::load()
        .data_file
        .ok_or_else(|| "no file given and no data_file in settings".to_string())
}

fn cmd_inspect(file: Option<PathBuf>) -> u8 {
    let path = match resolve_file(file) {
        Ok(p) => p,
        Err(e) => return usage_error(&e),
    };
    let records = match codeplot_io::load_records(&path) {
        Ok(r) => r,
        Err(e) => return load_error(&path, e),
    };

    println!("{:>5}  {:<16} {:>10} {:>10}  {}", "id", "code", "x1", "x2", "source");
    for (i, record) in records.iter().enumerate() {
        println!(
            "{:>5}  {:<16} {:>10} {:>10}  {}",
            i, record.code, record.x1, record.x2, record.source
        );
    }
    println!("{} records", records.len());
    EXIT_SUCCESS
}

fn cmd_filter(file: Option<PathBuf>, by: &str) -> u8 {
    let predicate: FilterPredicate = match by.parse() {
        Ok(p) => p,
        Err(e) => return usage_error(&e),
    };
    let path = match resolve_file(file) {
        Ok(p) => p,
        Err(e) => return usage_error(&e),
    };
    let records = match codeplot_io::load_records(&path) {
        Ok(r) => r,
        Err(e) => return load_error(&path, e),
    };

    let mut session = Session::in_memory(records);
    let grid = session.set_filter(predicate);
    for row in &grid.rows {
        let flag = if row.modified { "M" } else { " " };
        println!("{:>5} {} {:<16} {}", row.id.index(), flag, row.code, row.source);
    }
    println!("{} of {} records ({})", grid.rows.len(), session.store().len(), predicate);
    EXIT_SUCCESS
}

fn cmd_replay(file: Option<PathBuf>, events_path: &PathBuf, save: bool) -> u8 {
    let path = match resolve_file(file) {
        Ok(p) => p,
        Err(e) => return usage_error(&e),
    };
    let records = match codeplot_io::load_records(&path) {
        Ok(r) => r,
        Err(e) => return load_error(&path, e),
    };
    let script = match fs::read_to_string(events_path) {
        Ok(text) => text,
        Err(e) => return io_error(events_path, &e.to_string()),
    };
    let events = match replay::parse_script(&script) {
        Ok(events) => events,
        Err(e) => return usage_error(&e),
    };

    let persist = if save {
        codeplot_io::open_persister(&path)
    } else {
        Box::new(NoPersist)
    };
    let default_filter = Settings::load()
        .default_filter
        .parse()
        .unwrap_or(FilterPredicate::All);

    let mut session = Session::new(records, persist);
    session.set_filter(default_filter);

    let report = match replay::run(&mut session, &events) {
        Ok(report) => report,
        Err(e) => {
            eprintln!("error: {}", e);
            return EXIT_ERROR;
        }
    };

    println!(
        "{} passes, {} filter changes, {} selection changes, {} patches, {} saves",
        report.passes,
        report.filter_changes,
        report.selection_changes,
        report.patched,
        report.persisted
    );
    for warning in &report.warnings {
        eprintln!("warning: {}", warning);
    }
    println!("selected: {}", session.selection().len());

    let modified = session.modified_records();
    println!("modified entries: {}", modified.len());
    for (id, record) in modified {
        let original = session.store().baseline(id).unwrap_or_default();
        println!("{:>5}  {} (was {})", id.index(), record.code, original);
    }
    EXIT_SUCCESS
}

fn usage_error(message: &str) -> u8 {
    eprintln!("error: {}", message);
    EXIT_USAGE
}

fn io_error(path: &std::path::Path, message: &str) -> u8 {
    eprintln!("error: {}: {}", path.display(), message);
    EXIT_IO_ERROR
}

/// Load failure is fatal at session start: no default data.
fn load_error(path: &std::path::Path, message: String) -> u8 {
    eprintln!("error: {}: {}", path.display(), SyncError::Load(message));
    EXIT_IO_ERROR
}
