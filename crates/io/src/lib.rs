// File I/O - the Load and Persist collaborators for the sync engine.
//
// Records round-trip as rows with columns `code, x1, x2, source` plus a
// header row. Format is chosen by file extension.

use std::path::Path;

use codeplot_engine::record::Record;
use codeplot_engine::session::Persist;

pub mod csv;
pub mod xlsx;

/// Load the record table, picking the reader by extension.
/// `.csv`/`.tsv` go through the CSV reader; everything else is treated as
/// an Excel family file (xlsx, xls, xlsb, ods).
pub fn load_records(path: &Path) -> Result<Vec<Record>, String> {
    match extension(path).as_deref() {
        Some("csv") => csv::load(path, b','),
        Some("tsv") => csv::load(path, b'\t'),
        _ => xlsx::load(path),
    }
}

/// Persist collaborator writing back to the same path, matching the loader
/// choice above.
pub fn open_persister(path: &Path) -> Box<dyn Persist> {
    match extension(path).as_deref() {
        Some("csv") => Box::new(csv::CsvFile::new(path, b',')),
        Some("tsv") => Box::new(csv::CsvFile::new(path, b'\t')),
        _ => Box::new(xlsx::XlsxFile::new(path)),
    }
}

fn extension(path: &Path) -> Option<String> {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
}
