// Excel load/persist for the record table (xlsx, xls, xlsb, ods in; xlsx out).
//
// Load reads the first sheet and locates columns by header name, so extra
// columns and reordered columns are tolerated. Persist overwrites the whole
// file with the full record set in the canonical column order.

use std::path::{Path, PathBuf};

use calamine::{open_workbook_auto, Data, Reader, Sheets};
use rust_xlsxwriter::Workbook;

use codeplot_engine::record::Record;
use codeplot_engine::session::Persist;

const COLUMNS: [&str; 4] = ["code", "x1", "x2", "source"];

/// Load records from the first worksheet. The header row is required.
pub fn load(path: &Path) -> Result<Vec<Record>, String> {
    let mut workbook: Sheets<_> = open_workbook_auto(path)
        .map_err(|e| format!("failed to open Excel file: {}", e))?;

    let sheet_names: Vec<String> = workbook.sheet_names().to_vec();
    let first = sheet_names
        .first()
        .ok_or_else(|| "Excel file contains no sheets".to_string())?;

    let range = workbook
        .worksheet_range(first)
        .map_err(|e| format!("failed to read sheet '{}': {}", first, e))?;

    let mut rows = range.rows();
    let header = rows
        .next()
        .ok_or_else(|| format!("sheet '{}' is empty", first))?;

    let find = |name: &str| {
        header
            .iter()
            .position(|cell| cell_string(cell).eq_ignore_ascii_case(name))
            .ok_or_else(|| format!("missing column '{}'", name))
    };
    let code_col = find("code")?;
    let x1_col = find("x1")?;
    let x2_col = find("x2")?;
    let source_col = find("source")?;

    let mut records = Vec::new();
    for (i, row) in rows.enumerate() {
        // 1-based file row, after the header
        let file_row = i + 2;
        let x1 = cell_number(row.get(x1_col))
            .ok_or_else(|| format!("row {}: x1 is not numeric", file_row))?;
        let x2 = cell_number(row.get(x2_col))
            .ok_or_else(|| format!("row {}: x2 is not numeric", file_row))?;
        records.push(Record {
            code: row.get(code_col).map(cell_string).unwrap_or_default(),
            x1,
            x2,
            source: row.get(source_col).map(cell_string).unwrap_or_default(),
        });
    }
    Ok(records)
}

/// Write the full record set, header row first.
pub fn save(path: &Path, records: &[Record]) -> Result<(), String> {
    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();

    for (col, name) in COLUMNS.iter().enumerate() {
        sheet
            .write_string(0, col as u16, *name)
            .map_err(|e| e.to_string())?;
    }
    for (i, record) in records.iter().enumerate() {
        let row = (i + 1) as u32;
        sheet
            .write_string(row, 0, &record.code)
            .and_then(|s| s.write_number(row, 1, record.x1))
            .and_then(|s| s.write_number(row, 2, record.x2))
            .and_then(|s| s.write_string(row, 3, &record.source))
            .map_err(|e| e.to_string())?;
    }

    workbook.save(path).map_err(|e| e.to_string())
}

/// Excel-backed Persist collaborator: remembers the path it was loaded
/// from and overwrites it on save.
#[derive(Debug, Clone)]
pub struct XlsxFile {
    path: PathBuf,
}

impl XlsxFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn load(&self) -> Result<Vec<Record>, String> {
        load(&self.path)
    }
}

impl Persist for XlsxFile {
    fn save(&mut self, records: &[Record]) -> Result<(), String> {
        save(&self.path, records)
    }
}

fn cell_string(cell: &Data) -> String {
    match cell {
        Data::String(s) => s.trim().to_string(),
        Data::Empty => String::new(),
        other => other.to_string().trim().to_string(),
    }
}

fn cell_number(cell: Option<&Data>) -> Option<f64> {
    match cell? {
        Data::Float(f) => Some(*f),
        Data::Int(i) => Some(*i as f64),
        Data::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}
