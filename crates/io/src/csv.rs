// CSV/TSV load/persist for the record table.

use std::io::Read;
use std::path::{Path, PathBuf};

use codeplot_engine::record::Record;
use codeplot_engine::session::Persist;

/// Load records from a delimited text file with a header row.
pub fn load(path: &Path, delimiter: u8) -> Result<Vec<Record>, String> {
    let content = read_file_as_utf8(path)?;
    load_from_string(&content, delimiter)
}

pub fn load_from_string(content: &str, delimiter: u8) -> Result<Vec<Record>, String> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(true)
        .flexible(true)
        .from_reader(content.as_bytes());

    let headers = reader.headers().map_err(|e| e.to_string())?.clone();
    let find = |name: &str| {
        headers
            .iter()
            .position(|h| h.trim().eq_ignore_ascii_case(name))
            .ok_or_else(|| format!("missing column '{}'", name))
    };
    let code_col = find("code")?;
    let x1_col = find("x1")?;
    let x2_col = find("x2")?;
    let source_col = find("source")?;

    let mut records = Vec::new();
    for (i, result) in reader.records().enumerate() {
        // 1-based file row, after the header
        let file_row = i + 2;
        let row = result.map_err(|e| format!("row {}: {}", file_row, e))?;
        let number = |col: usize, name: &str| {
            row.get(col)
                .and_then(|v| v.trim().parse::<f64>().ok())
                .ok_or_else(|| format!("row {}: {} is not numeric", file_row, name))
        };
        records.push(Record {
            code: row.get(code_col).unwrap_or_default().trim().to_string(),
            x1: number(x1_col, "x1")?,
            x2: number(x2_col, "x2")?,
            source: row.get(source_col).unwrap_or_default().trim().to_string(),
        });
    }
    Ok(records)
}

/// Write the full record set, header row first.
pub fn save(path: &Path, records: &[Record], delimiter: u8) -> Result<(), String> {
    let mut writer = csv::WriterBuilder::new()
        .delimiter(delimiter)
        .from_path(path)
        .map_err(|e| e.to_string())?;

    writer
        .write_record(["code", "x1", "x2", "source"])
        .map_err(|e| e.to_string())?;
    for record in records {
        let x1 = record.x1.to_string();
        let x2 = record.x2.to_string();
        writer
            .write_record([
                record.code.as_str(),
                x1.as_str(),
                x2.as_str(),
                record.source.as_str(),
            ])
            .map_err(|e| e.to_string())?;
    }
    writer.flush().map_err(|e| e.to_string())
}

/// Read file and convert to UTF-8 if needed (handles Windows-1252 exports).
fn read_file_as_utf8(path: &Path) -> Result<String, String> {
    let mut file = std::fs::File::open(path).map_err(|e| e.to_string())?;
    let mut bytes = Vec::new();
    file.read_to_end(&mut bytes).map_err(|e| e.to_string())?;

    match String::from_utf8(bytes) {
        Ok(s) => Ok(s.trim_start_matches('\u{feff}').to_string()),
        Err(e) => {
            let bytes = e.into_bytes();
            let (decoded, _, _) = encoding_rs::WINDOWS_1252.decode(&bytes);
            Ok(decoded.into_owned())
        }
    }
}

/// Delimited-text-backed Persist collaborator.
#[derive(Debug, Clone)]
pub struct CsvFile {
    path: PathBuf,
    delimiter: u8,
}

impl CsvFile {
    pub fn new(path: impl Into<PathBuf>, delimiter: u8) -> Self {
        Self {
            path: path.into(),
            delimiter,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn load(&self) -> Result<Vec<Record>, String> {
        load(&self.path, self.delimiter)
    }
}

impl Persist for CsvFile {
    fn save(&mut self, records: &[Record]) -> Result<(), String> {
        save(&self.path, records, self.delimiter)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_load_by_header_name() {
        // Columns deliberately out of canonical order, plus an extra one
        let content = "source,code,extra,x2,x1\nmanual,A,ignored,2.5,1\nimport,B,x,-4,3.5\n";
        let records = load_from_string(content, b',').unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0], Record::new("A", 1.0, 2.5, "manual"));
        assert_eq!(records[1], Record::new("B", 3.5, -4.0, "import"));
    }

    #[test]
    fn test_missing_column() {
        let err = load_from_string("code,x1\nA,1\n", b',').unwrap_err();
        assert!(err.contains("missing column 'x2'"), "{err}");
    }

    #[test]
    fn test_non_numeric_coordinate() {
        let err = load_from_string("code,x1,x2,source\nA,one,2,s\n", b',').unwrap_err();
        assert!(err.contains("row 2"), "{err}");
        assert!(err.contains("x1"), "{err}");
    }

    #[test]
    fn test_save_load_round_trip() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("points.csv");
        let records = vec![
            Record::new("A", 1.5, -2.0, "manual"),
            Record::new("code,with,commas", 3.0, 4.25, "import"),
        ];

        save(&path, &records, b',').unwrap();
        let loaded = load(&path, b',').unwrap();
        assert_eq!(loaded, records);
    }

    #[test]
    fn test_tsv_round_trip_via_persist() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("points.tsv");
        let mut file = CsvFile::new(&path, b'\t');
        let records = vec![Record::new("A", 0.0, 0.0, "manual")];

        Persist::save(&mut file, &records).unwrap();
        assert_eq!(file.load().unwrap(), records);
    }

    #[test]
    fn test_bom_is_stripped() {
        let content = "\u{feff}code,x1,x2,source\nA,1,2,s\n";
        let records = load_from_string(content, b',').unwrap();
        assert_eq!(records[0].code, "A");
    }
}
