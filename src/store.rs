// src/store.rs
//! Loading and saving the pipeline's tables.
//!
//! The raw crawl file is wide and loosely shaped, so it is read as a plain
//! `DataSet` and columns are looked up by header name. The cleaned file has a
//! fixed schema and is read straight into `CanonicalRow`s.

use std::fs;
use std::path::Path;

use serde::de::DeserializeOwned;

use crate::error::{Error, Result};
use crate::file;
use crate::record::{raw_headers, VehicleRecord};

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DataSet {
    pub headers: Option<Vec<String>>,
    pub rows: Vec<Vec<String>>,
}

impl DataSet {
    pub fn new(headers: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        Self { headers: Some(headers), rows }
    }

    /// Index of the column named `name`, if the table has one.
    pub fn column(&self, name: &str) -> Option<usize> {
        self.headers.as_ref()?.iter().position(|h| h == name)
    }

    pub fn has_column(&self, name: &str) -> bool { self.column(name).is_some() }

    pub fn len(&self) -> usize { self.rows.len() }
    pub fn is_empty(&self) -> bool { self.rows.is_empty() }
}

fn read_text(path: &Path) -> Result<String> {
    let text = fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
    Ok(text.strip_prefix('\u{feff}').map(str::to_string).unwrap_or(text))
}

/// Read a CSV with a header row. Header cells are trimmed; short rows are
/// padded with empty cells and long rows truncated to the header width.
pub fn load_dataset(path: &Path) -> Result<DataSet> {
    let text = read_text(path)?;
    let mut rdr = csv::ReaderBuilder::new().flexible(true).from_reader(text.as_bytes());

    let headers: Vec<String> = rdr.headers()?.iter().map(|h| s!(h.trim())).collect();
    let width = headers.len();
    let mut rows = Vec::new();
    for rec in rdr.records() {
        let rec = rec?;
        let mut row: Vec<String> = rec.iter().map(str::to_string).collect();
        row.resize(width, s!());
        rows.push(row);
    }
    logd!("Loaded {} rows x {} columns from {}", rows.len(), width, path.display());
    Ok(DataSet::new(headers, rows))
}

pub fn save_dataset(path: &Path, data: &DataSet) -> Result<()> {
    let headers = data.headers.clone().unwrap_or_default();
    file::write_table(path, &headers, &data.rows)
}

/// Typed read of a table whose header row matches `T`'s serde names.
pub fn load_records<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>> {
    let text = read_text(path)?;
    let mut rdr = csv::Reader::from_reader(text.as_bytes());
    let mut out = Vec::new();
    for rec in rdr.deserialize() {
        out.push(rec?);
    }
    Ok(out)
}

/// Write the crawl result in raw column order.
pub fn save_raw(path: &Path, records: &[VehicleRecord]) -> Result<()> {
    let rows: Vec<Vec<String>> = records.iter().map(VehicleRecord::to_row).collect();
    file::write_table(path, &raw_headers(), &rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn tmp_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("che_scrape_store_{name}_{}", std::process::id()));
        let _ = fs::remove_dir_all(&dir);
        dir
    }

    #[test]
    fn load_strips_bom_and_trims_headers() {
        let dir = tmp_dir("bom");
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join("raw.csv");
        fs::write(&path, "\u{feff} 车辆ID ,城市\n1,郑州\n2\n").unwrap();

        let ds = load_dataset(&path).unwrap();
        assert_eq!(ds.headers, Some(headers!["车辆ID", "城市"]));
        assert_eq!(ds.column("车辆ID"), Some(0));
        assert_eq!(ds.rows, vec![vec![s!("1"), s!("郑州")], vec![s!("2"), s!("")]]);
        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn save_then_load_keeps_cells() {
        let dir = tmp_dir("roundtrip");
        let path = dir.join("t.csv");
        let ds = DataSet::new(headers!["a", "b"], vec![vec![s!("x\"y"), s!("1,2")]]);
        save_dataset(&path, &ds).unwrap();
        assert_eq!(load_dataset(&path).unwrap(), ds);
        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = load_dataset(Path::new("/definitely/not/here.csv")).unwrap_err();
        assert!(matches!(err, Error::Io { .. }));
    }
}
