// src/file.rs
//! Filesystem side of the pipeline: directories and BOM-prefixed CSV output.
//! Every file is written in one go; a failure leaves no partial table behind
//! except what the OS had already flushed.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;

use serde::Serialize;

use crate::error::{Error, Result};

/// UTF-8 byte order mark; spreadsheet tools need it to detect the encoding.
pub const BOM: &[u8] = b"\xEF\xBB\xBF";

pub fn ensure_directory(dir: &Path) -> Result<()> {
    if dir.exists() && !dir.is_dir() {
        return Err(Error::io(
            dir,
            std::io::Error::new(std::io::ErrorKind::AlreadyExists, "path exists but is not a directory"),
        ));
    }
    if !dir.exists() {
        fs::create_dir_all(dir).map_err(|e| Error::io(dir, e))?;
    }
    Ok(())
}

/// Create the parent directories of `path`, if it has any.
pub fn ensure_parent(path: &Path) -> Result<()> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => ensure_directory(parent),
        _ => Ok(()),
    }
}

/// Create/truncate `path`, write the BOM, and hand back a CSV writer on it.
fn bom_writer(path: &Path) -> Result<csv::Writer<BufWriter<File>>> {
    ensure_parent(path)?;
    let file = File::create(path).map_err(|e| Error::io(path, e))?;
    let mut out = BufWriter::new(file);
    out.write_all(BOM).map_err(|e| Error::io(path, e))?;
    Ok(csv::Writer::from_writer(out))
}

/// Write a header row plus string rows.
pub fn write_table(path: &Path, headers: &[String], rows: &[Vec<String>]) -> Result<()> {
    let mut w = bom_writer(path)?;
    w.write_record(headers)?;
    for row in rows {
        w.write_record(row)?;
    }
    w.flush().map_err(|e| Error::io(path, e))?;
    logd!("Wrote {} rows to {}", rows.len(), path.display());
    Ok(())
}

/// Write serde records; the header row comes from the field names (or their renames).
pub fn write_records<T: Serialize>(path: &Path, records: &[T]) -> Result<()> {
    let mut w = bom_writer(path)?;
    for rec in records {
        w.serialize(rec)?;
    }
    w.flush().map_err(|e| Error::io(path, e))?;
    logd!("Wrote {} records to {}", records.len(), path.display());
    Ok(())
}
