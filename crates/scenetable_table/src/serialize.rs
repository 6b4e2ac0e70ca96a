//! Table serialization to JSON and `MessagePack`.
//!
//! A table is written as a sequence of row objects (column name to value).
//! Vectors and tuple colors come back as numeric lists, which attribute
//! validation turns back into vectors and colors when reconciled.

use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

use scenetable_foundation::{Error, ErrorKind, Result, Table};
use tracing::debug;

/// Serializes a table to a JSON array of row objects.
///
/// NaN cells are written as `null`.
///
/// # Errors
///
/// Returns an error if serialization fails.
pub fn to_json(table: &Table) -> Result<String> {
    serde_json::to_string(table).map_err(|e| Error::new(ErrorKind::Serialization(e.to_string())))
}

/// Deserializes a table from a JSON array of row objects.
///
/// # Errors
///
/// Returns an error if the text is not such an array.
pub fn from_json(text: &str) -> Result<Table> {
    serde_json::from_str(text).map_err(|e| Error::new(ErrorKind::Serialization(e.to_string())))
}

/// Serializes a table to `MessagePack` bytes.
///
/// # Errors
///
/// Returns an error if serialization fails.
pub fn to_msgpack(table: &Table) -> Result<Vec<u8>> {
    rmp_serde::to_vec_named(table).map_err(|e| Error::new(ErrorKind::Serialization(e.to_string())))
}

/// Deserializes a table from `MessagePack` bytes.
///
/// # Errors
///
/// Returns an error if deserialization fails.
pub fn from_msgpack(bytes: &[u8]) -> Result<Table> {
    rmp_serde::from_slice(bytes).map_err(|e| Error::new(ErrorKind::Serialization(e.to_string())))
}

fn io_error(action: &str, path: &Path, e: &std::io::Error) -> Error {
    Error::new(ErrorKind::Io(format!(
        "failed to {action} file '{}': {e}",
        path.display()
    )))
}

/// Saves a table to a JSON file, replacing any existing file.
///
/// # Errors
///
/// Returns an error if the file cannot be created or written to.
pub fn save_to_file<P: AsRef<Path>>(table: &Table, path: P) -> Result<()> {
    let path = path.as_ref();
    let file = File::create(path).map_err(|e| io_error("create", path, &e))?;
    let mut writer = BufWriter::new(file);

    writer
        .write_all(to_json(table)?.as_bytes())
        .map_err(|e| io_error("write to", path, &e))?;
    writer.flush().map_err(|e| io_error("flush", path, &e))?;

    debug!(path = %path.display(), rows = table.len(), "table saved");
    Ok(())
}

/// Loads a table from a JSON file.
///
/// # Errors
///
/// Returns an error if the file cannot be read or does not hold a table.
pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Table> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|e| io_error("open", path, &e))?;
    let mut reader = BufReader::new(file);
    let mut text = String::new();
    reader
        .read_to_string(&mut text)
        .map_err(|e| io_error("read", path, &e))?;

    let table = from_json(&text)?;
    debug!(path = %path.display(), rows = table.len(), "table loaded");
    Ok(table)
}
