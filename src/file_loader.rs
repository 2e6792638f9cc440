use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use csv::ReaderBuilder;
use serde_json::Value as JsonValue;
use tracing::{info, warn};

use crate::error::{Error, Result};
use crate::parse::tabulate_json;
use crate::record::{RecordSet, Value};

/// Reads a comma-separated file whose first line holds the column names.
/// Every value is kept as text.
pub fn read_csv(file_path: &Path) -> Result<RecordSet> {
    info!("reading CSV file {}", file_path.display());
    let file = File::open(file_path).map_err(|e| Error::io(file_path, e))?;

    let mut reader = ReaderBuilder::new().has_headers(true).from_reader(file);

    let headers: Vec<String> = reader
        .headers()
        .map_err(|e| csv_error(file_path, e))?
        .iter()
        .map(|h| h.to_string())
        .collect();
    if headers.is_empty() {
        warn!("{} has no header line", file_path.display());
    }

    let mut set = RecordSet::new(headers);
    for result in reader.records() {
        let record = result.map_err(|e| csv_error(file_path, e))?;
        let row = record.iter().map(Value::from).collect();
        set.push_row(row)?;
    }

    info!("read {} rows from {}", set.len(), file_path.display());
    Ok(set)
}

/// Reads a JSON file holding an object or an array of objects.
pub fn read_json(file_path: &Path) -> Result<RecordSet> {
    info!("reading JSON file {}", file_path.display());
    let file = File::open(file_path).map_err(|e| Error::io(file_path, e))?;

    let value: JsonValue = serde_json::from_reader(BufReader::new(file)).map_err(|e| {
        if e.is_io() {
            Error::io(file_path, e.into())
        } else {
            Error::parse(format!("{}: invalid JSON: {e}", file_path.display()))
        }
    })?;
    let set = tabulate_json(value, None)?;

    info!("read {} rows from {}", set.len(), file_path.display());
    Ok(set)
}

fn csv_error(file_path: &Path, e: csv::Error) -> Error {
    if e.is_io_error() {
        Error::io(file_path, e.into())
    } else {
        Error::parse(format!("{}: {e}", file_path.display()))
    }
}
