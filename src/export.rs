use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use csv::WriterBuilder;
use serde::Serialize;
use serde_json::ser::{PrettyFormatter, Serializer};
use tracing::info;

use crate::error::{Error, Result};
use crate::record::RecordSet;

/// Writes a header line then one comma-separated line per row.
pub fn write_csv(data: &RecordSet, path: &Path) -> Result<()> {
    let file = File::create(path).map_err(|e| Error::io(path, e))?;
    let mut writer = WriterBuilder::new().from_writer(BufWriter::new(file));

    if !data.columns().is_empty() {
        writer
            .write_record(data.columns())
            .map_err(|e| Error::io(path, e.into()))?;
    }
    for row in data.rows() {
        writer
            .write_record(row.iter().map(|v| v.to_string()))
            .map_err(|e| Error::io(path, e.into()))?;
    }
    writer.flush().map_err(|e| Error::io(path, e))?;

    info!("wrote {} rows to {}", data.len(), path.display());
    Ok(())
}

/// Writes the rows as a pretty-printed JSON array of objects.
pub fn write_json(data: &RecordSet, path: &Path) -> Result<()> {
    let file = File::create(path).map_err(|e| Error::io(path, e))?;
    let mut out = BufWriter::new(file);

    let mut ser = Serializer::with_formatter(&mut out, PrettyFormatter::with_indent(b"    "));
    data.serialize(&mut ser)
        .map_err(|e| Error::io(path, e.into()))?;
    out.write_all(b"\n").map_err(|e| Error::io(path, e))?;
    out.flush().map_err(|e| Error::io(path, e))?;

    info!("wrote {} rows to {}", data.len(), path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::file_loader::{read_csv, read_json};
    use crate::record::Value;
    use std::fs;

    fn mixed() -> RecordSet {
        let mut set = RecordSet::new(vec!["name".into(), "count".into(), "ratio".into()]);
        set.push_row(vec!["plain".into(), Value::Integer(1), Value::Real(0.5)])
            .unwrap();
        set.push_row(vec!["with, comma".into(), Value::Null, Value::Bool(true)])
            .unwrap();
        set.push_row(vec!["Привет \"q\"".into(), Value::Integer(-3), Value::Real(2.0)])
            .unwrap();
        set
    }

    #[test]
    fn csv_round_trip_keeps_values_as_text() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("output.csv");
        let data = mixed();

        write_csv(&data, &path).unwrap();
        let back = read_csv(&path).unwrap();

        assert_eq!(back.columns(), data.columns());
        for (written, read) in data.rows().iter().zip(back.rows()) {
            let expected: Vec<Value> = written.iter().map(|v| Value::Text(v.to_string())).collect();
            assert_eq!(read, &expected);
        }
        assert_eq!(back.len(), data.len());
    }

    #[test]
    fn json_round_trip_preserves_types() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("output.json");
        let data = mixed();

        write_json(&data, &path).unwrap();
        let back = read_json(&path).unwrap();
        assert_eq!(back, data);
    }

    #[test]
    fn json_is_indented_and_keeps_unicode() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("output.json");
        write_json(&mixed(), &path).unwrap();

        let text = fs::read_to_string(&path).unwrap();
        assert!(text.starts_with("[\n    {\n        \"name\": \"plain\""));
        assert!(text.contains("Привет"));
    }

    #[test]
    fn unwritable_path_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("no/such/dir/output.csv");
        let err = write_csv(&mixed(), &path).unwrap_err();
        assert_eq!(err.kind(), crate::error::ErrorKind::Io);
    }
}
