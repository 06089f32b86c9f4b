use crate::error::Result;
use serde::Serialize;
use serde_json::Value;
use std::fs::{create_dir_all, File};
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

/// Load raw records. `.jsonl` files hold one record per line; anything else is
/// parsed as a single JSON document, where an array yields its elements and an
/// object yields itself.
pub fn load_raw(path: &Path) -> Result<Vec<Value>> {
    if path.extension().and_then(|s| s.to_str()) == Some("jsonl") {
        load_jsonl(path)
    } else {
        load_json(path)
    }
}

fn load_jsonl(path: &Path) -> Result<Vec<Value>> {
    let reader = BufReader::new(File::open(path)?);
    let mut records = Vec::new();
    for line in reader.lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        records.push(serde_json::from_str(&line)?);
    }
    Ok(records)
}

fn load_json(path: &Path) -> Result<Vec<Value>> {
    let reader = BufReader::new(File::open(path)?);
    let json: Value = serde_json::from_reader(reader)?;
    let records = match json {
        Value::Array(arr) => arr,
        Value::Object(_) => vec![json],
        other => {
            tracing::warn!(path = %path.display(), kind = ?other, "top-level value is not a record or list, ignoring");
            Vec::new()
        }
    };
    Ok(records)
}

/// Write `value` as pretty JSON (two-space indent), creating parent directories.
pub fn write_json_pretty<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<()> {
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        create_dir_all(dir)?;
    }
    let mut out = BufWriter::new(File::create(path)?);
    serde_json::to_writer_pretty(&mut out, value)?;
    out.flush()?;
    Ok(())
}

/// Write the final record array.
pub fn write_records<T: Serialize>(path: &Path, records: &[T]) -> Result<()> {
    write_json_pretty(path, records)?;
    tracing::info!(path = %path.display(), count = records.len(), "records written");
    Ok(())
}
