use serde::Serialize;
use serde_json::{Map, Value};
use std::fs;
use std::path::Path;
use tracing::info;

use crate::error::Result;
use crate::pipeline::storage::TableSet;

/// Build the output document: one key per entity in table order, each an
/// array of that entity's rows.
pub fn export(tables: &TableSet) -> Value {
    let document: Map<String, Value> = tables
        .iter()
        .map(|table| {
            let rows = table.rows.iter().cloned().map(Value::Object).collect();
            (table.name().to_string(), Value::Array(rows))
        })
        .collect();
    Value::Object(document)
}

/// Serialize a document as JSON indented by four spaces, with a trailing newline
pub fn to_pretty_string(document: &Value) -> Result<String> {
    let mut buf = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);
    document.serialize(&mut serializer)?;
    buf.push(b'\n');
    // serde_json only ever emits UTF-8
    Ok(String::from_utf8_lossy(&buf).into_owned())
}

/// Write the document to `path`, replacing any existing file
pub fn write_document<P: AsRef<Path>>(document: &Value, path: P) -> Result<()> {
    let path = path.as_ref();
    let text = to_pretty_string(document)?;

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, text)?;

    info!(path = %path.display(), "Data exported");
    Ok(())
}
