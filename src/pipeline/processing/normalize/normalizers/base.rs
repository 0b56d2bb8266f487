use serde_json::Value;

use crate::error::{EtlError, Result};
use crate::pipeline::storage::TableSet;

/// Base trait for feed-specific normalizers
pub trait SourceNormalizer {
    /// Feed key this normalizer reads
    fn feed(&self) -> &str;

    /// Get a human-readable name for this normalizer
    fn name(&self) -> &str;

    /// Append candidate rows for every record of the feed to `tables`
    fn normalize(&self, records: &[Value], tables: &mut TableSet) -> Result<()>;
}

/// One raw record of a feed, with its position for error reporting
#[derive(Debug, Clone, Copy)]
pub struct SourceRecord<'a> {
    pub feed: &'a str,
    pub index: usize,
    pub data: &'a Value,
}

impl<'a> SourceRecord<'a> {
    pub fn new(feed: &'a str, index: usize, data: &'a Value) -> Self {
        Self { feed, index, data }
    }

    /// Wrap every record of a feed
    pub fn iter(
        feed: &'a str,
        records: &'a [Value],
    ) -> impl Iterator<Item = SourceRecord<'a>> + 'a {
        records
            .iter()
            .enumerate()
            .map(move |(index, data)| SourceRecord::new(feed, index, data))
    }

    /// A field the mapping cannot do without. Present-but-null counts as present.
    pub fn required(&self, field: &str) -> Result<&'a Value> {
        self.data.get(field).ok_or_else(|| EtlError::MissingField {
            feed: self.feed.to_string(),
            index: self.index,
            field: field.to_string(),
        })
    }

    pub fn required_array(&self, field: &str) -> Result<&'a [Value]> {
        self.required(field)?
            .as_array()
            .map(Vec::as_slice)
            .ok_or_else(|| EtlError::InvalidFeed {
                feed: self.feed.to_string(),
                reason: format!("record #{} field '{}' is not a list", self.index, field),
            })
    }

    /// Field value as-is, `None` when absent
    pub fn optional(&self, field: &str) -> Option<Value> {
        self.data.get(field).cloned()
    }

    /// Field as text; absent or non-string values read as `""`
    pub fn text(&self, field: &str) -> &'a str {
        self.data.get(field).and_then(Value::as_str).unwrap_or("")
    }

    /// Field as trimmed, non-empty text
    pub fn non_empty_text(&self, field: &str) -> Option<&'a str> {
        Some(self.text(field).trim()).filter(|s| !s.is_empty())
    }
}

/// Text form of an id for building composite ids: strings unquoted
pub fn id_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
