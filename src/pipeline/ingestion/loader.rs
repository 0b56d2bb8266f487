use serde_json::Value;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use tracing::{debug, info};

use crate::config::InputsConfig;
use crate::constants;
use crate::error::{EtlError, Result};

/// Raw records of every source feed, fully loaded before normalization starts
#[derive(Debug, Default, Clone)]
pub struct SourceData {
    feeds: BTreeMap<String, Vec<Value>>,
}

impl SourceData {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from already-decoded feed documents, keyed by feed name
    pub fn from_documents<I, S>(documents: I) -> Result<Self>
    where
        I: IntoIterator<Item = (S, Value)>,
        S: Into<String>,
    {
        let mut data = Self::new();
        for (feed, document) in documents {
            let feed = feed.into();
            let records = extract_records(&feed, document)?;
            data.feeds.insert(feed, records);
        }
        Ok(data)
    }

    pub fn insert(&mut self, feed: impl Into<String>, records: Vec<Value>) {
        self.feeds.insert(feed.into(), records);
    }

    /// Records of a feed; an absent feed is empty
    pub fn records(&self, feed: &str) -> &[Value] {
        self.feeds.get(feed).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn total_records(&self) -> usize {
        self.feeds.values().map(Vec::len).sum()
    }
}

/// Load every configured feed. Unset or non-existent files yield empty feeds;
/// unreadable or malformed files abort the run.
pub fn load_sources(inputs: &InputsConfig) -> Result<SourceData> {
    let mut data = SourceData::new();

    for feed in constants::get_supported_feeds() {
        let Some(path) = inputs.path_for(feed) else {
            debug!(feed, "Feed not configured, treating as empty");
            continue;
        };
        if !path.exists() {
            info!(feed, path = %path.display(), "Feed file not found, treating as empty");
            continue;
        }

        let records = load_feed(feed, path)?;
        info!(feed, records = records.len(), "Loaded feed");
        data.insert(feed, records);
    }

    Ok(data)
}

fn load_feed(feed: &str, path: &Path) -> Result<Vec<Value>> {
    let content = fs::read_to_string(path)?;
    let document: Value = serde_json::from_str(&content)?;
    extract_records(feed, document)
}

/// A feed document is either the record list itself or an object holding it
/// under the feed's name.
fn extract_records(feed: &str, document: Value) -> Result<Vec<Value>> {
    match document {
        Value::Array(records) => Ok(records),
        Value::Object(mut map) => match map.remove(feed) {
            None | Some(Value::Null) => Ok(Vec::new()),
            Some(Value::Array(records)) => Ok(records),
            Some(other) => Err(EtlError::InvalidFeed {
                feed: feed.to_string(),
                reason: format!("field '{}' is not a list: {}", feed, type_name(&other)),
            }),
        },
        other => Err(EtlError::InvalidFeed {
            feed: feed.to_string(),
            reason: format!("expected a list or an object, found {}", type_name(&other)),
        }),
    }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "list",
        Value::Object(_) => "object",
    }
}
