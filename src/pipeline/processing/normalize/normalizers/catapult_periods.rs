use chrono::{DateTime, Datelike};
use serde_json::{json, Value};

use super::base::{SourceNormalizer, SourceRecord};
use crate::constants;
use crate::error::Result;
use crate::pipeline::storage::TableSet;
use crate::schema;

/// Normalizer for Catapult periods
///
/// A period is both an event and the season it falls in; both are keyed by
/// the period id. Owning team, opponent, result and sport are not carried by
/// the feed.
pub struct CatapultPeriodsNormalizer;

impl CatapultPeriodsNormalizer {
    pub fn new() -> Self {
        Self
    }
}

impl Default for CatapultPeriodsNormalizer {
    fn default() -> Self {
        Self::new()
    }
}

// "NaN" and "inf" parse as f64 but are not timestamps
fn whole_seconds(f: f64) -> Option<i64> {
    Some(f).filter(|f| f.is_finite()).map(|f| f.trunc() as i64)
}

/// Calendar year (UTC) of a unix-seconds timestamp, `""` when not numeric
pub fn year_label(timestamp: &Value) -> String {
    let seconds = match timestamp {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().and_then(whole_seconds)),
        Value::String(s) => s.trim().parse::<f64>().ok().and_then(whole_seconds),
        _ => None,
    };

    seconds
        .and_then(|s| DateTime::from_timestamp(s, 0))
        .map(|dt| dt.year().to_string())
        .unwrap_or_default()
}

impl SourceNormalizer for CatapultPeriodsNormalizer {
    fn feed(&self) -> &str {
        constants::PERIODS_FEED
    }

    fn name(&self) -> &str {
        "Catapult Periods Normalizer"
    }

    fn normalize(&self, records: &[Value], tables: &mut TableSet) -> Result<()> {
        for record in SourceRecord::iter(self.feed(), records) {
            let period_id = record.required("id")?;
            let name = record.required("name")?;
            let start_time = record.required("start_time")?;
            let end_time = record.required("end_time")?;

            tables.table_mut(&schema::EVENTS).insert([
                ("Event ID", Some(period_id.clone())),
                ("Team ID", None),
                ("Event Type", Some(name.clone())),
                ("Team Opponent", None),
                ("Start Unix", Some(start_time.clone())),
                ("End Unix", Some(end_time.clone())),
                ("Team Result", None),
            ]);

            tables.table_mut(&schema::SEASONS).insert([
                ("Season ID", Some(period_id.clone())),
                ("Year", Some(json!(year_label(start_time)))),
                ("Sport", None),
            ]);
        }

        Ok(())
    }
}
