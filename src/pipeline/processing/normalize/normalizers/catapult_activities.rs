use serde_json::Value;

use super::base::{SourceNormalizer, SourceRecord};
use crate::constants;
use crate::error::Result;
use crate::pipeline::storage::TableSet;
use crate::schema;

/// Normalizer for Catapult activities
///
/// Activities carry no period or athlete reference, so event, athlete,
/// performance and modality links stay unresolved. The sensor result itself
/// is not part of the export.
pub struct CatapultActivitiesNormalizer;

impl CatapultActivitiesNormalizer {
    pub fn new() -> Self {
        Self
    }
}

impl Default for CatapultActivitiesNormalizer {
    fn default() -> Self {
        Self::new()
    }
}

impl SourceNormalizer for CatapultActivitiesNormalizer {
    fn feed(&self) -> &str {
        constants::ACTIVITIES_FEED
    }

    fn name(&self) -> &str {
        "Catapult Activities Normalizer"
    }

    fn normalize(&self, records: &[Value], tables: &mut TableSet) -> Result<()> {
        for record in SourceRecord::iter(self.feed(), records) {
            let activity_id = record.required("id")?;
            let start_time = record.required("start_time")?;
            let end_time = record.required("end_time")?;
            let owner_id = record.optional("owner_id");

            tables.table_mut(&schema::PERFORMANCES).insert([
                ("Performance ID", Some(activity_id.clone())),
                ("Event ID", None),
                ("Athlete UUID", None),
                ("Team ID", owner_id.clone()),
                ("Start Unix", Some(start_time.clone())),
                ("End Unix", Some(end_time.clone())),
            ]);

            tables.table_mut(&schema::PERFORMANCE_RESULTS).insert([
                ("Performance Result ID", Some(activity_id.clone())),
                ("Performance ID", None),
                ("Athlete UUID", None),
                ("Team ID", owner_id),
                ("Modality ID", None),
                ("Result", None),
                ("Is Raw", Some(Value::Bool(true))),
            ]);
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_activity_yields_performance_and_result() {
        let records = vec![
            json!({"id": "act1", "owner_id": "team-1", "start_time": 10, "end_time": 20}),
            json!({"id": "act2", "start_time": 30, "end_time": 40}),
        ];
        let mut tables = TableSet::new();

        CatapultActivitiesNormalizer::new().normalize(&records, &mut tables).unwrap();

        let performances = &tables.table(&schema::PERFORMANCES).rows;
        assert_eq!(performances.len(), 2);
        assert_eq!(performances[0]["Team ID"], json!("team-1"));
        assert_eq!(performances[0]["Event ID"], Value::Null);
        assert_eq!(performances[0]["Athlete UUID"], Value::Null);
        assert_eq!(performances[1]["Team ID"], json!(""));

        let results = &tables.table(&schema::PERFORMANCE_RESULTS).rows;
        assert_eq!(results[0]["Performance Result ID"], json!("act1"));
        assert_eq!(results[0]["Is Raw"], json!(true));
        assert_eq!(results[0]["Result"], Value::Null);
        assert_eq!(results[1]["Team ID"], json!(""));
    }

    #[test]
    fn test_missing_start_time_is_fatal() {
        let records = vec![json!({"id": "act1", "end_time": 20})];
        let mut tables = TableSet::new();
        assert!(CatapultActivitiesNormalizer::new().normalize(&records, &mut tables).is_err());
    }
}
