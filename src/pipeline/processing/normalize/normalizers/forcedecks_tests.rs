use serde_json::{json, Value};

use super::base::{id_text, SourceNormalizer, SourceRecord};
use crate::constants;
use crate::error::Result;
use crate::pipeline::storage::TableSet;
use crate::schema;

/// Normalizer for ForceDecks tests and their per-metric results
///
/// The athlete reference is ForceDecks' own `athleteId`, copied through as-is.
pub struct ForceDecksTestsNormalizer;

impl ForceDecksTestsNormalizer {
    pub fn new() -> Self {
        Self
    }
}

impl Default for ForceDecksTestsNormalizer {
    fn default() -> Self {
        Self::new()
    }
}

impl SourceNormalizer for ForceDecksTestsNormalizer {
    fn feed(&self) -> &str {
        constants::FORCEDECKS_TESTS_FEED
    }

    fn name(&self) -> &str {
        "ForceDecks Tests Normalizer"
    }

    fn normalize(&self, records: &[Value], tables: &mut TableSet) -> Result<()> {
        for record in SourceRecord::iter(self.feed(), records) {
            let test_id = record.required("id")?;
            let athlete_id = record.required("athleteId")?;

            tables.table_mut(&schema::TESTS).insert([
                ("Test ID", Some(test_id.clone())),
                ("Athlete UUID", Some(athlete_id.clone())),
                ("Team ID", None),
                ("Modality ID", None),
                ("Start Unix", Some(record.required("startTime")?.clone())),
                ("End Unix", Some(record.required("endTime")?.clone())),
                ("Date Uploaded", Some(record.required("recordedUTC")?.clone())),
                ("Test Type", None),
            ]);

            // Results report errors against their parent test record
            for result in record.required_array("results")? {
                let result = SourceRecord::new(self.feed(), record.index, result);
                let result_id = result.required("resultId")?;
                let value = result.required("value")?;

                tables.table_mut(&schema::TEST_RESULTS).insert([
                    (
                        "Test Result ID",
                        Some(json!(format!("{}-{}", id_text(test_id), id_text(result_id)))),
                    ),
                    ("Test ID", Some(test_id.clone())),
                    ("Athlete UUID", Some(athlete_id.clone())),
                    ("Team ID", None),
                    ("Modality ID", None),
                    ("Result", Some(value.clone())),
                    ("Is Raw", Some(Value::Bool(true))),
                ]);
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::EtlError;

    fn test_record() -> Value {
        json!({
            "id": "T100",
            "athleteId": "fd-7",
            "startTime": "2024-02-01T10:00:00Z",
            "endTime": "2024-02-01T10:05:00Z",
            "recordedUTC": "2024-02-01T10:06:00Z",
            "results": [
                {"resultId": 6553607, "value": 41.2},
                {"resultId": "RSI", "value": 0.52}
            ]
        })
    }

    #[test]
    fn test_test_yields_one_row_per_result() {
        let mut tables = TableSet::new();
        ForceDecksTestsNormalizer::new().normalize(&[test_record()], &mut tables).unwrap();

        let test = &tables.table(&schema::TESTS).rows[0];
        assert_eq!(test["Test ID"], json!("T100"));
        assert_eq!(test["Athlete UUID"], json!("fd-7"));
        assert_eq!(test["Date Uploaded"], json!("2024-02-01T10:06:00Z"));
        assert_eq!(test["Test Type"], Value::Null);

        let results = &tables.table(&schema::TEST_RESULTS).rows;
        assert_eq!(results.len(), 2);
        assert_eq!(results[0]["Test Result ID"], json!("T100-6553607"));
        assert_eq!(results[0]["Result"], json!(41.2));
        assert_eq!(results[1]["Test Result ID"], json!("T100-RSI"));
        assert_eq!(results[1]["Is Raw"], json!(true));
    }

    #[test]
    fn test_result_without_value_is_fatal() {
        let mut record = test_record();
        record["results"] = json!([{"resultId": 1}]);
        let mut tables = TableSet::new();

        let err = ForceDecksTestsNormalizer::new()
            .normalize(&[record], &mut tables)
            .unwrap_err();
        assert!(matches!(err, EtlError::MissingField { ref field, .. } if field == "value"));
    }

    #[test]
    fn test_missing_results_is_fatal() {
        let mut record = test_record();
        record.as_object_mut().unwrap().remove("results");
        let mut tables = TableSet::new();

        assert!(ForceDecksTestsNormalizer::new().normalize(&[record], &mut tables).is_err());
    }
}
