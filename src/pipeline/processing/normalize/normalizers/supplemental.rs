use serde_json::{json, Map, Value};

use super::base::{SourceNormalizer, SourceRecord};
use crate::constants;
use crate::error::Result;
use crate::identity;
use crate::pipeline::storage::TableSet;
use crate::schema::{self, TableSchema};

const NON_PAYLOAD_FIELDS: [&str; 3] = ["id", "first_name", "last_name"];

/// Normalizer for free-form per-athlete records (medical, academic, consent)
///
/// The athlete is identified by name when both parts are present; everything
/// except the id and name fields is kept verbatim as a JSON payload.
pub struct SupplementalRecordNormalizer {
    feed: &'static str,
    name: &'static str,
    schema: &'static TableSchema,
}

impl SupplementalRecordNormalizer {
    pub fn new(feed: &'static str, name: &'static str, schema: &'static TableSchema) -> Self {
        Self { feed, name, schema }
    }

    pub fn medical() -> Self {
        Self::new(
            constants::MEDICAL_FEED,
            "Medical Records Normalizer",
            &schema::MEDICAL_RECORDS,
        )
    }

    pub fn academic() -> Self {
        Self::new(
            constants::ACADEMIC_FEED,
            "Academic Records Normalizer",
            &schema::ACADEMIC_RECORDS,
        )
    }

    pub fn consent() -> Self {
        Self::new(
            constants::CONSENT_FEED,
            "Consent Records Normalizer",
            &schema::CONSENT_RECORDS,
        )
    }

    fn payload(record: &SourceRecord<'_>) -> Result<Option<Value>> {
        let Some(fields) = record.data.as_object() else {
            return Ok(None);
        };
        let rest: Map<String, Value> = fields
            .iter()
            .filter(|(k, _)| !NON_PAYLOAD_FIELDS.contains(&k.as_str()))
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();
        if rest.is_empty() {
            return Ok(None);
        }
        Ok(Some(Value::String(serde_json::to_string(&rest)?)))
    }
}

impl SourceNormalizer for SupplementalRecordNormalizer {
    fn feed(&self) -> &str {
        self.feed
    }

    fn name(&self) -> &str {
        self.name
    }

    fn normalize(&self, records: &[Value], tables: &mut TableSet) -> Result<()> {
        for record in SourceRecord::iter(self.feed, records) {
            let record_id = record.required("id")?;
            let athlete_uuid = match (
                record.non_empty_text("first_name"),
                record.non_empty_text("last_name"),
            ) {
                (Some(first), Some(last)) => {
                    Some(json!(identity::resolve(first, last).to_string()))
                }
                _ => None,
            };

            tables.table_mut(self.schema).insert([
                ("Record ID", Some(record_id.clone())),
                ("Athlete UUID", athlete_uuid),
                ("Payload", Self::payload(&record)?),
            ]);
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_medical_record_links_athlete_and_keeps_payload() {
        let records = vec![json!({
            "id": "m1",
            "first_name": "Albert",
            "last_name": "Gator",
            "injury": "ankle",
            "cleared": false
        })];
        let mut tables = TableSet::new();

        SupplementalRecordNormalizer::medical().normalize(&records, &mut tables).unwrap();

        let row = &tables.table(&schema::MEDICAL_RECORDS).rows[0];
        assert_eq!(row["Record ID"], json!("m1"));
        assert_eq!(row["Athlete UUID"], json!(identity::resolve("Albert", "Gator").to_string()));
        assert_eq!(row["Payload"], json!(r#"{"injury":"ankle","cleared":false}"#));
    }

    #[test]
    fn test_record_without_name_is_unresolved() {
        let records = vec![json!({"id": 5, "signed": "2024-01-01"})];
        let mut tables = TableSet::new();

        SupplementalRecordNormalizer::consent().normalize(&records, &mut tables).unwrap();

        let row = &tables.table(&schema::CONSENT_RECORDS).rows[0];
        assert_eq!(row["Athlete UUID"], Value::Null);
        assert!(tables.table(&schema::MEDICAL_RECORDS).is_empty());
    }

    #[test]
    fn test_id_only_record_has_null_payload() {
        let records = vec![json!({"id": "a1"})];
        let mut tables = TableSet::new();

        SupplementalRecordNormalizer::academic().normalize(&records, &mut tables).unwrap();

        assert_eq!(tables.table(&schema::ACADEMIC_RECORDS).rows[0]["Payload"], Value::Null);
    }
}
