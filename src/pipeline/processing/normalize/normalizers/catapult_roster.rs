use serde_json::{json, Value};
use tracing::{debug, warn};

use super::base::{SourceNormalizer, SourceRecord};
use crate::constants;
use crate::error::Result;
use crate::identity;
use crate::pipeline::storage::TableSet;
use crate::schema;

/// Normalizer for the Catapult athlete roster
///
/// Each roster entry yields an Athletes row and an Athlete Metadata row keyed
/// by the name-derived athlete id. Entries that name a current team also link
/// the athlete to that team; the season stays unresolved. Entries without both
/// a first and last name carry no identity and are skipped.
pub struct CatapultRosterNormalizer;

impl CatapultRosterNormalizer {
    pub fn new() -> Self {
        Self
    }
}

impl Default for CatapultRosterNormalizer {
    fn default() -> Self {
        Self::new()
    }
}

impl SourceNormalizer for CatapultRosterNormalizer {
    fn feed(&self) -> &str {
        constants::ATHLETES_FEED
    }

    fn name(&self) -> &str {
        "Catapult Roster Normalizer"
    }

    fn normalize(&self, records: &[Value], tables: &mut TableSet) -> Result<()> {
        for record in SourceRecord::iter(self.feed(), records) {
            let source_id = record.required("id")?;
            let (first_name, last_name) = match (
                record.non_empty_text("first_name"),
                record.non_empty_text("last_name"),
            ) {
                (Some(first), Some(last)) => (first, last),
                _ => {
                    warn!(
                        feed = record.feed,
                        index = record.index,
                        source_id = %source_id,
                        "Roster athlete has no full name, skipping athlete rows"
                    );
                    continue;
                }
            };
            let athlete_id = identity::resolve(first_name, last_name);
            let athlete_uuid = json!(athlete_id.to_string());
            debug!(source_id = %source_id, athlete = %athlete_id, "Resolved roster athlete");

            tables.table_mut(&schema::ATHLETES).insert([
                ("Athlete UUID", Some(athlete_uuid.clone())),
                ("First Name", record.optional("first_name")),
                ("Last Name", record.optional("last_name")),
                ("Sex", record.optional("gender")),
                ("Home State", record.optional("home_state")),
                ("Home Town", record.optional("home_town")),
                ("High School", record.optional("highschool")),
                ("Date of Birth", record.optional("date_of_birth_date")),
                ("Year of Birth", record.optional("year_of_birth_date")),
                ("Source", Some(json!(constants::CATAPULT_SOURCE))),
                ("Is Current", Some(Value::Bool(true))),
            ]);

            tables.table_mut(&schema::ATHLETE_METADATA).insert([
                ("Athlete UUID", Some(athlete_uuid.clone())),
                ("Sex", record.optional("gender")),
                ("Velocity Max", record.optional("velocity_max")),
                ("Acceleration Max", record.optional("acceleration_max")),
                ("Heart Rate Max", record.optional("heart_rate_max")),
                ("Player Load Max", record.optional("player_load_max")),
                ("Weight", record.optional("weight")),
                ("Height", record.optional("height")),
                ("Position", record.optional("position_name")),
                ("Jersey", record.optional("jersey")),
            ]);

            if let Some(team_id) = record.non_empty_text("current_team_id") {
                tables.table_mut(&schema::ATHLETE_SEASONS).insert([
                    // Keyed once seasons are mapped
                    ("Athlete Season ID", None),
                    ("Athlete UUID", Some(athlete_uuid)),
                    ("Team ID", Some(json!(team_id))),
                    ("Season ID", None),
                ]);
            }
        }

        Ok(())
    }
}
