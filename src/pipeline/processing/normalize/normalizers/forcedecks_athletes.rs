use serde_json::{json, Value};
use std::collections::HashSet;
use tracing::{debug, warn};

use super::base::{SourceNormalizer, SourceRecord};
use crate::constants;
use crate::error::Result;
use crate::identity;
use crate::pipeline::storage::{row_key, TableSet};
use crate::schema;

/// Normalizer for ForceDecks athletes and their team attributes
///
/// Teams are emitted once per distinct `teamId`, keeping the attributes of
/// the first athlete seen on that team. Athletes with a full name are also
/// emitted so they merge with the Catapult roster through the shared id.
pub struct ForceDecksAthletesNormalizer;

impl ForceDecksAthletesNormalizer {
    pub fn new() -> Self {
        Self
    }

    /// `valueName` of the first attribute whose `typeName` is "Sport"
    fn find_sport(record: &SourceRecord<'_>) -> Option<Value> {
        record
            .data
            .get("attributes")
            .and_then(Value::as_array)?
            .iter()
            .find(|attr| {
                attr.get("typeName").and_then(Value::as_str) == Some(constants::SPORT_ATTRIBUTE)
            })
            .and_then(|attr| attr.get("valueName"))
            .cloned()
    }
}

impl Default for ForceDecksAthletesNormalizer {
    fn default() -> Self {
        Self::new()
    }
}

impl SourceNormalizer for ForceDecksAthletesNormalizer {
    fn feed(&self) -> &str {
        constants::FORCEDECKS_ATHLETES_FEED
    }

    fn name(&self) -> &str {
        "ForceDecks Athletes Normalizer"
    }

    fn normalize(&self, records: &[Value], tables: &mut TableSet) -> Result<()> {
        let mut seen_teams = HashSet::new();

        for record in SourceRecord::iter(self.feed(), records) {
            let team_id = record.required("teamId")?;

            if seen_teams.insert(row_key(team_id)) {
                tables.table_mut(&schema::TEAMS).insert([
                    ("Team ID", Some(team_id.clone())),
                    ("Sport", Self::find_sport(&record)),
                    ("Sex", None),
                    ("Season", None),
                ]);
            }

            match (record.non_empty_text("givenName"), record.non_empty_text("familyName")) {
                (Some(given), Some(family)) => {
                    let athlete_id = identity::resolve(given, family);
                    debug!(athlete = %athlete_id, "Resolved ForceDecks athlete");

                    tables.table_mut(&schema::ATHLETES).insert([
                        ("Athlete UUID", Some(json!(athlete_id.to_string()))),
                        ("First Name", Some(json!(given))),
                        ("Last Name", Some(json!(family))),
                        ("Sex", record.optional("sex")),
                        ("Date of Birth", record.optional("dateOfBirth")),
                        ("Source", Some(json!(constants::FORCEDECKS_SOURCE))),
                    ]);
                }
                _ => warn!(
                    feed = self.feed(),
                    index = record.index,
                    "ForceDecks athlete has no full name, skipping athlete row"
                ),
            }
        }

        debug!(teams = seen_teams.len(), "Extracted ForceDecks teams");
        Ok(())
    }
}
