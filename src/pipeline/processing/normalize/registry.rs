use tracing::{debug, info};

use super::normalizers::{
    CatapultActivitiesNormalizer, CatapultPeriodsNormalizer, CatapultRosterNormalizer,
    ForceDecksAthletesNormalizer, ForceDecksTestsNormalizer, SourceNormalizer,
    SupplementalRecordNormalizer,
};
use crate::error::Result;
use crate::pipeline::ingestion::SourceData;
use crate::pipeline::storage::TableSet;

/// Ordered registry of feed normalizers.
///
/// Normalizers run in registration order, which is also the order rows land
/// in each table; the coalescer prefers values from earlier rows.
pub struct NormalizationRegistry {
    normalizers: Vec<Box<dyn SourceNormalizer>>,
}

impl Default for NormalizationRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl NormalizationRegistry {
    /// Create a registry with every built-in normalizer. The Catapult roster
    /// comes first so its athlete attributes win over ForceDecks'.
    pub fn new() -> Self {
        let mut registry = Self::empty();

        registry.register(Box::new(CatapultRosterNormalizer::new()));
        registry.register(Box::new(ForceDecksAthletesNormalizer::new()));
        registry.register(Box::new(CatapultPeriodsNormalizer::new()));
        registry.register(Box::new(CatapultActivitiesNormalizer::new()));
        registry.register(Box::new(ForceDecksTestsNormalizer::new()));
        registry.register(Box::new(SupplementalRecordNormalizer::medical()));
        registry.register(Box::new(SupplementalRecordNormalizer::academic()));
        registry.register(Box::new(SupplementalRecordNormalizer::consent()));

        registry
    }

    pub fn empty() -> Self {
        Self {
            normalizers: Vec::new(),
        }
    }

    /// Register a normalizer, replacing any existing one for the same feed
    pub fn register(&mut self, normalizer: Box<dyn SourceNormalizer>) {
        if let Some(slot) = self
            .normalizers
            .iter_mut()
            .find(|n| n.feed() == normalizer.feed())
        {
            *slot = normalizer;
        } else {
            self.normalizers.push(normalizer);
        }
    }

    /// Get the normalizer for a feed
    pub fn get_normalizer(&self, feed: &str) -> Option<&dyn SourceNormalizer> {
        self.normalizers
            .iter()
            .find(|n| n.feed() == feed)
            .map(|n| n.as_ref())
    }

    /// List all registered feeds
    pub fn list_feeds(&self) -> Vec<&str> {
        self.normalizers.iter().map(|n| n.feed()).collect()
    }

    /// Run every registered normalizer over its feed. The first failing
    /// record aborts the whole pass.
    pub fn normalize_all(&self, sources: &SourceData) -> Result<TableSet> {
        let mut tables = TableSet::new();

        for normalizer in &self.normalizers {
            let records = sources.records(normalizer.feed());
            let before = tables.total_rows();
            normalizer.normalize(records, &mut tables)?;
            debug!(
                normalizer = normalizer.name(),
                records = records.len(),
                rows = tables.total_rows() - before,
                "Normalized feed"
            );
        }

        info!(rows = tables.total_rows(), "Normalization complete");
        Ok(tables)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants;
    use crate::schema;
    use serde_json::json;

    #[test]
    fn test_registry_has_built_in_normalizers() {
        let registry = NormalizationRegistry::new();

        let feeds = registry.list_feeds();
        for feed in constants::get_supported_feeds() {
            assert!(feeds.contains(&feed), "missing normalizer for {}", feed);
        }
        assert!(registry.get_normalizer("unknown_feed").is_none());
    }

    #[test]
    fn test_register_replaces_existing_feed() {
        let mut registry = NormalizationRegistry::new();
        let count = registry.list_feeds().len();

        registry.register(Box::new(CatapultPeriodsNormalizer::new()));

        assert_eq!(registry.list_feeds().len(), count);
    }

    #[test]
    fn test_normalize_all_with_no_feeds_is_empty() {
        let tables = NormalizationRegistry::new()
            .normalize_all(&SourceData::new())
            .unwrap();
        assert_eq!(tables.total_rows(), 0);
    }

    #[test]
    fn test_roster_rows_precede_forcedecks_rows() {
        let mut sources = SourceData::new();
        sources.insert(
            constants::FORCEDECKS_ATHLETES_FEED,
            vec![json!({"teamId": "t1", "givenName": "Albert", "familyName": "Gator"})],
        );
        sources.insert(
            constants::ATHLETES_FEED,
            vec![json!({"id": "a1", "first_name": "Albert", "last_name": "Gator"})],
        );

        let tables = NormalizationRegistry::new().normalize_all(&sources).unwrap();

        let athletes = &tables.table(&schema::ATHLETES).rows;
        assert_eq!(athletes.len(), 2);
        assert_eq!(athletes[0]["Source"], json!("Catapult"));
        assert_eq!(athletes[1]["Source"], json!("ForceDecks"));
    }
}
