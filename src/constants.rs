/// Feed keys, used both as config entries and as the list field inside each feed document
pub const ATHLETES_FEED: &str = "athletes";
pub const FORCEDECKS_ATHLETES_FEED: &str = "forcedecks_athletes";
pub const FORCEDECKS_TESTS_FEED: &str = "forcedecks_tests";
pub const PERIODS_FEED: &str = "periods";
pub const ACTIVITIES_FEED: &str = "activities";
pub const MEDICAL_FEED: &str = "medical";
pub const ACADEMIC_FEED: &str = "academic";
pub const CONSENT_FEED: &str = "consent";

// Source tags written to the Athletes "Source" column
pub const CATAPULT_SOURCE: &str = "Catapult";
pub const FORCEDECKS_SOURCE: &str = "ForceDecks";

/// Attribute type label that carries a ForceDecks team's sport
pub const SPORT_ATTRIBUTE: &str = "Sport";

pub const DEFAULT_CONFIG_PATH: &str = "config.toml";
pub const DEFAULT_OUTPUT_PATH: &str = "formatted_output.json";
pub const DEFAULT_DATABASE_PATH: &str = "databank.sqlite";

/// Get all feed keys in load order
pub fn get_supported_feeds() -> Vec<&'static str> {
    vec![
        ATHLETES_FEED,
        FORCEDECKS_ATHLETES_FEED,
        FORCEDECKS_TESTS_FEED,
        PERIODS_FEED,
        ACTIVITIES_FEED,
        MEDICAL_FEED,
        ACADEMIC_FEED,
        CONSENT_FEED,
    ]
}
