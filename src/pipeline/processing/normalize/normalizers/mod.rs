// Base trait and utilities for feed-specific normalizers
pub mod base;

// Individual normalizer implementations
pub mod catapult_activities;
pub mod catapult_periods;
pub mod catapult_roster;
pub mod forcedecks_athletes;
pub mod forcedecks_tests;
pub mod supplemental;

// Re-export the main components
pub use base::{SourceNormalizer, SourceRecord};
pub use catapult_activities::CatapultActivitiesNormalizer;
pub use catapult_periods::CatapultPeriodsNormalizer;
pub use catapult_roster::CatapultRosterNormalizer;
pub use forcedecks_athletes::ForceDecksAthletesNormalizer;
pub use forcedecks_tests::ForceDecksTestsNormalizer;
pub use supplemental::SupplementalRecordNormalizer;
