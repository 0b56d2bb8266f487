// Pipeline ingestion: reading source feed documents into memory

pub mod loader;

pub use loader::{load_sources, SourceData};
