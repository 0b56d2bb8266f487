//! Single-pass batch transform: load feeds, normalize, coalesce, export.

pub mod export;
pub mod ingestion;
pub mod processing;
pub mod storage;

use serde::Serialize;
use serde_json::Value;
use std::path::Path;
use std::time::Instant;
use tracing::{info, instrument};

use crate::config::Config;
use crate::error::Result;
use ingestion::SourceData;
use processing::normalize::NormalizationRegistry;
use storage::TableSet;

/// Row count of one exported table
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct TableCount {
    pub name: String,
    pub rows: usize,
}

/// Result of a complete pipeline run
#[derive(Debug, Serialize)]
pub struct RunSummary {
    pub source_records: usize,
    pub tables: Vec<TableCount>,
    pub output_file: String,
}

impl RunSummary {
    pub fn total_rows(&self) -> usize {
        self.tables.iter().map(|t| t.rows).sum()
    }
}

pub struct Pipeline {
    registry: NormalizationRegistry,
}

impl Default for Pipeline {
    fn default() -> Self {
        Self::new()
    }
}

impl Pipeline {
    pub fn new() -> Self {
        Self {
            registry: NormalizationRegistry::new(),
        }
    }

    /// Normalize every feed and coalesce each table to one row per key
    pub fn transform(&self, sources: &SourceData) -> Result<TableSet> {
        let mut tables = self.registry.normalize_all(sources)?;
        processing::coalesce_all(&mut tables);
        Ok(tables)
    }

    /// Transform and build the output document without touching the filesystem
    pub fn build_document(&self, sources: &SourceData) -> Result<Value> {
        let tables = self.transform(sources)?;
        Ok(export::export(&tables))
    }

    /// Run the full transform for the configured feeds and write the document
    /// to `output`. Nothing is written unless every step succeeds.
    #[instrument(skip_all, fields(output = %output.as_ref().display()))]
    pub fn run<P: AsRef<Path>>(&self, config: &Config, output: P) -> Result<RunSummary> {
        let started = Instant::now();

        let sources = ingestion::load_sources(&config.inputs)?;
        info!(records = sources.total_records(), "Loaded source feeds");

        let tables = self.transform(&sources)?;
        let document = export::export(&tables);
        export::write_document(&document, output.as_ref())?;

        let summary = RunSummary {
            source_records: sources.total_records(),
            tables: tables
                .iter()
                .map(|t| TableCount {
                    name: t.name().to_string(),
                    rows: t.len(),
                })
                .collect(),
            output_file: output.as_ref().display().to_string(),
        };

        info!(
            rows = summary.total_rows(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Pipeline finished"
        );
        Ok(summary)
    }
}
