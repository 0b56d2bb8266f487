pub mod config;
pub mod constants;
pub mod db;
pub mod error;
pub mod identity;
pub mod logging;
pub mod pipeline;
pub mod schema;

pub use error::{EtlError, Result};
pub use pipeline::{Pipeline, RunSummary};
