//! Source normalization: mapping each feed's native record shape onto the
//! entity tables, with cross-entity keys left unresolved where a feed does
//! not carry them.

pub mod normalizers;
pub mod registry;

pub use normalizers::{SourceNormalizer, SourceRecord};
pub use registry::NormalizationRegistry;
