// Pipeline processing: normalization of source feeds and coalescing of entity rows

pub mod conflation;
pub mod normalize;

pub use conflation::{coalesce, coalesce_all, coalesce_rows};
