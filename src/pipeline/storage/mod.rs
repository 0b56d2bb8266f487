// In-memory record store for the entity tables built during one run

pub mod in_memory;

pub use in_memory::{row_key, Row, Table, TableSet};
