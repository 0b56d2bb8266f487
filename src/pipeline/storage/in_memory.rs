use serde_json::{Map, Value};

use crate::schema::{self, TableSchema};

/// One flat record: column name to scalar or null, in schema column order
pub type Row = Map<String, Value>;

/// Grouping key of a key-column value. JSON text keeps `42` and `"42"` apart.
pub fn row_key(value: &Value) -> String {
    value.to_string()
}

/// Rows of a single entity type
#[derive(Debug, Clone)]
pub struct Table {
    pub schema: &'static TableSchema,
    pub rows: Vec<Row>,
}

impl Table {
    pub fn new(schema: &'static TableSchema) -> Self {
        Self {
            schema,
            rows: Vec::new(),
        }
    }

    pub fn name(&self) -> &'static str {
        self.schema.name
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Build a row against this table's schema and append it
    pub fn insert<I>(&mut self, values: I)
    where
        I: IntoIterator<Item = (&'static str, Option<Value>)>,
    {
        let row = self.schema.build_row(values);
        self.rows.push(row);
    }
}

/// All entity tables of a run, in a fixed, stable order
#[derive(Debug, Clone)]
pub struct TableSet {
    tables: Vec<Table>,
}

impl Default for TableSet {
    fn default() -> Self {
        Self::new()
    }
}

impl TableSet {
    /// One empty table per known entity type
    pub fn new() -> Self {
        Self {
            tables: schema::ALL_TABLES.iter().copied().map(Table::new).collect(),
        }
    }

    pub fn table(&self, schema: &TableSchema) -> &Table {
        self.tables
            .iter()
            .find(|t| std::ptr::eq(t.schema, schema))
            .unwrap_or_else(|| panic!("table {} is not registered", schema.name))
    }

    pub fn table_mut(&mut self, schema: &TableSchema) -> &mut Table {
        self.tables
            .iter_mut()
            .find(|t| std::ptr::eq(t.schema, schema))
            .unwrap_or_else(|| panic!("table {} is not registered", schema.name))
    }

    pub fn get(&self, name: &str) -> Option<&Table> {
        self.tables.iter().find(|t| t.name() == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Table> {
        self.tables.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Table> {
        self.tables.iter_mut()
    }

    pub fn total_rows(&self) -> usize {
        self.tables.iter().map(Table::len).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_new_set_has_every_table_empty() {
        let tables = TableSet::new();
        assert_eq!(tables.iter().count(), schema::ALL_TABLES.len());
        assert_eq!(tables.total_rows(), 0);
        assert!(tables.get("Events").unwrap().is_empty());
    }

    #[test]
    fn test_insert_goes_to_matching_table() {
        let mut tables = TableSet::new();
        tables
            .table_mut(&schema::TEAMS)
            .insert([("Team ID", Some(json!("t1")))]);

        assert_eq!(tables.table(&schema::TEAMS).len(), 1);
        assert_eq!(tables.get("Teams").unwrap().rows[0]["Sport"], Value::Null);
        assert_eq!(tables.total_rows(), 1);
    }

    #[test]
    fn test_row_key_keeps_numbers_and_strings_apart() {
        assert_ne!(row_key(&json!(42)), row_key(&json!("42")));
        assert_eq!(row_key(&json!("t1")), row_key(&json!("t1")));
    }
}
