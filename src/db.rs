use rusqlite::types::Value as SqlValue;
use rusqlite::{params_from_iter, Connection};
use serde_json::{Number, Value};
use std::path::Path;
use tracing::{debug, info};

use crate::error::{EtlError, Result};
use crate::schema;

/// Tables in an order that never deletes a parent before its children
pub const CLEAR_ORDER: &[&str] = &[
    "Consent",
    "Academic",
    "Medical",
    "Athlete_Metadata",
    "Test_Results",
    "Tests",
    "Athlete_Seasons",
    "Seasons",
    "Performance_Results",
    "Performances",
    "Events",
    "Modalities",
    "Teams",
    "Athletes",
];

/// Relational sink backed by a SQLite file.
///
/// The connection lives exactly as long as the sink and is closed when the
/// sink is dropped or explicitly closed.
pub struct SqliteSink {
    conn: Connection,
}

impl SqliteSink {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        info!(path = %path.display(), "Opening database");
        let conn = Connection::open(path)?;
        Ok(Self { conn })
    }

    pub fn open_in_memory() -> Result<Self> {
        Ok(Self {
            conn: Connection::open_in_memory()?,
        })
    }

    /// Close the connection, surfacing any error the implicit drop would swallow
    pub fn close(self) -> Result<()> {
        self.conn.close().map_err(|(_, e)| EtlError::from(e))
    }

    /// Create every entity table that does not exist yet
    pub fn create_schema(&self) -> Result<()> {
        for table in schema::ALL_TABLES {
            let columns: Vec<String> = table.column_names().map(quote_ident).collect();
            let sql = format!(
                "CREATE TABLE IF NOT EXISTS {} ({})",
                quote_ident(table.sql_name),
                columns.join(", ")
            );
            self.conn.execute_batch(&sql)?;
        }
        debug!(tables = schema::ALL_TABLES.len(), "Schema ready");
        Ok(())
    }

    /// Run a statement and fetch every row it returns
    pub fn run_query(&self, sql: &str) -> Result<Vec<Vec<Value>>> {
        let mut stmt = self.conn.prepare(sql)?;
        let column_count = stmt.column_count();
        let mut rows = stmt.query([])?;

        let mut results = Vec::new();
        while let Some(row) = rows.next()? {
            let mut values = Vec::with_capacity(column_count);
            for i in 0..column_count {
                let value: SqlValue = row.get(i)?;
                values.push(sql_to_json(value));
            }
            results.push(values);
        }

        debug!(query = sql, rows = results.len(), "Query executed");
        Ok(results)
    }

    /// Delete all rows from the named tables, or from every table when the
    /// list is empty. Returns the number of rows deleted.
    pub fn delete_table_data(&self, tables: &[&str]) -> Result<usize> {
        if let Some(unknown) = tables.iter().find(|t| !CLEAR_ORDER.contains(*t)) {
            return Err(EtlError::UnknownTable(unknown.to_string()));
        }

        let mut deleted = 0;
        for table in CLEAR_ORDER
            .iter()
            .filter(|t| tables.is_empty() || tables.contains(*t))
        {
            let count = self
                .conn
                .execute(&format!("DELETE FROM {}", quote_ident(table)), [])?;
            info!(table = *table, rows = count, "Cleared table");
            deleted += count;
        }
        Ok(deleted)
    }

    /// Insert every row of an exported document. Returns the number of rows inserted.
    pub fn load_document(&self, document: &Value) -> Result<usize> {
        let entities = document.as_object().ok_or_else(|| EtlError::Database {
            message: "document must be an object of entity tables".to_string(),
        })?;

        let mut inserted = 0;
        for (name, rows) in entities {
            let table =
                schema::find_by_name(name).ok_or_else(|| EtlError::UnknownTable(name.clone()))?;
            let rows = rows.as_array().ok_or_else(|| EtlError::Database {
                message: format!("entity '{}' is not a list of rows", name),
            })?;

            let columns: Vec<&str> = table.column_names().collect();
            let placeholders: Vec<String> =
                (1..=columns.len()).map(|i| format!("?{}", i)).collect();
            let sql = format!(
                "INSERT INTO {} ({}) VALUES ({})",
                quote_ident(table.sql_name),
                columns.iter().copied().map(quote_ident).collect::<Vec<_>>().join(", "),
                placeholders.join(", ")
            );
            let mut stmt = self.conn.prepare(&sql)?;

            for row in rows {
                let values = columns
                    .iter()
                    .map(|c| json_to_sql(row.get(*c).unwrap_or(&Value::Null)));
                stmt.execute(params_from_iter(values))?;
            }

            debug!(table = table.sql_name, rows = rows.len(), "Loaded table");
            inserted += rows.len();
        }

        info!(rows = inserted, "Document loaded");
        Ok(inserted)
    }
}

/// Open a sink, run `f` against it, and close it again whether or not `f` succeeds
pub fn with_sink<P, T, F>(path: P, f: F) -> Result<T>
where
    P: AsRef<Path>,
    F: FnOnce(&SqliteSink) -> Result<T>,
{
    let sink = SqliteSink::open(path)?;
    let result = f(&sink);
    let closed = sink.close();
    let value = result?;
    closed?;
    Ok(value)
}

fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

fn json_to_sql(value: &Value) -> SqlValue {
    match value {
        Value::Null => SqlValue::Null,
        Value::Bool(b) => SqlValue::Integer(i64::from(*b)),
        Value::Number(n) => match n.as_i64() {
            Some(i) => SqlValue::Integer(i),
            None => SqlValue::Real(n.as_f64().unwrap_or_default()),
        },
        Value::String(s) => SqlValue::Text(s.clone()),
        other => SqlValue::Text(other.to_string()),
    }
}

fn sql_to_json(value: SqlValue) -> Value {
    match value {
        SqlValue::Null => Value::Null,
        SqlValue::Integer(i) => Value::from(i),
        SqlValue::Real(f) => Number::from_f64(f).map(Value::Number).unwrap_or(Value::Null),
        SqlValue::Text(s) => Value::String(s),
        SqlValue::Blob(b) => Value::String(String::from_utf8_lossy(&b).into_owned()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_clear_order_covers_every_table() {
        assert_eq!(CLEAR_ORDER.len(), schema::ALL_TABLES.len());
        for table in schema::ALL_TABLES {
            assert!(CLEAR_ORDER.contains(&table.sql_name), "{} not cleared", table.sql_name);
        }
    }

    #[test]
    fn test_load_and_query_round_trip() {
        let sink = SqliteSink::open_in_memory().unwrap();
        sink.create_schema().unwrap();

        let inserted = sink
            .load_document(&json!({
                "Teams": [
                    {"Team ID": "t1", "Sport": "Soccer", "Sex": "", "Season": ""},
                    {"Team ID": "t2", "Sport": null}
                ],
                "Events": []
            }))
            .unwrap();
        assert_eq!(inserted, 2);

        let rows = sink
            .run_query("SELECT \"Team ID\", \"Sport\" FROM \"Teams\" ORDER BY \"Team ID\"")
            .unwrap();
        assert_eq!(rows, vec![vec![json!("t1"), json!("Soccer")], vec![json!("t2"), Value::Null]]);
    }

    #[test]
    fn test_scalar_conversions() {
        assert_eq!(json_to_sql(&json!(true)), SqlValue::Integer(1));
        assert_eq!(json_to_sql(&json!(9.5)), SqlValue::Real(9.5));
        assert_eq!(sql_to_json(SqlValue::Integer(3)), json!(3));
        assert_eq!(sql_to_json(SqlValue::Real(f64::NAN)), Value::Null);
    }

    #[test]
    fn test_delete_selected_tables() {
        let sink = SqliteSink::open_in_memory().unwrap();
        sink.create_schema().unwrap();
        sink.load_document(&json!({
            "Teams": [{"Team ID": "t1"}],
            "Athletes": [{"Athlete UUID": "u1"}]
        }))
        .unwrap();

        assert_eq!(sink.delete_table_data(&["Teams"]).unwrap(), 1);
        let remaining = sink.run_query("SELECT COUNT(*) FROM \"Athletes\"").unwrap();
        assert_eq!(remaining, vec![vec![json!(1)]]);

        assert_eq!(sink.delete_table_data(&[]).unwrap(), 1);
    }

    #[test]
    fn test_modalities_cleared_before_teams() {
        let events = CLEAR_ORDER.iter().position(|t| *t == "Events").unwrap();
        let modalities = CLEAR_ORDER.iter().position(|t| *t == "Modalities").unwrap();
        let teams = CLEAR_ORDER.iter().position(|t| *t == "Teams").unwrap();
        assert!(events < modalities && modalities < teams);

        let sink = SqliteSink::open_in_memory().unwrap();
        sink.create_schema().unwrap();
        sink.load_document(&json!({"Modalities": [{"Modality ID": "m1"}]}))
            .unwrap();
        assert_eq!(sink.delete_table_data(&["Modalities"]).unwrap(), 1);
    }

    #[test]
    fn test_delete_unknown_table_fails() {
        let sink = SqliteSink::open_in_memory().unwrap();
        let err = sink.delete_table_data(&["Rosters"]).unwrap_err();
        assert!(matches!(err, EtlError::UnknownTable(ref t) if t == "Rosters"));
    }

    #[test]
    fn test_load_rejects_unknown_entity() {
        let sink = SqliteSink::open_in_memory().unwrap();
        sink.create_schema().unwrap();
        assert!(sink.load_document(&json!({"Rosters": []})).is_err());
    }
}
