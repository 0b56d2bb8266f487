//! Coalescing of partial entity rows.
//!
//! Several feeds (or several records of one feed) can describe the same
//! entity. Rows sharing an entity key are merged into one canonical row where
//! each column takes the first value, in row order, that is neither `null`
//! nor `""`. Conflicting non-empty values are not reported; the earlier row
//! wins.

use serde_json::Value;
use std::collections::HashMap;
use tracing::debug;

use crate::pipeline::storage::{row_key, Row, Table, TableSet};

fn is_missing(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.is_empty(),
        _ => false,
    }
}

/// Merge one group of rows. Columns keep first-seen order; a column with no
/// usable value anywhere in the group becomes `""`.
fn merge_group(group: &[&Row]) -> Row {
    let mut merged = Row::new();

    for row in group {
        for (column, value) in row.iter() {
            let slot = merged.entry(column.clone()).or_insert(Value::Null);
            if is_missing(slot) && !is_missing(value) {
                *slot = value.clone();
            }
        }
    }

    for value in merged.values_mut() {
        if value.is_null() {
            *value = Value::String(String::new());
        }
    }

    merged
}

/// Coalesce rows by `key_column`, one output row per distinct key in
/// first-encountered order. Rows with a missing key are never grouped with
/// each other; each becomes its own output row.
pub fn coalesce_rows(rows: &[Row], key_column: &str) -> Vec<Row> {
    let mut groups: Vec<Vec<&Row>> = Vec::new();
    let mut group_index: HashMap<String, usize> = HashMap::new();

    for row in rows {
        match row.get(key_column).filter(|v| !is_missing(v)) {
            Some(key) => {
                let key = row_key(key);
                match group_index.get(&key) {
                    Some(&i) => groups[i].push(row),
                    None => {
                        group_index.insert(key, groups.len());
                        groups.push(vec![row]);
                    }
                }
            }
            None => groups.push(vec![row]),
        }
    }

    groups.iter().map(|group| merge_group(group)).collect()
}

/// Coalesce a table on its entity key. Tables without a key, or without
/// rows, are returned unchanged.
pub fn coalesce(table: &Table) -> Table {
    let Some(key_column) = table.schema.key else {
        return table.clone();
    };
    if table.is_empty() {
        return table.clone();
    }

    let rows = coalesce_rows(&table.rows, key_column);
    debug!(
        table = table.name(),
        before = table.len(),
        after = rows.len(),
        "Coalesced table"
    );

    Table {
        schema: table.schema,
        rows,
    }
}

/// Coalesce every table of the set in place
pub fn coalesce_all(tables: &mut TableSet) {
    for table in tables.iter_mut() {
        *table = coalesce(table);
    }
}
