//! Column layout of every entity table in the relational record set.
//!
//! Each table lists its columns in output order together with the value a
//! column takes when the source record does not supply one. Foreign keys that
//! no feed carries default to `null` and are filled by a later join step.

use serde_json::Value;
use std::collections::HashMap;

use crate::pipeline::storage::Row;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnDefault {
    /// Missing values become `""`
    Empty,
    /// Missing values become `null`
    Null,
}

#[derive(Debug)]
pub struct Column {
    pub name: &'static str,
    pub default: ColumnDefault,
}

impl Column {
    pub const fn empty(name: &'static str) -> Self {
        Self {
            name,
            default: ColumnDefault::Empty,
        }
    }

    pub const fn null(name: &'static str) -> Self {
        Self {
            name,
            default: ColumnDefault::Null,
        }
    }

    pub fn default_value(&self) -> Value {
        match self.default {
            ColumnDefault::Empty => Value::String(String::new()),
            ColumnDefault::Null => Value::Null,
        }
    }
}

#[derive(Debug)]
pub struct TableSchema {
    /// Entity name used as the key in the exported document
    pub name: &'static str,
    /// Table name in the relational sink
    pub sql_name: &'static str,
    /// Entity key column; `None` disables coalescing
    pub key: Option<&'static str>,
    pub columns: &'static [Column],
}

impl TableSchema {
    pub fn column_names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.columns.iter().map(|c| c.name)
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.columns.iter().any(|c| c.name == name)
    }

    /// Build a row with every column of this table in schema order.
    ///
    /// `None` (or an omitted column) takes the column default.
    pub fn build_row<I>(&self, values: I) -> Row
    where
        I: IntoIterator<Item = (&'static str, Option<Value>)>,
    {
        let mut provided: HashMap<&str, Option<Value>> = values.into_iter().collect();
        debug_assert!(
            provided.keys().all(|k| self.has_column(k)),
            "unknown column for table {}: {:?}",
            self.name,
            provided.keys().filter(|k| !self.has_column(k)).collect::<Vec<_>>()
        );

        let mut row = Row::new();
        for column in self.columns {
            let value = provided
                .remove(column.name)
                .flatten()
                .unwrap_or_else(|| column.default_value());
            row.insert(column.name.to_string(), value);
        }
        row
    }
}

pub static ATHLETES: TableSchema = TableSchema {
    name: "Athletes",
    sql_name: "Athletes",
    key: Some("Athlete UUID"),
    columns: &[
        Column::null("Athlete UUID"),
        Column::empty("First Name"),
        Column::empty("Last Name"),
        Column::empty("Sex"),
        Column::empty("Home State"),
        Column::empty("Home Town"),
        Column::empty("High School"),
        Column::empty("Date of Birth"),
        Column::empty("Year of Birth"),
        Column::empty("Source"),
        Column::null("Is Current"),
    ],
};

pub static TEAMS: TableSchema = TableSchema {
    name: "Teams",
    sql_name: "Teams",
    key: Some("Team ID"),
    columns: &[
        Column::null("Team ID"),
        Column::null("Sport"),
        Column::null("Sex"),
        Column::null("Season"),
    ],
};

pub static SEASONS: TableSchema = TableSchema {
    name: "Seasons",
    sql_name: "Seasons",
    key: Some("Season ID"),
    columns: &[
        Column::null("Season ID"),
        Column::empty("Year"),
        Column::null("Sport"),
    ],
};

// No stable key exists until seasons are mapped, so rows are never coalesced
pub static ATHLETE_SEASONS: TableSchema = TableSchema {
    name: "Athlete Seasons",
    sql_name: "Athlete_Seasons",
    key: None,
    columns: &[
        Column::null("Athlete Season ID"),
        Column::null("Athlete UUID"),
        Column::null("Team ID"),
        Column::null("Season ID"),
    ],
};

pub static EVENTS: TableSchema = TableSchema {
    name: "Events",
    sql_name: "Events",
    key: Some("Event ID"),
    columns: &[
        Column::null("Event ID"),
        Column::null("Team ID"),
        Column::empty("Event Type"),
        Column::null("Team Opponent"),
        Column::null("Start Unix"),
        Column::null("End Unix"),
        Column::null("Team Result"),
    ],
};

pub static PERFORMANCES: TableSchema = TableSchema {
    name: "Performances",
    sql_name: "Performances",
    key: Some("Performance ID"),
    columns: &[
        Column::null("Performance ID"),
        Column::null("Event ID"),
        Column::null("Athlete UUID"),
        Column::empty("Team ID"),
        Column::null("Start Unix"),
        Column::null("End Unix"),
    ],
};

pub static PERFORMANCE_RESULTS: TableSchema = TableSchema {
    name: "Performance Results",
    sql_name: "Performance_Results",
    key: Some("Performance Result ID"),
    columns: &[
        Column::null("Performance Result ID"),
        Column::null("Performance ID"),
        Column::null("Athlete UUID"),
        Column::empty("Team ID"),
        Column::null("Modality ID"),
        Column::null("Result"),
        Column::null("Is Raw"),
    ],
};

pub static TESTS: TableSchema = TableSchema {
    name: "Tests",
    sql_name: "Tests",
    key: Some("Test ID"),
    columns: &[
        Column::null("Test ID"),
        Column::null("Athlete UUID"),
        Column::null("Team ID"),
        Column::null("Modality ID"),
        Column::null("Start Unix"),
        Column::null("End Unix"),
        Column::null("Date Uploaded"),
        Column::null("Test Type"),
    ],
};

pub static TEST_RESULTS: TableSchema = TableSchema {
    name: "Test Results",
    sql_name: "Test_Results",
    key: Some("Test Result ID"),
    columns: &[
        Column::null("Test Result ID"),
        Column::null("Test ID"),
        Column::null("Athlete UUID"),
        Column::null("Team ID"),
        Column::null("Modality ID"),
        Column::null("Result"),
        Column::null("Is Raw"),
    ],
};

// Referenced by results and tests; no feed supplies modality rows yet
pub static MODALITIES: TableSchema = TableSchema {
    name: "Modalities",
    sql_name: "Modalities",
    key: Some("Modality ID"),
    columns: &[Column::null("Modality ID"), Column::null("Modality Name")],
};

pub static ATHLETE_METADATA: TableSchema = TableSchema {
    name: "Athlete Metadata",
    sql_name: "Athlete_Metadata",
    key: Some("Athlete UUID"),
    columns: &[
        Column::null("Athlete UUID"),
        Column::empty("Sex"),
        Column::null("Velocity Max"),
        Column::null("Acceleration Max"),
        Column::null("Heart Rate Max"),
        Column::null("Player Load Max"),
        Column::null("Weight"),
        Column::null("Height"),
        Column::empty("Position"),
        Column::empty("Jersey"),
    ],
};

const RECORD_COLUMNS: &[Column] = &[
    Column::null("Record ID"),
    Column::null("Athlete UUID"),
    Column::null("Payload"),
];

pub static MEDICAL_RECORDS: TableSchema = TableSchema {
    name: "Medical Records",
    sql_name: "Medical",
    key: Some("Record ID"),
    columns: RECORD_COLUMNS,
};

pub static ACADEMIC_RECORDS: TableSchema = TableSchema {
    name: "Academic Records",
    sql_name: "Academic",
    key: Some("Record ID"),
    columns: RECORD_COLUMNS,
};

pub static CONSENT_RECORDS: TableSchema = TableSchema {
    name: "Consent Records",
    sql_name: "Consent",
    key: Some("Record ID"),
    columns: RECORD_COLUMNS,
};

/// Every table, in export order
pub static ALL_TABLES: &[&TableSchema] = &[
    &ATHLETES,
    &TEAMS,
    &SEASONS,
    &ATHLETE_SEASONS,
    &EVENTS,
    &PERFORMANCES,
    &PERFORMANCE_RESULTS,
    &TESTS,
    &TEST_RESULTS,
    &MODALITIES,
    &ATHLETE_METADATA,
    &MEDICAL_RECORDS,
    &ACADEMIC_RECORDS,
    &CONSENT_RECORDS,
];

pub fn find_by_name(name: &str) -> Option<&'static TableSchema> {
    ALL_TABLES.iter().copied().find(|t| t.name == name)
}
