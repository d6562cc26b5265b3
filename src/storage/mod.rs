//! Record stores. Each backend receives a whole table's rows at once and
//! writes them in a single transaction.

pub mod in_memory;
pub mod pg;
pub mod schema;
pub mod sqlite;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::Result;
pub use in_memory::{InMemoryStore, StoredTable};
pub use pg::PostgresStore;
pub use schema::{Column, ColumnKind, Dialect, TableSchema};
pub use sqlite::SqliteStore;

/// What to do with an existing target table before loading.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SchemaMode {
    /// Create the table and its indexes only if they do not exist yet
    #[default]
    CreateIfMissing,
    /// Drop the table, then create it from scratch
    Recreate,
}

/// A typed, nullable cell bound to an insert statement.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum SqlValue {
    Text(Option<String>),
    Int(Option<i32>),
    Bool(bool),
    Date(Option<NaiveDate>),
}

impl SqlValue {
    pub fn is_null(&self) -> bool {
        match self {
            SqlValue::Text(v) => v.is_none(),
            SqlValue::Int(v) => v.is_none(),
            SqlValue::Bool(_) => false,
            SqlValue::Date(v) => v.is_none(),
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            SqlValue::Text(v) => v.as_deref(),
            _ => None,
        }
    }
}

/// Destination for assembled records.
pub trait RecordStore {
    /// Short backend name for logs
    fn backend(&self) -> &'static str;

    /// Prepare `table` according to `mode` and insert every row, all inside
    /// one transaction. Returns the number of rows inserted. On error nothing
    /// from this call is kept.
    fn write_table(
        &mut self,
        table: &TableSchema,
        mode: SchemaMode,
        rows: &[Vec<SqlValue>],
    ) -> Result<usize>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_mode_defaults_to_create_if_missing() {
        assert_eq!(SchemaMode::default(), SchemaMode::CreateIfMissing);
        let mode: SchemaMode = serde_json::from_str("\"recreate\"").unwrap();
        assert_eq!(mode, SchemaMode::Recreate);
    }

    #[test]
    fn test_sql_value_nullness() {
        assert!(SqlValue::Text(None).is_null());
        assert!(SqlValue::Date(None).is_null());
        assert!(!SqlValue::Bool(false).is_null());
        assert_eq!(SqlValue::Text(Some("Omaha".into())).as_text(), Some("Omaha"));
    }
}
