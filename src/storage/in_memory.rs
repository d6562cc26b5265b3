use std::collections::HashMap;

use super::{RecordStore, SchemaMode, SqlValue, TableSchema};
use crate::error::{ImportError, Result};

/// Rows written to one in-memory table.
#[derive(Debug, Clone, Default)]
pub struct StoredTable {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<SqlValue>>,
}

impl StoredTable {
    /// Value of `column` in row `index`
    pub fn value(&self, index: usize, column: &str) -> Option<&SqlValue> {
        let position = self.columns.iter().position(|c| c == column)?;
        self.rows.get(index)?.get(position)
    }
}

/// Store that keeps tables in memory, for tests.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    tables: HashMap<String, StoredTable>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn table(&self, name: &str) -> Option<&StoredTable> {
        self.tables.get(name)
    }
}

impl RecordStore for InMemoryStore {
    fn backend(&self) -> &'static str {
        "memory"
    }

    fn write_table(
        &mut self,
        table: &TableSchema,
        mode: SchemaMode,
        rows: &[Vec<SqlValue>],
    ) -> Result<usize> {
        let width = table.columns.len();
        if let Some(bad) = rows.iter().position(|r| r.len() != width) {
            return Err(ImportError::Storage {
                message: format!(
                    "row {} has {} values, table {} has {} columns",
                    bad,
                    rows[bad].len(),
                    table.name,
                    width
                ),
            });
        }

        if mode == SchemaMode::Recreate {
            self.tables.remove(&table.name);
        }
        let stored = self
            .tables
            .entry(table.name.clone())
            .or_insert_with(|| StoredTable {
                columns: table.column_names().iter().map(|c| c.to_string()).collect(),
                rows: Vec::new(),
            });
        stored.rows.extend(rows.iter().cloned());
        Ok(rows.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn schema() -> TableSchema {
        TableSchema::builder("people")
            .varchar("family_name", 200)
            .text("comments")
            .build()
    }

    fn row(name: &str) -> Vec<SqlValue> {
        vec![SqlValue::Text(Some(name.into())), SqlValue::Text(None)]
    }

    #[test]
    fn test_rows_are_kept_per_table() {
        let mut store = InMemoryStore::new();
        store
            .write_table(&schema(), SchemaMode::CreateIfMissing, &[row("Smith")])
            .unwrap();
        store
            .write_table(&schema(), SchemaMode::CreateIfMissing, &[row("Jones")])
            .unwrap();
        let table = store.table("people").unwrap();
        assert_eq!(table.rows.len(), 2);
        assert_eq!(table.value(1, "family_name").and_then(|v| v.as_text()), Some("Jones"));

        store
            .write_table(&schema(), SchemaMode::Recreate, &[row("Brown")])
            .unwrap();
        assert_eq!(store.table("people").unwrap().rows.len(), 1);
    }

    #[test]
    fn test_malformed_batch_writes_nothing() {
        let mut store = InMemoryStore::new();
        let err = store
            .write_table(
                &schema(),
                SchemaMode::CreateIfMissing,
                &[row("Smith"), vec![SqlValue::Bool(true)]],
            )
            .unwrap_err();
        assert!(matches!(err, ImportError::Storage { .. }));
        assert!(store.table("people").is_none());
    }
}
