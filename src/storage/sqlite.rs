use rusqlite::types::ToSqlOutput;
use rusqlite::{params_from_iter, Connection, ToSql};
use std::path::Path;
use tracing::Span;

use super::{Dialect, RecordStore, SchemaMode, SqlValue, TableSchema};
use crate::error::Result;

impl ToSql for SqlValue {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        match self {
            SqlValue::Text(v) => v.to_sql(),
            SqlValue::Int(v) => v.to_sql(),
            SqlValue::Bool(v) => v.to_sql(),
            SqlValue::Date(v) => v.to_sql(),
        }
    }
}

/// SQLite-backed store for local runs.
pub struct SqliteStore {
    conn: Connection,
    span: Span,
}

impl SqliteStore {
    pub fn open<P: AsRef<Path>>(path: P, span: Span) -> Result<Self> {
        if let Some(parent) = path.as_ref().parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let conn = Connection::open(path)?;
        Ok(Self { conn, span })
    }

    pub fn open_in_memory(span: Span) -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        Ok(Self { conn, span })
    }

    pub fn connection(&self) -> &Connection {
        &self.conn
    }
}

impl RecordStore for SqliteStore {
    fn backend(&self) -> &'static str {
        "sqlite"
    }

    fn write_table(
        &mut self,
        table: &TableSchema,
        mode: SchemaMode,
        rows: &[Vec<SqlValue>],
    ) -> Result<usize> {
        let dialect = Dialect::Sqlite;
        let span = self.span.clone();
        let tx = self.conn.transaction()?;

        for statement in dialect.prepare_statements(table, mode) {
            tx.execute_batch(&statement)?;
        }
        tracing::info!(parent: &span, table = %table.name, ?mode, "Table ready");

        let mut inserted = 0;
        {
            let mut stmt = tx.prepare(&dialect.insert_sql(table))?;
            for row in rows {
                inserted += stmt.execute(params_from_iter(row.iter()))?;
            }
        }
        tx.commit()?;

        tracing::info!(parent: &span, table = %table.name, inserted, "Committed rows");
        Ok(inserted)
    }
}
