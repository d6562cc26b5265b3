use postgres::types::ToSql;
use postgres::{Client, NoTls};
use tracing::Span;

use super::{Dialect, RecordStore, SchemaMode, SqlValue, TableSchema};
use crate::config::DatabaseConfig;
use crate::error::Result;

/// PostgreSQL store, the production target.
pub struct PostgresStore {
    client: Client,
    span: Span,
}

impl PostgresStore {
    /// Open one connection for the whole import run.
    pub fn connect(config: &DatabaseConfig, span: Span) -> Result<Self> {
        tracing::info!(
            parent: &span,
            host = %config.host,
            port = config.port,
            dbname = %config.dbname,
            "Connecting to PostgreSQL"
        );
        let client = postgres::Config::new()
            .host(&config.host)
            .port(config.port)
            .dbname(&config.dbname)
            .user(&config.user)
            .password(&config.password)
            .connect(NoTls)?;
        Ok(Self { client, span })
    }
}

fn to_param(value: &SqlValue) -> Box<dyn ToSql + Sync> {
    match value {
        SqlValue::Text(v) => Box::new(v.clone()),
        SqlValue::Int(v) => Box::new(*v),
        SqlValue::Bool(v) => Box::new(*v),
        SqlValue::Date(v) => Box::new(*v),
    }
}

impl RecordStore for PostgresStore {
    fn backend(&self) -> &'static str {
        "postgres"
    }

    fn write_table(
        &mut self,
        table: &TableSchema,
        mode: SchemaMode,
        rows: &[Vec<SqlValue>],
    ) -> Result<usize> {
        let dialect = Dialect::Postgres;
        let span = self.span.clone();
        let mut tx = self.client.transaction()?;

        for statement in dialect.prepare_statements(table, mode) {
            tx.batch_execute(&statement)?;
        }
        tracing::info!(parent: &span, table = %table.name, ?mode, "Table ready");

        let stmt = tx.prepare(&dialect.insert_sql(table))?;
        let mut inserted = 0;
        for row in rows {
            let owned: Vec<Box<dyn ToSql + Sync>> = row.iter().map(to_param).collect();
            let params: Vec<&(dyn ToSql + Sync)> = owned.iter().map(|p| p.as_ref()).collect();
            inserted += tx.execute(&stmt, &params)? as usize;
        }
        tx.commit()?;

        tracing::info!(parent: &span, table = %table.name, inserted, "Committed rows");
        Ok(inserted)
    }
}
