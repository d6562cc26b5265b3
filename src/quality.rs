use serde::Serialize;
use std::fmt;
use tracing::Span;

use crate::storage::{ColumnKind, SqlValue, TableSchema};

const COMPANION_SUFFIXES: &[&str] = &["_uncertain", "_uncertainty_type", "_original_text"];

/// Per-field data quality for one import.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldQuality {
    pub field: String,
    pub nulls: usize,
    /// Non-null parsed values, for year and date fields
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parsed: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uncertain: Option<usize>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QualityReport {
    pub table: String,
    pub total_rows: usize,
    pub assembled: usize,
    pub skipped: usize,
    pub fields: Vec<FieldQuality>,
}

impl QualityReport {
    /// Summarize assembled rows. `rows` hold values in `schema` column order.
    pub fn build(
        schema: &TableSchema,
        total_rows: usize,
        skipped: usize,
        rows: &[Vec<SqlValue>],
    ) -> Self {
        let position = |name: &str| schema.columns.iter().position(|c| c.name == name);

        let fields = schema
            .columns
            .iter()
            .enumerate()
            .filter(|(_, column)| !is_companion(schema, &column.name))
            .map(|(index, column)| {
                let nulls = rows.iter().filter(|r| r[index].is_null()).count();
                let (parsed, uncertain) = match column.kind {
                    ColumnKind::Integer | ColumnKind::Date => {
                        let flag = position(&format!("{}_uncertain", column.name));
                        let uncertain = flag.map(|flag| {
                            rows.iter()
                                .filter(|r| r[flag] == SqlValue::Bool(true))
                                .count()
                        });
                        (Some(rows.len() - nulls), uncertain)
                    }
                    _ => (None, None),
                };
                FieldQuality {
                    field: column.name.clone(),
                    nulls,
                    parsed,
                    uncertain,
                }
            })
            .collect();

        Self {
            table: schema.name.clone(),
            total_rows,
            assembled: rows.len(),
            skipped,
            fields,
        }
    }

    pub fn field(&self, name: &str) -> Option<&FieldQuality> {
        self.fields.iter().find(|f| f.field == name)
    }

    pub fn log(&self, span: &Span) {
        tracing::info!(
            parent: span,
            table = %self.table,
            total_rows = self.total_rows,
            assembled = self.assembled,
            skipped = self.skipped,
            "Data quality report"
        );
        for field in &self.fields {
            tracing::info!(
                parent: span,
                field = %field.field,
                nulls = field.nulls,
                parsed = field.parsed,
                uncertain = field.uncertain,
                "Field quality"
            );
        }
    }
}

fn is_companion(schema: &TableSchema, name: &str) -> bool {
    COMPANION_SUFFIXES.iter().any(|suffix| {
        name.strip_suffix(suffix)
            .map(|base| schema.column(base).is_some())
            .unwrap_or(false)
    })
}

impl fmt::Display for QualityReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Table: {}", self.table)?;
        writeln!(
            f,
            "Rows: {} read, {} assembled, {} skipped",
            self.total_rows, self.assembled, self.skipped
        )?;
        writeln!(f, "{:<30} {:>8} {:>8} {:>10}", "field", "nulls", "parsed", "uncertain")?;
        for field in &self.fields {
            let parsed = field.parsed.map(|n| n.to_string()).unwrap_or_else(|| "-".into());
            let uncertain = field.uncertain.map(|n| n.to_string()).unwrap_or_else(|| "-".into());
            writeln!(
                f,
                "{:<30} {:>8} {:>8} {:>10}",
                field.field, field.nulls, parsed, uncertain
            )?;
        }
        Ok(())
    }
}
