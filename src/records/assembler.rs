use tracing::Span;

use super::ImportRecord;
use crate::columns::FieldMapping;
use crate::error::{ImportError, Result};
use crate::normalize::{
    normalize_code, normalize_name, normalize_text, DateNormalizer, Truncator, YearNormalizer,
};
use crate::storage::TableSchema;
use crate::types::{DateField, RawRow, RawValue, YearField};

static NULL: RawValue = RawValue::Null;

/// Turns raw rows into normalized records for one import run.
pub struct RecordAssembler {
    years: YearNormalizer,
    dates: DateNormalizer,
    truncator: Truncator,
    span: Span,
}

impl RecordAssembler {
    pub fn new(reference_year: i32, span: Span) -> Self {
        Self {
            years: YearNormalizer::new(reference_year, span.clone()),
            dates: DateNormalizer::new(span.clone()),
            truncator: Truncator::new(span.clone()),
            span,
        }
    }

    /// Assemble one record. A row wider than the header is rejected so the
    /// caller can skip it.
    pub fn assemble<R: ImportRecord>(&self, row: &RawRow, mapping: &FieldMapping) -> Result<R> {
        if row.overflow > 0 {
            return Err(ImportError::RowProcessing {
                row: row.line,
                message: format!("{} more cells than header columns", row.overflow),
            });
        }
        let fields = RowFields {
            assembler: self,
            row,
            mapping,
            schema: R::schema(),
        };
        tracing::trace!(parent: &self.span, row = row.line, "Assembling row");
        Ok(R::assemble(&fields))
    }
}

/// Canonical-field view of one raw row.
pub struct RowFields<'a> {
    assembler: &'a RecordAssembler,
    row: &'a RawRow,
    mapping: &'a FieldMapping,
    schema: &'a TableSchema,
}

impl RowFields<'_> {
    /// Raw value for `field`; null when the file has no such column.
    pub fn raw(&self, field: &str) -> &RawValue {
        self.mapping
            .source_label(field)
            .and_then(|label| self.row.get(label))
            .unwrap_or(&NULL)
    }

    fn fit(&self, field: &str, value: Option<String>) -> Option<String> {
        self.assembler
            .truncator
            .truncate(field, value, self.schema.max_len(field))
    }

    pub fn name(&self, field: &str) -> Option<String> {
        self.fit(field, normalize_name(self.raw(field)))
    }

    pub fn text(&self, field: &str) -> Option<String> {
        self.fit(field, normalize_text(self.raw(field)))
    }

    pub fn code(&self, field: &str) -> Option<String> {
        self.fit(field, normalize_code(self.raw(field)))
    }

    pub fn year(&self, field: &str) -> YearField {
        self.assembler.years.normalize(self.raw(field))
    }

    pub fn date(&self, field: &str) -> DateField {
        self.assembler.dates.normalize(self.raw(field))
    }
}
