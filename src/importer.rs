use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::Span;

use crate::columns::{ColumnResolver, FieldMapping};
use crate::error::Result;
use crate::quality::QualityReport;
use crate::records::{DatasetKind, ImportRecord, OrphanRecord, RecordAssembler, StudentRecord};
use crate::source::read_source;
use crate::storage::{RecordStore, SchemaMode, SqlValue};

/// Records assembled from one file, not yet stored.
#[derive(Debug)]
pub struct Prepared<R> {
    pub mapping: FieldMapping,
    pub records: Vec<R>,
    pub report: QualityReport,
}

/// What `inspect` prints: the mapping chosen and the resulting data quality.
#[derive(Debug, Clone, Serialize)]
pub struct Inspection {
    pub dataset: DatasetKind,
    pub file: PathBuf,
    pub mapping: FieldMapping,
    pub report: QualityReport,
}

#[derive(Debug, Clone, Serialize)]
pub struct ImportSummary {
    pub dataset: DatasetKind,
    pub file: PathBuf,
    pub backend: &'static str,
    pub convention: String,
    pub rows_read: usize,
    pub imported: usize,
    pub skipped: usize,
}

/// Drives one file through read, column resolution, assembly and storage.
pub struct Importer {
    reference_year: i32,
    convention: Option<String>,
    span: Span,
}

impl Importer {
    pub fn new(reference_year: i32, span: Span) -> Self {
        Self {
            reference_year,
            convention: None,
            span,
        }
    }

    /// Skip detection and use the named header convention.
    pub fn with_convention(mut self, convention: Option<String>) -> Self {
        self.convention = convention;
        self
    }

    /// Read and assemble a file without touching storage.
    ///
    /// Rows that fail on their own are logged and skipped; file-level
    /// problems such as an unrecognized header abort.
    pub fn prepare<R: ImportRecord>(&self, path: &Path) -> Result<Prepared<R>> {
        let span = tracing::info_span!(
            parent: &self.span,
            "prepare",
            table = %R::schema().name,
            file = %path.display()
        );

        let table = read_source(path, &span)?;
        let mapping = ColumnResolver::new(span.clone()).resolve(
            R::catalog(),
            &table.headers,
            self.convention.as_deref(),
        )?;
        let assembler = RecordAssembler::new(self.reference_year, span.clone());

        let mut records = Vec::with_capacity(table.rows.len());
        let mut skipped = 0;
        for row in &table.rows {
            match assembler.assemble::<R>(row, &mapping) {
                Ok(record) => records.push(record),
                Err(e) if e.is_row_level() => {
                    tracing::warn!(parent: &span, row = row.line, error = %e, data = %row.describe(), "Skipping row");
                    skipped += 1;
                }
                Err(e) => return Err(e),
            }
        }

        let values: Vec<Vec<SqlValue>> = records.iter().map(ImportRecord::values).collect();
        let report = QualityReport::build(R::schema(), table.rows.len(), skipped, &values);
        report.log(&span);

        Ok(Prepared {
            mapping,
            records,
            report,
        })
    }

    /// Full import of one file into `store`.
    pub fn run<R: ImportRecord>(
        &self,
        kind: DatasetKind,
        path: &Path,
        store: &mut dyn RecordStore,
        mode: SchemaMode,
    ) -> Result<ImportSummary> {
        let prepared = self.prepare::<R>(path)?;
        let rows: Vec<Vec<SqlValue>> = prepared.records.iter().map(ImportRecord::values).collect();

        tracing::info!(
            parent: &self.span,
            backend = store.backend(),
            table = %R::schema().name,
            rows = rows.len(),
            "Writing records"
        );
        let imported = store.write_table(R::schema(), mode, &rows)?;

        Ok(ImportSummary {
            dataset: kind,
            file: path.to_path_buf(),
            backend: store.backend(),
            convention: prepared.mapping.convention,
            rows_read: prepared.report.total_rows,
            imported,
            skipped: prepared.report.skipped,
        })
    }

    pub fn run_dataset(
        &self,
        kind: DatasetKind,
        path: &Path,
        store: &mut dyn RecordStore,
        mode: SchemaMode,
    ) -> Result<ImportSummary> {
        match kind {
            DatasetKind::Students => self.run::<StudentRecord>(kind, path, store, mode),
            DatasetKind::Orphans => self.run::<OrphanRecord>(kind, path, store, mode),
        }
    }

    pub fn inspect(&self, kind: DatasetKind, path: &Path) -> Result<Inspection> {
        let (mapping, report) = match kind {
            DatasetKind::Students => {
                let p = self.prepare::<StudentRecord>(path)?;
                (p.mapping, p.report)
            }
            DatasetKind::Orphans => {
                let p = self.prepare::<OrphanRecord>(path)?;
                (p.mapping, p.report)
            }
        };
        Ok(Inspection {
            dataset: kind,
            file: path.to_path_buf(),
            mapping,
            report,
        })
    }
}
