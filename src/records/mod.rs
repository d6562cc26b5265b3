//! Normalized record kinds and the glue that turns raw rows into them.

pub mod assembler;
pub mod orphan;
pub mod student;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::columns::{Catalog, ORPHANS, STUDENTS};
use crate::constants::{DEFAULT_ORPHANS_FILE, DEFAULT_STUDENTS_FILE};
use crate::storage::{SqlValue, TableSchema};
use crate::types::{DateField, Uncertain, YearField};
pub use assembler::{RecordAssembler, RowFields};
pub use orphan::OrphanRecord;
pub use student::StudentRecord;

/// A record kind the importer can load.
pub trait ImportRecord: Sized + Serialize {
    fn catalog() -> &'static Catalog;
    fn schema() -> &'static TableSchema;

    /// Build the record from one row's fields.
    fn assemble(fields: &RowFields<'_>) -> Self;

    /// Insert values, in `schema()` column order.
    fn values(&self) -> Vec<SqlValue>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DatasetKind {
    Students,
    Orphans,
}

impl DatasetKind {
    pub fn default_file(&self) -> &'static str {
        match self {
            DatasetKind::Students => DEFAULT_STUDENTS_FILE,
            DatasetKind::Orphans => DEFAULT_ORPHANS_FILE,
        }
    }

    pub fn catalog(&self) -> &'static Catalog {
        match self {
            DatasetKind::Students => &STUDENTS,
            DatasetKind::Orphans => &ORPHANS,
        }
    }

    pub fn schema(&self) -> &'static TableSchema {
        match self {
            DatasetKind::Students => StudentRecord::schema(),
            DatasetKind::Orphans => OrphanRecord::schema(),
        }
    }
}

impl std::fmt::Display for DatasetKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DatasetKind::Students => write!(f, "students"),
            DatasetKind::Orphans => write!(f, "orphans"),
        }
    }
}

fn uncertain_values<T>(field: &Uncertain<T>, value: SqlValue) -> [SqlValue; 4] {
    [
        value,
        SqlValue::Bool(field.uncertain),
        SqlValue::Text(field.uncertainty_type.map(|t| t.as_str().to_string())),
        SqlValue::Text(field.original_text.clone()),
    ]
}

/// A year column and its three companions
pub(crate) fn year_values(field: &YearField) -> [SqlValue; 4] {
    uncertain_values(field, SqlValue::Int(field.value))
}

/// A date column and its three companions
pub(crate) fn date_values(field: &DateField) -> [SqlValue; 4] {
    uncertain_values(field, SqlValue::Date(field.value))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::UncertaintyType;

    #[test]
    fn test_dataset_kind_wiring() {
        assert_eq!(DatasetKind::Students.schema().name, "students");
        assert_eq!(DatasetKind::Orphans.schema().name, "civil_war_orphans");
        assert_eq!(DatasetKind::Orphans.catalog().dataset, "orphans");
        assert_eq!(DatasetKind::Students.default_file(), "data/Lincoln_student_data.csv");
    }

    #[test]
    fn test_year_values_layout() {
        let field = YearField::new(
            Some(1890),
            Some(UncertaintyType::Approximate),
            Some("about 1890".into()),
        );
        assert_eq!(
            year_values(&field),
            [
                SqlValue::Int(Some(1890)),
                SqlValue::Bool(true),
                SqlValue::Text(Some("approximate".into())),
                SqlValue::Text(Some("about 1890".into())),
            ]
        );
    }
}
