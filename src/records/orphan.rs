use once_cell::sync::Lazy;
use serde::Serialize;

use super::{date_values, ImportRecord, RowFields};
use crate::columns::{Catalog, ORPHANS};
use crate::constants::ORPHANS_TABLE;
use crate::storage::{ColumnKind, SqlValue, TableSchema};
use crate::types::DateField;

static SCHEMA: Lazy<TableSchema> = Lazy::new(|| {
    TableSchema::builder(ORPHANS_TABLE)
        .varchar("family_name", 200)
        .varchar("given_name", 200)
        .varchar("aliases", 500)
        .uncertain("birth_date", ColumnKind::Date)
        .uncertain("arrival", ColumnKind::Date)
        .uncertain("departure", ColumnKind::Date)
        .varchar("scholarships", 500)
        .varchar("assignments", 500)
        .varchar("situation_1878", 500)
        .varchar("assignment_scholarship_year", 100)
        .text("references")
        .text("comments")
        .index("family_name")
        .index("given_name")
        .index("birth_date")
        .index("arrival")
        .index("departure")
        .build()
});

/// One child from the Civil War orphans register.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OrphanRecord {
    pub family_name: Option<String>,
    pub given_name: Option<String>,
    pub aliases: Option<String>,
    pub birth_date: DateField,
    pub arrival: DateField,
    pub departure: DateField,
    pub scholarships: Option<String>,
    pub assignments: Option<String>,
    pub situation_1878: Option<String>,
    pub assignment_scholarship_year: Option<String>,
    pub references: Option<String>,
    pub comments: Option<String>,
}

impl ImportRecord for OrphanRecord {
    fn catalog() -> &'static Catalog {
        &ORPHANS
    }

    fn schema() -> &'static TableSchema {
        &SCHEMA
    }

    fn assemble(f: &RowFields<'_>) -> Self {
        Self {
            family_name: f.name("family_name"),
            given_name: f.name("given_name"),
            aliases: f.name("aliases"),
            birth_date: f.date("birth_date"),
            arrival: f.date("arrival"),
            departure: f.date("departure"),
            scholarships: f.text("scholarships"),
            assignments: f.text("assignments"),
            situation_1878: f.text("situation_1878"),
            assignment_scholarship_year: f.text("assignment_scholarship_year"),
            references: f.text("references"),
            comments: f.text("comments"),
        }
    }

    fn values(&self) -> Vec<SqlValue> {
        let mut values = vec![
            SqlValue::Text(self.family_name.clone()),
            SqlValue::Text(self.given_name.clone()),
            SqlValue::Text(self.aliases.clone()),
        ];
        values.extend(date_values(&self.birth_date));
        values.extend(date_values(&self.arrival));
        values.extend(date_values(&self.departure));
        values.extend([
            SqlValue::Text(self.scholarships.clone()),
            SqlValue::Text(self.assignments.clone()),
            SqlValue::Text(self.situation_1878.clone()),
            SqlValue::Text(self.assignment_scholarship_year.clone()),
            SqlValue::Text(self.references.clone()),
            SqlValue::Text(self.comments.clone()),
        ]);
        values
    }
}
