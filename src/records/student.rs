use once_cell::sync::Lazy;
use serde::Serialize;

use super::{date_values, year_values, ImportRecord, RowFields};
use crate::columns::{Catalog, STUDENTS};
use crate::constants::STUDENTS_TABLE;
use crate::storage::{ColumnKind, SqlValue, TableSchema};
use crate::types::{DateField, YearField};

static SCHEMA: Lazy<TableSchema> = Lazy::new(|| {
    TableSchema::builder(STUDENTS_TABLE)
        .varchar("census_record_1900", 100)
        .varchar("indian_name", 500)
        .varchar("family_name", 200)
        .varchar("english_given_name", 200)
        .varchar("alias", 200)
        .char("sex", 1)
        .uncertain("year_of_birth", ColumnKind::Integer)
        .uncertain("arrival_at_lincoln", ColumnKind::Date)
        .uncertain("departure_from_lincoln", ColumnKind::Date)
        .varchar("nation", 200)
        .varchar("band", 200)
        .varchar("agency", 200)
        .varchar("trade", 200)
        .text("source")
        .text("comments")
        .text("cause_of_death")
        .varchar("cemetery_burial", 500)
        .text("relevant_links")
        .index("family_name")
        .index("nation")
        .index("year_of_birth")
        .index("arrival_at_lincoln")
        .index("departure_from_lincoln")
        .build()
});

/// One student of the Lincoln Institution.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StudentRecord {
    pub census_record_1900: Option<String>,
    pub indian_name: Option<String>,
    pub family_name: Option<String>,
    pub english_given_name: Option<String>,
    pub alias: Option<String>,
    pub sex: Option<String>,
    pub year_of_birth: YearField,
    pub arrival_at_lincoln: DateField,
    pub departure_from_lincoln: DateField,
    pub nation: Option<String>,
    pub band: Option<String>,
    pub agency: Option<String>,
    pub trade: Option<String>,
    pub source: Option<String>,
    pub comments: Option<String>,
    pub cause_of_death: Option<String>,
    pub cemetery_burial: Option<String>,
    pub relevant_links: Option<String>,
}

impl ImportRecord for StudentRecord {
    fn catalog() -> &'static Catalog {
        &STUDENTS
    }

    fn schema() -> &'static TableSchema {
        &SCHEMA
    }

    fn assemble(f: &RowFields<'_>) -> Self {
        Self {
            census_record_1900: f.text("census_record_1900"),
            indian_name: f.name("indian_name"),
            family_name: f.name("family_name"),
            english_given_name: f.name("english_given_name"),
            alias: f.name("alias"),
            sex: f.code("sex"),
            year_of_birth: f.year("year_of_birth"),
            arrival_at_lincoln: f.date("arrival_at_lincoln"),
            departure_from_lincoln: f.date("departure_from_lincoln"),
            nation: f.text("nation"),
            band: f.text("band"),
            agency: f.text("agency"),
            trade: f.text("trade"),
            source: f.text("source"),
            comments: f.text("comments"),
            cause_of_death: f.text("cause_of_death"),
            cemetery_burial: f.text("cemetery_burial"),
            relevant_links: f.text("relevant_links"),
        }
    }

    fn values(&self) -> Vec<SqlValue> {
        let mut values = vec![
            SqlValue::Text(self.census_record_1900.clone()),
            SqlValue::Text(self.indian_name.clone()),
            SqlValue::Text(self.family_name.clone()),
            SqlValue::Text(self.english_given_name.clone()),
            SqlValue::Text(self.alias.clone()),
            SqlValue::Text(self.sex.clone()),
        ];
        values.extend(year_values(&self.year_of_birth));
        values.extend(date_values(&self.arrival_at_lincoln));
        values.extend(date_values(&self.departure_from_lincoln));
        values.extend([
            SqlValue::Text(self.nation.clone()),
            SqlValue::Text(self.band.clone()),
            SqlValue::Text(self.agency.clone()),
            SqlValue::Text(self.trade.clone()),
            SqlValue::Text(self.source.clone()),
            SqlValue::Text(self.comments.clone()),
            SqlValue::Text(self.cause_of_death.clone()),
            SqlValue::Text(self.cemetery_burial.clone()),
            SqlValue::Text(self.relevant_links.clone()),
        ]);
        values
    }
}
