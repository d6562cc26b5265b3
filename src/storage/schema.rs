use super::SchemaMode;
use crate::constants::UNCERTAINTY_TYPE_MAX_LEN;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    Varchar(usize),
    Char(usize),
    Text,
    Integer,
    Boolean,
    Date,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    pub name: String,
    pub kind: ColumnKind,
}

impl Column {
    /// Character limit enforced before insert, if any
    pub fn max_len(&self) -> Option<usize> {
        match self.kind {
            ColumnKind::Varchar(n) | ColumnKind::Char(n) => Some(n),
            _ => None,
        }
    }
}

/// Data columns and indexes of one target table. The identity and timestamp
/// columns are added by the dialect.
#[derive(Debug, Clone, PartialEq)]
pub struct TableSchema {
    pub name: String,
    pub columns: Vec<Column>,
    pub indexes: Vec<String>,
}

impl TableSchema {
    pub fn builder(name: &str) -> TableSchemaBuilder {
        TableSchemaBuilder {
            schema: TableSchema {
                name: name.to_string(),
                columns: Vec::new(),
                indexes: Vec::new(),
            },
        }
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    pub fn max_len(&self, column: &str) -> Option<usize> {
        self.column(column).and_then(Column::max_len)
    }
}

pub struct TableSchemaBuilder {
    schema: TableSchema,
}

impl TableSchemaBuilder {
    fn push(mut self, name: &str, kind: ColumnKind) -> Self {
        self.schema.columns.push(Column {
            name: name.to_string(),
            kind,
        });
        self
    }

    pub fn varchar(self, name: &str, len: usize) -> Self {
        self.push(name, ColumnKind::Varchar(len))
    }

    pub fn char(self, name: &str, len: usize) -> Self {
        self.push(name, ColumnKind::Char(len))
    }

    pub fn text(self, name: &str) -> Self {
        self.push(name, ColumnKind::Text)
    }

    /// A year or date column followed by its `_uncertain`,
    /// `_uncertainty_type` and `_original_text` companions.
    pub fn uncertain(self, name: &str, kind: ColumnKind) -> Self {
        self.push(name, kind)
            .push(&format!("{name}_uncertain"), ColumnKind::Boolean)
            .push(
                &format!("{name}_uncertainty_type"),
                ColumnKind::Varchar(UNCERTAINTY_TYPE_MAX_LEN),
            )
            .push(&format!("{name}_original_text"), ColumnKind::Text)
    }

    pub fn index(mut self, column: &str) -> Self {
        self.schema.indexes.push(column.to_string());
        self
    }

    pub fn build(self) -> TableSchema {
        self.schema
    }
}

/// SQL flavour used to render DDL and DML for a table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dialect {
    Postgres,
    Sqlite,
}

impl Dialect {
    fn column_type(&self, kind: ColumnKind) -> String {
        match kind {
            ColumnKind::Varchar(n) => format!("VARCHAR({n})"),
            ColumnKind::Char(n) => format!("CHAR({n})"),
            ColumnKind::Text => "TEXT".to_string(),
            ColumnKind::Integer => "INTEGER".to_string(),
            ColumnKind::Boolean => "BOOLEAN DEFAULT FALSE".to_string(),
            ColumnKind::Date => "DATE".to_string(),
        }
    }

    fn identity(&self) -> &'static str {
        match self {
            Dialect::Postgres => "SERIAL PRIMARY KEY",
            Dialect::Sqlite => "INTEGER PRIMARY KEY AUTOINCREMENT",
        }
    }

    fn timestamp(&self) -> &'static str {
        match self {
            Dialect::Postgres => "TIMESTAMP WITH TIME ZONE DEFAULT CURRENT_TIMESTAMP",
            Dialect::Sqlite => "TIMESTAMP DEFAULT CURRENT_TIMESTAMP",
        }
    }

    pub fn create_table_sql(&self, table: &TableSchema) -> String {
        let mut lines = vec![format!("    {} {}", quote("id"), self.identity())];
        for column in &table.columns {
            lines.push(format!(
                "    {} {}",
                quote(&column.name),
                self.column_type(column.kind)
            ));
        }
        lines.push(format!("    {} {}", quote("created_at"), self.timestamp()));
        lines.push(format!("    {} {}", quote("updated_at"), self.timestamp()));
        format!(
            "CREATE TABLE IF NOT EXISTS {} (\n{}\n)",
            quote(&table.name),
            lines.join(",\n")
        )
    }

    pub fn create_index_sql(&self, table: &TableSchema) -> Vec<String> {
        table
            .indexes
            .iter()
            .map(|column| {
                format!(
                    "CREATE INDEX IF NOT EXISTS {} ON {} ({})",
                    quote(&format!("idx_{}_{}", table.name, column)),
                    quote(&table.name),
                    quote(column)
                )
            })
            .collect()
    }

    pub fn drop_table_sql(&self, table: &TableSchema) -> String {
        match self {
            Dialect::Postgres => format!("DROP TABLE IF EXISTS {} CASCADE", quote(&table.name)),
            Dialect::Sqlite => format!("DROP TABLE IF EXISTS {}", quote(&table.name)),
        }
    }

    /// Schema preparation statements for `mode`, in execution order.
    pub fn prepare_statements(&self, table: &TableSchema, mode: SchemaMode) -> Vec<String> {
        let mut statements = Vec::new();
        if mode == SchemaMode::Recreate {
            statements.push(self.drop_table_sql(table));
        }
        statements.push(self.create_table_sql(table));
        statements.extend(self.create_index_sql(table));
        statements
    }

    pub fn insert_sql(&self, table: &TableSchema) -> String {
        let columns: Vec<String> = table.columns.iter().map(|c| quote(&c.name)).collect();
        let placeholders: Vec<String> = (1..=table.columns.len())
            .map(|i| match self {
                Dialect::Postgres => format!("${i}"),
                Dialect::Sqlite => format!("?{i}"),
            })
            .collect();
        format!(
            "INSERT INTO {} ({}) VALUES ({})",
            quote(&table.name),
            columns.join(", "),
            placeholders.join(", ")
        )
    }
}

/// Double-quote an identifier; columns such as `references` are reserved words.
pub fn quote(identifier: &str) -> String {
    format!("\"{}\"", identifier.replace('"', "\"\""))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> TableSchema {
        TableSchema::builder("people")
            .varchar("family_name", 200)
            .char("sex", 1)
            .text("references")
            .uncertain("birth_date", ColumnKind::Date)
            .index("family_name")
            .build()
    }

    #[test]
    fn test_uncertain_columns_expand_to_companions() {
        let schema = sample();
        assert_eq!(
            schema.column_names(),
            vec![
                "family_name",
                "sex",
                "references",
                "birth_date",
                "birth_date_uncertain",
                "birth_date_uncertainty_type",
                "birth_date_original_text",
            ]
        );
        assert_eq!(schema.max_len("birth_date_uncertainty_type"), Some(50));
        assert_eq!(schema.max_len("sex"), Some(1));
        assert_eq!(schema.max_len("references"), None);
    }

    #[test]
    fn test_postgres_ddl() {
        let ddl = Dialect::Postgres.create_table_sql(&sample());
        assert!(ddl.starts_with("CREATE TABLE IF NOT EXISTS \"people\""));
        assert!(ddl.contains("\"id\" SERIAL PRIMARY KEY"));
        assert!(ddl.contains("\"references\" TEXT"));
        assert!(ddl.contains("\"birth_date_uncertain\" BOOLEAN DEFAULT FALSE"));
        assert!(ddl.contains("\"created_at\" TIMESTAMP WITH TIME ZONE DEFAULT CURRENT_TIMESTAMP"));
        assert_eq!(
            Dialect::Postgres.drop_table_sql(&sample()),
            "DROP TABLE IF EXISTS \"people\" CASCADE"
        );
    }

    #[test]
    fn test_insert_placeholders_per_dialect() {
        let schema = sample();
        let pg = Dialect::Postgres.insert_sql(&schema);
        assert!(pg.contains("\"references\""));
        assert!(pg.ends_with("VALUES ($1, $2, $3, $4, $5, $6, $7)"));
        assert!(Dialect::Sqlite.insert_sql(&schema).ends_with("?7)"));
    }

    #[test]
    fn test_prepare_statements_order() {
        let schema = sample();
        let keep = Dialect::Sqlite.prepare_statements(&schema, SchemaMode::CreateIfMissing);
        assert_eq!(keep.len(), 2);
        assert!(keep[1].starts_with("CREATE INDEX IF NOT EXISTS \"idx_people_family_name\""));

        let recreate = Dialect::Sqlite.prepare_statements(&schema, SchemaMode::Recreate);
        assert!(recreate[0].starts_with("DROP TABLE"));
        assert_eq!(recreate.len(), 3);
    }
}
