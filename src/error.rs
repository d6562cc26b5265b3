use thiserror::Error;

#[derive(Error, Debug)]
pub enum ImportError {
    /// No known header convention matched the file's header row.
    #[error("Schema mismatch: {0}")]
    SchemaMismatch(String),

    /// A single row could not be cleaned or mapped. The importer skips it.
    #[error("Row {row} could not be processed: {message}")]
    RowProcessing { row: usize, message: String },

    #[error("Storage error: {message}")]
    Storage { message: String },

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Unsupported file format: {0}")]
    UnsupportedFormat(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("CSV parsing failed: {0}")]
    Csv(#[from] csv::Error),

    #[error("Workbook could not be read: {0}")]
    Workbook(String),

    #[error("TOML deserialization failed: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<rusqlite::Error> for ImportError {
    fn from(err: rusqlite::Error) -> Self {
        ImportError::Storage {
            message: format!("sqlite: {err}"),
        }
    }
}

impl From<postgres::Error> for ImportError {
    fn from(err: postgres::Error) -> Self {
        ImportError::Storage {
            message: format!("postgres: {err}"),
        }
    }
}

impl From<calamine::Error> for ImportError {
    fn from(err: calamine::Error) -> Self {
        ImportError::Workbook(err.to_string())
    }
}

impl ImportError {
    /// Row-level errors are recovered by skipping the row; everything else aborts the run.
    pub fn is_row_level(&self) -> bool {
        matches!(self, ImportError::RowProcessing { .. })
    }
}

pub type Result<T> = std::result::Result<T, ImportError>;
