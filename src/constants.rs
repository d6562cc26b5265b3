/// Shared constants for the importer.
/// Year bounds apply to every parsed year and date: the records cover a
/// 19th and early 20th century population.
pub const MIN_YEAR: i32 = 1800;
pub const MAX_YEAR: i32 = 2000;

/// Census year that "age N" entries are measured against unless configured otherwise
pub const DEFAULT_AGE_REFERENCE_YEAR: i32 = 1900;

// Fixed input locations used by the run commands
pub const DEFAULT_STUDENTS_FILE: &str = "data/Lincoln_student_data.csv";
pub const DEFAULT_ORPHANS_FILE: &str = "data/cleaned_orphans_sept1.csv";

// Target tables
pub const STUDENTS_TABLE: &str = "students";
pub const ORPHANS_TABLE: &str = "civil_war_orphans";

// Database connection environment variables
pub const ENV_DB_HOST: &str = "DB_HOST";
pub const ENV_DB_PORT: &str = "DB_PORT";
pub const ENV_DB_NAME: &str = "DB_NAME";
pub const ENV_DB_USER: &str = "DB_USER";
pub const ENV_DB_PASSWORD: &str = "DB_PASSWORD";
pub const DEFAULT_DB_PORT: u16 = 5432;

/// Optional settings file and the variable that overrides its location
pub const DEFAULT_CONFIG_FILE: &str = "importer.toml";
pub const ENV_CONFIG_FILE: &str = "IMPORTER_CONFIG";

pub const DEFAULT_LOG_DIR: &str = "logs";
pub const LOG_FILE_NAME: &str = "import.log";

/// Cell contents that spreadsheet exports use for "no value"
pub const NULL_MARKERS: &[&str] = &[
    "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

/// Width of the `_uncertainty_type` companion columns
pub const UNCERTAINTY_TYPE_MAX_LEN: usize = 50;

/// Returns true when the year lies inside the accepted historical window
pub fn year_in_range(year: i32) -> bool {
    (MIN_YEAR..=MAX_YEAR).contains(&year)
}
