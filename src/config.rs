use serde::Deserialize;
use std::env;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use crate::constants::{
    year_in_range, DEFAULT_AGE_REFERENCE_YEAR, DEFAULT_CONFIG_FILE, DEFAULT_DB_PORT,
    DEFAULT_LOG_DIR, ENV_CONFIG_FILE, ENV_DB_HOST, ENV_DB_NAME, ENV_DB_PASSWORD, ENV_DB_PORT,
    ENV_DB_USER,
};
use crate::error::{ImportError, Result};
use crate::storage::SchemaMode;

/// Non-secret importer settings, read from `importer.toml` when present.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    /// Census year that "age N" birth-year entries are measured against
    pub reference_year: i32,
    pub schema_mode: SchemaMode,
    pub log_dir: PathBuf,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            reference_year: DEFAULT_AGE_REFERENCE_YEAR,
            schema_mode: SchemaMode::default(),
            log_dir: PathBuf::from(DEFAULT_LOG_DIR),
        }
    }
}

impl Settings {
    /// Load settings from `$IMPORTER_CONFIG`, falling back to `importer.toml`.
    ///
    /// A missing default file yields the defaults; a missing file named
    /// explicitly through the environment is a configuration error.
    pub fn load() -> Result<Self> {
        match env::var(ENV_CONFIG_FILE) {
            Ok(path) => Self::from_file(Path::new(&path)),
            Err(_) => {
                let path = Path::new(DEFAULT_CONFIG_FILE);
                if path.exists() {
                    Self::from_file(path)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            ImportError::Configuration(format!(
                "Failed to read config file '{}': {}",
                path.display(),
                e
            ))
        })?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let settings: Settings = toml::from_str(content)?;
        settings.validate()?;
        Ok(settings)
    }

    fn validate(&self) -> Result<()> {
        if !year_in_range(self.reference_year) {
            return Err(ImportError::Configuration(format!(
                "reference_year {} is outside the supported historical range",
                self.reference_year
            )));
        }
        Ok(())
    }
}

/// Connection parameters for the PostgreSQL store.
#[derive(Clone, PartialEq)]
pub struct DatabaseConfig {
    pub host: String,
    pub port: u16,
    pub dbname: String,
    pub user: String,
    pub password: String,
}

impl fmt::Debug for DatabaseConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DatabaseConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("dbname", &self.dbname)
            .field("user", &self.user)
            .field("password", &"<redacted>")
            .finish()
    }
}

impl DatabaseConfig {
    /// Read the connection parameters from the process environment.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build the config from any key lookup, failing fast with every unset
    /// variable named in one error.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let required = [ENV_DB_HOST, ENV_DB_NAME, ENV_DB_USER, ENV_DB_PASSWORD];
        let missing: Vec<&str> = required
            .iter()
            .copied()
            .filter(|key| get(*key).is_none())
            .collect();
        if !missing.is_empty() {
            return Err(ImportError::Configuration(format!(
                "missing required environment variables: {}",
                missing.join(", ")
            )));
        }

        let port = match get(ENV_DB_PORT) {
            Some(raw) => raw.trim().parse::<u16>().map_err(|_| {
                ImportError::Configuration(format!("{ENV_DB_PORT} is not a valid port: {raw}"))
            })?,
            None => DEFAULT_DB_PORT,
        };

        Ok(Self {
            host: get(ENV_DB_HOST).unwrap_or_default(),
            port,
            dbname: get(ENV_DB_NAME).unwrap_or_default(),
            user: get(ENV_DB_USER).unwrap_or_default(),
            password: get(ENV_DB_PASSWORD).unwrap_or_default(),
        })
    }
}
