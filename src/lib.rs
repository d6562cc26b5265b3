pub mod columns;
pub mod config;
pub mod constants;
pub mod error;
pub mod importer;
pub mod logging;
pub mod normalize;
pub mod quality;
pub mod records;
pub mod source;
pub mod storage;
pub mod types;

pub use error::{ImportError, Result};
pub use importer::{ImportSummary, Importer};
