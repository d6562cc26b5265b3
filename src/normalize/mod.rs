//! Field-level cleaning: names, plain text, years and dates.

pub mod date;
pub mod name;
pub mod text;
pub mod year;

pub use date::DateNormalizer;
pub use name::{clean_name, normalize_name};
pub use text::{normalize_code, normalize_text, Truncator};
pub use year::YearNormalizer;
