//! Column-format resolution: works out which header convention a file uses
//! and maps its labels onto canonical field names.

pub mod catalog;

use serde::Serialize;
use tracing::Span;

use crate::error::{ImportError, Result};
pub use catalog::{Catalog, Convention, ORPHANS, STUDENTS};

/// Canonical field -> source label, fixed for the lifetime of one file.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldMapping {
    pub convention: String,
    pub match_count: usize,
    /// Every canonical field in catalog order; `None` when the file lacks it
    pub fields: Vec<(String, Option<String>)>,
    /// Headers the chosen convention did not recognize
    pub dropped: Vec<String>,
}

impl FieldMapping {
    /// Source label supplying `canonical`, if the file has one.
    pub fn source_label(&self, canonical: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(field, _)| field == canonical)
            .and_then(|(_, label)| label.as_deref())
    }

    pub fn missing_fields(&self) -> Vec<&str> {
        self.fields
            .iter()
            .filter(|(_, label)| label.is_none())
            .map(|(field, _)| field.as_str())
            .collect()
    }
}

/// A header label as found in the file plus its cleaned comparison form.
struct Header<'a> {
    raw: &'a str,
    clean: String,
}

#[derive(Clone, Copy)]
enum MatchMode {
    Exact,
    Partial,
}

pub struct ColumnResolver {
    span: Span,
}

impl ColumnResolver {
    pub fn new(span: Span) -> Self {
        Self { span }
    }

    /// Pick the convention that best explains `headers` and build the mapping.
    ///
    /// `forced` selects a convention by name instead of detecting one.
    pub fn resolve(
        &self,
        catalog: &Catalog,
        headers: &[String],
        forced: Option<&str>,
    ) -> Result<FieldMapping> {
        let headers = self.clean_headers(headers);

        let (convention, mode, match_count) = match forced {
            Some(name) => {
                let convention = catalog.convention(name).ok_or_else(|| {
                    ImportError::SchemaMismatch(format!(
                        "unknown {} convention '{}'; known conventions: {}",
                        catalog.dataset,
                        name,
                        catalog.convention_names().join(", ")
                    ))
                })?;
                let exact = count_matches(convention, &headers, MatchMode::Exact);
                let (mode, count) = if exact > 0 {
                    (MatchMode::Exact, exact)
                } else {
                    (
                        MatchMode::Partial,
                        count_matches(convention, &headers, MatchMode::Partial),
                    )
                };
                if count == 0 {
                    return Err(ImportError::SchemaMismatch(format!(
                        "no {} header matches the '{}' convention; expected columns such as: {}",
                        catalog.dataset,
                        name,
                        convention.label_names().join(", ")
                    )));
                }
                (convention, mode, count)
            }
            None => self.detect(catalog, &headers)?,
        };

        tracing::info!(
            parent: &self.span,
            dataset = catalog.dataset,
            convention = convention.name,
            matches = match_count,
            partial = matches!(mode, MatchMode::Partial),
            "Using column mapping format"
        );

        Ok(self.build_mapping(catalog, convention, &headers, mode, match_count))
    }

    fn detect<'c>(
        &self,
        catalog: &'c Catalog,
        headers: &[Header<'_>],
    ) -> Result<(&'c Convention, MatchMode, usize)> {
        for mode in [MatchMode::Exact, MatchMode::Partial] {
            let mut best: Option<(&Convention, usize)> = None;
            for convention in catalog.conventions {
                let count = count_matches(convention, headers, mode);
                if count > best.map_or(0, |(_, c)| c) {
                    best = Some((convention, count));
                }
            }
            if let Some((convention, count)) = best {
                return Ok((convention, mode, count));
            }
            if matches!(mode, MatchMode::Exact) {
                tracing::warn!(
                    parent: &self.span,
                    dataset = catalog.dataset,
                    "No exact header matches, trying partial matching"
                );
            }
        }

        let expected = catalog
            .conventions
            .first()
            .map(|c| c.label_names().join(", "))
            .unwrap_or_default();
        tracing::error!(parent: &self.span, dataset = catalog.dataset, "Missing required columns: {}", expected);
        Err(ImportError::SchemaMismatch(format!(
            "no known {} header convention matches; expected columns such as: {}",
            catalog.dataset, expected
        )))
    }

    fn build_mapping(
        &self,
        catalog: &Catalog,
        convention: &Convention,
        headers: &[Header<'_>],
        mode: MatchMode,
        match_count: usize,
    ) -> FieldMapping {
        let mut fields: Vec<(String, Option<String>)> = catalog
            .canonical_fields
            .iter()
            .map(|f| (f.to_string(), None))
            .collect();
        let mut dropped = Vec::new();

        for header in headers {
            let Some(canonical) = lookup(convention, &header.clean, mode) else {
                tracing::info!(parent: &self.span, header = header.raw, "Dropping unrecognized column");
                dropped.push(header.raw.to_string());
                continue;
            };
            let Some(slot) = fields.iter_mut().find(|(field, _)| field == canonical) else {
                dropped.push(header.raw.to_string());
                continue;
            };
            match &slot.1 {
                None => slot.1 = Some(header.raw.to_string()),
                Some(first) => {
                    tracing::warn!(
                        parent: &self.span,
                        header = header.raw,
                        kept = first.as_str(),
                        field = canonical,
                        "Duplicate column for field, keeping the first"
                    );
                    dropped.push(header.raw.to_string());
                }
            }
        }

        let mapping = FieldMapping {
            convention: convention.name.to_string(),
            match_count,
            fields,
            dropped,
        };
        for field in mapping.missing_fields() {
            tracing::warn!(parent: &self.span, field, "Column missing, field will be null");
        }
        mapping
    }

    /// Trim, strip quote characters, and drop blank and `Unnamed:` labels.
    fn clean_headers<'a>(&self, headers: &'a [String]) -> Vec<Header<'a>> {
        headers
            .iter()
            .filter_map(|raw| {
                let clean = raw.trim().replace(['"', '\''], "").trim().to_string();
                if clean.is_empty() || clean.starts_with("Unnamed:") {
                    tracing::debug!(parent: &self.span, header = raw.as_str(), "Ignoring placeholder column");
                    None
                } else {
                    Some(Header { raw, clean })
                }
            })
            .collect()
    }
}

fn lookup(convention: &Convention, header: &str, mode: MatchMode) -> Option<&'static str> {
    match mode {
        MatchMode::Exact => convention.exact(header),
        MatchMode::Partial => convention.partial(header),
    }
}

fn count_matches(convention: &Convention, headers: &[Header<'_>], mode: MatchMode) -> usize {
    headers
        .iter()
        .filter(|h| lookup(convention, &h.clean, mode).is_some())
        .count()
}
