//! Code catalog: code → (description, value), rendered once into the
//! annotation text that substitution inserts.

use crate::domain::model::{CatalogEntry, DataQualityWarning, EntryKind, SourceRow};
use std::cmp::Ordering;
use std::collections::HashMap;

/// Fields per catalog record: code, kind, description, value.
pub const CATALOG_FIELDS: usize = 4;

#[derive(Debug, Clone, PartialEq, Eq)]
struct Annotated {
    entry: CatalogEntry,
    annotation: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Catalog {
    entries: HashMap<String, Annotated>,
}

/// Longest code first, then by code text. For equal-length digit strings the
/// text order is also the numeric order.
pub fn priority_order(a: &str, b: &str) -> Ordering {
    b.len().cmp(&a.len()).then_with(|| a.cmp(b))
}

pub fn is_code(candidate: &str) -> bool {
    !candidate.is_empty() && candidate.bytes().all(|b| b.is_ascii_digit())
}

impl Catalog {
    /// Builds a catalog from raw records. Records without exactly four fields
    /// or with a non-numeric code are skipped and reported; a repeated code
    /// replaces the earlier entry.
    pub fn build<I>(rows: I) -> (Self, Vec<DataQualityWarning>)
    where
        I: IntoIterator<Item = SourceRow>,
    {
        let mut catalog = Catalog::default();
        let mut warnings = Vec::new();

        for row in rows {
            if row.fields.len() != CATALOG_FIELDS {
                let warning = DataQualityWarning::MalformedCatalogRow {
                    line: row.line,
                    expected: CATALOG_FIELDS,
                    found: row.fields.len(),
                    raw: row.raw(),
                };
                tracing::warn!("{}", warning);
                warnings.push(warning);
                continue;
            }

            let code = row.fields[0].trim();
            if !is_code(code) {
                let warning = DataQualityWarning::InvalidCode {
                    line: row.line,
                    code: code.to_string(),
                    raw: row.raw(),
                };
                tracing::warn!("{}", warning);
                warnings.push(warning);
                continue;
            }

            catalog.insert(CatalogEntry {
                code: code.to_string(),
                kind: EntryKind::from_tag(&row.fields[1]),
                description: row.fields[2].trim().to_string(),
                value: row.fields[3].trim().to_string(),
            });
        }

        tracing::debug!(
            "Catalog built with {} codes ({} rows skipped)",
            catalog.len(),
            warnings.len()
        );
        (catalog, warnings)
    }

    /// Builds from already-typed entries. An entry whose code is not a
    /// string of digits could never match a standalone token, so it is
    /// skipped and reported.
    pub fn from_entries<I>(entries: I) -> (Self, Vec<DataQualityWarning>)
    where
        I: IntoIterator<Item = CatalogEntry>,
    {
        let mut catalog = Catalog::default();
        let mut warnings = Vec::new();

        for entry in entries {
            if !is_code(&entry.code) {
                let warning = DataQualityWarning::InvalidEntryCode {
                    code: entry.code,
                    description: entry.description,
                };
                tracing::warn!("{}", warning);
                warnings.push(warning);
                continue;
            }
            catalog.insert(entry);
        }
        (catalog, warnings)
    }

    fn insert(&mut self, entry: CatalogEntry) {
        let annotation = entry.annotation();
        if let Some(previous) = self.entries.insert(
            entry.code.clone(),
            Annotated {
                entry,
                annotation,
            },
        ) {
            tracing::debug!("Code {} redefined, keeping the later entry", previous.entry.code);
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, code: &str) -> Option<&CatalogEntry> {
        self.entries.get(code).map(|a| &a.entry)
    }

    /// The rendered `"{description} ({value})"` for a code.
    pub fn annotation(&self, code: &str) -> Option<&str> {
        self.entries.get(code).map(|a| a.annotation.as_str())
    }

    /// Every code, longest first then by code text.
    pub fn codes_by_priority(&self) -> Vec<&str> {
        let mut codes: Vec<&str> = self.entries.keys().map(String::as_str).collect();
        codes.sort_by(|a, b| priority_order(a, b));
        codes
    }
}
