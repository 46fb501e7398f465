//! Replaces catalog codes in free text with their annotations.
//!
//! A code only matches a standalone token: a maximal run of ASCII digits
//! with no digit directly before or after it. The text is scanned once, left
//! to right, so `1` never fires inside `104` or `911234`, and annotation text
//! that has already been inserted is never scanned again.

use crate::core::catalog::Catalog;
use regex::Regex;
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::LazyLock;

static DIGIT_RUN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[0-9]+").unwrap());

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Substitution {
    pub text: String,
    /// Codes with at least one match, longest first then by code.
    pub substituted_codes: Vec<String>,
    pub occurrences: BTreeMap<String, usize>,
    pub replacements: usize,
}

impl Substitution {
    fn unchanged(text: &str) -> Self {
        Self {
            text: text.to_string(),
            substituted_codes: Vec::new(),
            occurrences: BTreeMap::new(),
            replacements: 0,
        }
    }

    pub fn distinct_codes(&self) -> usize {
        self.substituted_codes.len()
    }
}

pub fn substitute(text: &str, catalog: &Catalog) -> Substitution {
    if text.is_empty() || catalog.is_empty() {
        return Substitution::unchanged(text);
    }

    let mut output = String::with_capacity(text.len());
    let mut occurrences: BTreeMap<String, usize> = BTreeMap::new();
    let mut copied_up_to = 0;

    for token in DIGIT_RUN.find_iter(text) {
        let Some(annotation) = catalog.annotation(token.as_str()) else {
            continue;
        };
        output.push_str(&text[copied_up_to..token.start()]);
        output.push_str(annotation);
        copied_up_to = token.end();
        *occurrences.entry(token.as_str().to_string()).or_default() += 1;
    }
    output.push_str(&text[copied_up_to..]);

    let substituted_codes: Vec<String> = catalog
        .codes_by_priority()
        .into_iter()
        .filter(|code| occurrences.contains_key(*code))
        .map(str::to_string)
        .collect();
    let replacements = occurrences.values().sum();

    tracing::debug!(
        "Substituted {} occurrences of {} distinct codes",
        replacements,
        substituted_codes.len()
    );

    Substitution {
        text: output,
        substituted_codes,
        occurrences,
        replacements,
    }
}
