use crate::core::number::parse_br_decimal;
use crate::domain::model::{DataQualityWarning, PayrollRow};
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::HashMap;

pub const UNCLASSIFIED_GROUP: &str = "Unclassified";

/// code → accounting group.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GroupMap {
    groups: HashMap<String, String>,
}

impl GroupMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Assigns a code to a group. A code already assigned elsewhere moves to
    /// the new group, and the previous group is returned.
    pub fn assign(&mut self, code: impl Into<String>, group: impl Into<String>) -> Option<String> {
        let group = group.into();
        match self.groups.insert(code.into(), group.clone()) {
            Some(previous) if previous != group => Some(previous),
            _ => None,
        }
    }

    pub fn group_of(&self, code: &str) -> Option<&str> {
        self.groups.get(code).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}

impl<C: Into<String>, G: Into<String>> FromIterator<(C, G)> for GroupMap {
    fn from_iter<T: IntoIterator<Item = (C, G)>>(iter: T) -> Self {
        let mut map = GroupMap::new();
        for (code, group) in iter {
            map.assign(code, group);
        }
        map
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GroupTotal {
    pub group: String,
    pub total: Decimal,
    pub rows: usize,
}

/// Per-group sums. The grand total is kept alongside, so every sum stays
/// representable as a `Decimal`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Totals {
    groups: HashMap<String, GroupTotal>,
    grand_total: Decimal,
}

impl Totals {
    /// Adds one value to its group. Returns `false`, leaving every sum
    /// untouched, when the group total or the grand total would overflow.
    fn add(&mut self, group: &str, value: Decimal) -> bool {
        let current = self.get(group).unwrap_or(Decimal::ZERO);
        let (Some(total), Some(grand_total)) = (
            current.checked_add(value),
            self.grand_total.checked_add(value),
        ) else {
            return false;
        };

        let slot = self
            .groups
            .entry(group.to_string())
            .or_insert_with(|| GroupTotal {
                group: group.to_string(),
                total: Decimal::ZERO,
                rows: 0,
            });
        slot.total = total;
        slot.rows += 1;
        self.grand_total = grand_total;
        true
    }

    pub fn get(&self, group: &str) -> Option<Decimal> {
        self.groups.get(group).map(|g| g.total)
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    pub fn grand_total(&self) -> Decimal {
        self.grand_total
    }

    /// Presentation order: largest total first, ties by group name.
    pub fn ranked(&self) -> Vec<&GroupTotal> {
        let mut ranked: Vec<&GroupTotal> = self.groups.values().collect();
        ranked.sort_by(|a, b| b.total.cmp(&a.total).then_with(|| a.group.cmp(&b.group)));
        ranked
    }
}

#[derive(Debug, Clone)]
pub struct Aggregator {
    fallback_group: String,
}

impl Default for Aggregator {
    fn default() -> Self {
        Self::new(UNCLASSIFIED_GROUP)
    }
}

impl Aggregator {
    pub fn new(fallback_group: impl Into<String>) -> Self {
        Self {
            fallback_group: fallback_group.into(),
        }
    }

    pub fn fallback_group(&self) -> &str {
        &self.fallback_group
    }

    /// Sums row values per group. Rows whose value does not parse, or whose
    /// value would overflow a sum, are left out of every sum and reported.
    pub fn aggregate<'a, I>(&self, rows: I, group_map: &GroupMap) -> (Totals, Vec<DataQualityWarning>)
    where
        I: IntoIterator<Item = &'a PayrollRow>,
    {
        let mut totals = Totals::default();
        let mut warnings = Vec::new();

        for row in rows {
            let value = match parse_br_decimal(&row.raw_value) {
                Ok(value) => value,
                Err(_) => {
                    let warning = DataQualityWarning::UnparseableValue {
                        line: row.line,
                        code: row.code.clone(),
                        raw_value: row.raw_value.clone(),
                    };
                    tracing::warn!("{}", warning);
                    warnings.push(warning);
                    continue;
                }
            };

            let group = group_map
                .group_of(&row.code)
                .unwrap_or(self.fallback_group.as_str());
            if !totals.add(group, value) {
                let warning = DataQualityWarning::AmountOverflow {
                    line: row.line,
                    code: row.code.clone(),
                    raw_value: row.raw_value.clone(),
                };
                tracing::warn!("{}", warning);
                warnings.push(warning);
            }
        }

        tracing::debug!(
            "Aggregated into {} groups, grand total {}",
            totals.len(),
            totals.grand_total()
        );
        (totals, warnings)
    }
}
