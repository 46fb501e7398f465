use serde::{Deserialize, Serialize};
use std::fmt;

/// Payroll line-item category, from the `TIPO` column.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntryKind {
    Provento,
    Desconto,
    Variavel,
    Other(String),
}

impl EntryKind {
    pub fn from_tag(tag: &str) -> Self {
        match tag.trim() {
            "P" | "p" => EntryKind::Provento,
            "D" | "d" => EntryKind::Desconto,
            "V" | "v" => EntryKind::Variavel,
            other => EntryKind::Other(other.to_string()),
        }
    }

    pub fn tag(&self) -> &str {
        match self {
            EntryKind::Provento => "P",
            EntryKind::Desconto => "D",
            EntryKind::Variavel => "V",
            EntryKind::Other(tag) => tag,
        }
    }
}

impl fmt::Display for EntryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntryKind::Provento => write!(f, "Provento"),
            EntryKind::Desconto => write!(f, "Desconto"),
            EntryKind::Variavel => write!(f, "Variável"),
            EntryKind::Other(tag) => write!(f, "{}", tag),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogEntry {
    pub code: String,
    pub kind: EntryKind,
    pub description: String,
    /// Kept exactly as displayed in the source; never reparsed.
    pub value: String,
}

impl CatalogEntry {
    pub fn annotation(&self) -> String {
        format!("{} ({})", self.description, self.value)
    }
}

/// One raw delimited record, the line it came from (1-based) and the
/// delimiter it was split on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceRow {
    pub line: u64,
    pub fields: Vec<String>,
    pub delimiter: char,
}

impl SourceRow {
    /// A `;`-delimited row; see [`SourceRow::with_delimiter`] for other files.
    pub fn new<I, S>(line: u64, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            line,
            fields: fields.into_iter().map(Into::into).collect(),
            delimiter: ';',
        }
    }

    pub fn with_delimiter(mut self, delimiter: char) -> Self {
        self.delimiter = delimiter;
        self
    }

    /// The record as it reads in its file, fields rejoined on its delimiter.
    pub fn raw(&self) -> String {
        self.fields.join(&self.delimiter.to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayrollRow {
    pub line: u64,
    pub code: String,
    /// Locale-formatted amount (`1.234,56`), normalized only when aggregated.
    pub raw_value: String,
}

impl PayrollRow {
    pub fn new(line: u64, code: impl Into<String>, raw_value: impl Into<String>) -> Self {
        Self {
            line,
            code: code.into(),
            raw_value: raw_value.into(),
        }
    }
}

/// Non-fatal input problems. They are collected next to a result, never raised.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, thiserror::Error)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DataQualityWarning {
    #[error("line {line}: expected {expected} fields, found {found}; skipped: {raw}")]
    MalformedCatalogRow {
        line: u64,
        expected: usize,
        found: usize,
        raw: String,
    },

    #[error("line {line}: code '{code}' is not a string of digits; skipped: {raw}")]
    InvalidCode { line: u64, code: String, raw: String },

    #[error("entry '{description}': code '{code}' is not a string of digits; skipped")]
    InvalidEntryCode { code: String, description: String },

    #[error("line {line}: malformed group row; skipped: {raw}")]
    MalformedGroupRow { line: u64, raw: String },

    #[error("code '{code}' moved from group '{previous}' to '{current}'")]
    GroupReassigned {
        code: String,
        previous: String,
        current: String,
    },

    #[error("line {line}: payroll row is missing fields; skipped: {raw}")]
    MalformedPayrollRow { line: u64, raw: String },

    #[error("line {line}: value '{raw_value}' of code '{code}' is not a number; excluded from totals")]
    UnparseableValue {
        line: u64,
        code: String,
        raw_value: String,
    },

    #[error("line {line}: value '{raw_value}' of code '{code}' would overflow the totals; excluded from totals")]
    AmountOverflow {
        line: u64,
        code: String,
        raw_value: String,
    },
}

/// Shape of a group-map file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
#[serde(rename_all = "lowercase")]
pub enum GroupLayout {
    /// `GRUPO;CODS` per row, codes comma-separated.
    #[default]
    Rows,
    /// Header row of group labels, codes aligned below each label.
    Columns,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    Txt,
    Csv,
    Json,
}

impl OutputFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            OutputFormat::Txt => "txt",
            OutputFormat::Csv => "csv",
            OutputFormat::Json => "json",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entry_kind_tags() {
        assert_eq!(EntryKind::from_tag("P"), EntryKind::Provento);
        assert_eq!(EntryKind::from_tag(" d "), EntryKind::Desconto);
        assert_eq!(EntryKind::from_tag("V").to_string(), "Variável");
        assert_eq!(EntryKind::from_tag("X"), EntryKind::Other("X".to_string()));
        assert_eq!(EntryKind::from_tag("X").tag(), "X");
    }

    #[test]
    fn test_annotation_keeps_value_text() {
        let entry = CatalogEntry {
            code: "1254".to_string(),
            kind: EntryKind::Desconto,
            description: "Desconto Alimentação".to_string(),
            value: "4.452.00".to_string(),
        };
        assert_eq!(entry.annotation(), "Desconto Alimentação (4.452.00)");
    }

    #[test]
    fn test_warning_serializes_with_kind_tag() {
        let warning = DataQualityWarning::UnparseableValue {
            line: 4,
            code: "1254".to_string(),
            raw_value: "4.452.00".to_string(),
        };
        let json = serde_json::to_value(&warning).unwrap();
        assert_eq!(json["kind"], "unparseable_value");
        assert_eq!(json["raw_value"], "4.452.00");
    }

    #[test]
    fn test_raw_rejoins_on_the_row_delimiter() {
        let row = SourceRow::new(3, ["1254", "D", "Desconto Alimentação"]);
        assert_eq!(row.raw(), "1254;D;Desconto Alimentação");
        assert_eq!(row.with_delimiter('\t').raw(), "1254\tD\tDesconto Alimentação");
    }
}
