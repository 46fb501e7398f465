use crate::adapters::decode::decode_text;
use crate::adapters::delimited::read_catalog_rows;
use crate::core::catalog::Catalog;
use crate::core::substitution::{substitute, Substitution};
use crate::core::{ConfigProvider, DataQualityWarning, Pipeline, RunSummary, SourceRow, Storage};
use crate::domain::model::OutputFormat;
use crate::utils::error::{PayrollError, Result};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::BTreeMap;

pub const ANNOTATED_TEXT_FILE: &str = "annotated.txt";
pub const SUBSTITUTION_REPORT_FILE: &str = "substitution_report.json";
pub const SUBSTITUTED_CODES_FILE: &str = "substituted_codes.csv";

pub struct SubstitutionInput {
    pub catalog_rows: Vec<SourceRow>,
    pub text: String,
}

pub struct SubstitutionOutcome {
    pub catalog: Catalog,
    pub substitution: Substitution,
    pub warnings: Vec<DataQualityWarning>,
}

#[derive(Debug, Serialize)]
struct SubstitutionReport<'a> {
    generated_at: DateTime<Utc>,
    catalog_codes: usize,
    distinct_codes: usize,
    replacements: usize,
    substituted_codes: &'a [String],
    occurrences: &'a BTreeMap<String, usize>,
    warnings: &'a [DataQualityWarning],
}

pub struct SubstitutionPipeline<S: Storage, C: ConfigProvider> {
    storage: S,
    config: C,
    catalog_path: String,
    text_path: String,
}

impl<S: Storage, C: ConfigProvider> SubstitutionPipeline<S, C> {
    pub fn new(storage: S, config: C, catalog_path: impl Into<String>, text_path: impl Into<String>) -> Self {
        Self {
            storage,
            config,
            catalog_path: catalog_path.into(),
            text_path: text_path.into(),
        }
    }

    fn codes_csv(&self, outcome: &SubstitutionOutcome) -> Result<Vec<u8>> {
        let mut writer = csv::WriterBuilder::new()
            .delimiter(self.config.delimiter())
            .from_writer(Vec::new());

        writer.write_record(["COD", "TIPO", "DES", "VALOR", "OCORRENCIAS"])?;
        for code in &outcome.substitution.substituted_codes {
            let Some(entry) = outcome.catalog.get(code) else {
                continue;
            };
            let count = outcome
                .substitution
                .occurrences
                .get(code)
                .copied()
                .unwrap_or_default();
            writer.write_record([
                entry.code.as_str(),
                entry.kind.tag(),
                entry.description.as_str(),
                entry.value.as_str(),
                count.to_string().as_str(),
            ])?;
        }

        writer
            .into_inner()
            .map_err(|e| PayrollError::IoError(e.into_error()))
    }
}

#[async_trait::async_trait]
impl<S: Storage, C: ConfigProvider> Pipeline for SubstitutionPipeline<S, C> {
    type Extracted = SubstitutionInput;
    type Transformed = SubstitutionOutcome;

    async fn extract(&self) -> Result<SubstitutionInput> {
        tracing::debug!("Reading catalog from {}", self.catalog_path);
        let catalog_bytes = self.storage.read_file(&self.catalog_path).await?;
        let catalog_text = decode_text(catalog_bytes, &self.catalog_path)?;
        let catalog_rows = read_catalog_rows(&catalog_text, self.config.delimiter())?;

        tracing::debug!("Reading text from {}", self.text_path);
        let text_bytes = self.storage.read_file(&self.text_path).await?;
        let text = decode_text(text_bytes, &self.text_path)?;

        Ok(SubstitutionInput { catalog_rows, text })
    }

    async fn transform(&self, data: SubstitutionInput) -> Result<SubstitutionOutcome> {
        let (catalog, warnings) = Catalog::build(data.catalog_rows);
        tracing::info!("Catalog loaded: {} codes", catalog.len());

        let substitution = substitute(&data.text, &catalog);

        Ok(SubstitutionOutcome {
            catalog,
            substitution,
            warnings,
        })
    }

    async fn load(&self, result: SubstitutionOutcome) -> Result<RunSummary> {
        let mut written = Vec::new();

        for format in self.config.output_formats() {
            let path = match format {
                OutputFormat::Txt => {
                    self.storage
                        .write_file(ANNOTATED_TEXT_FILE, result.substitution.text.as_bytes())
                        .await?
                }
                OutputFormat::Json => {
                    let report = SubstitutionReport {
                        generated_at: Utc::now(),
                        catalog_codes: result.catalog.len(),
                        distinct_codes: result.substitution.distinct_codes(),
                        replacements: result.substitution.replacements,
                        substituted_codes: &result.substitution.substituted_codes,
                        occurrences: &result.substitution.occurrences,
                        warnings: &result.warnings,
                    };
                    let json = serde_json::to_string_pretty(&report)?;
                    self.storage
                        .write_file(SUBSTITUTION_REPORT_FILE, json.as_bytes())
                        .await?
                }
                OutputFormat::Csv => {
                    let data = self.codes_csv(&result)?;
                    self.storage.write_file(SUBSTITUTED_CODES_FILE, &data).await?
                }
            };
            written.push(path);
        }

        let headline = format!(
            "{} distinct codes substituted ({} occurrences)",
            result.substitution.distinct_codes(),
            result.substitution.replacements
        );

        Ok(RunSummary {
            headline,
            display: result.substitution.substituted_codes.join(", "),
            written,
            warnings: result.warnings,
        })
    }
}
