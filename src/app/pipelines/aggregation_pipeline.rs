use crate::adapters::decode::decode_text;
use crate::adapters::delimited::{read_group_map, read_payroll_rows};
use crate::core::aggregation::{Aggregator, GroupMap, GroupTotal, Totals};
use crate::core::number::{format_br_amount, format_brl};
use crate::core::{ConfigProvider, DataQualityWarning, PayrollRow, Pipeline, RunSummary, Storage};
use crate::domain::model::OutputFormat;
use crate::utils::error::{PayrollError, Result};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

pub const TOTALS_TEXT_FILE: &str = "totals.txt";
pub const TOTALS_CSV_FILE: &str = "totals.csv";
pub const TOTALS_JSON_FILE: &str = "totals.json";

pub struct AggregationInput {
    pub group_map: GroupMap,
    pub rows: Vec<PayrollRow>,
    pub warnings: Vec<DataQualityWarning>,
}

pub struct AggregationOutcome {
    pub totals: Totals,
    pub rows_read: usize,
    pub warnings: Vec<DataQualityWarning>,
}

#[derive(Debug, Serialize)]
struct TotalsReport<'a> {
    generated_at: DateTime<Utc>,
    fallback_group: &'a str,
    rows_read: usize,
    grand_total: Decimal,
    groups: Vec<&'a GroupTotal>,
    warnings: &'a [DataQualityWarning],
}

/// Ranked totals as an aligned, currency-formatted table.
pub fn render_totals_table(totals: &Totals) -> String {
    let ranked = totals.ranked();
    let amounts: Vec<String> = ranked.iter().map(|g| format_brl(g.total)).collect();
    let grand_total = format_brl(totals.grand_total());

    let name_width = ranked
        .iter()
        .map(|g| g.group.chars().count())
        .chain(["GRUPO".len(), "TOTAL".len()])
        .max()
        .unwrap_or_default();
    let amount_width = amounts
        .iter()
        .map(|a| a.chars().count())
        .chain([grand_total.chars().count(), "VALOR".len()])
        .max()
        .unwrap_or_default();

    let mut table = format!("{:<name_width$}  {:>amount_width$}  LINHAS\n", "GRUPO", "VALOR");
    for (group, amount) in ranked.iter().zip(&amounts) {
        table.push_str(&format!(
            "{:<name_width$}  {:>amount_width$}  {:>6}\n",
            group.group, amount, group.rows
        ));
    }
    table.push_str(&format!("{:<name_width$}  {:>amount_width$}\n", "TOTAL", grand_total));
    table
}

pub struct AggregationPipeline<S: Storage, C: ConfigProvider> {
    storage: S,
    config: C,
    groups_path: String,
    payroll_path: String,
}

impl<S: Storage, C: ConfigProvider> AggregationPipeline<S, C> {
    pub fn new(storage: S, config: C, groups_path: impl Into<String>, payroll_path: impl Into<String>) -> Self {
        Self {
            storage,
            config,
            groups_path: groups_path.into(),
            payroll_path: payroll_path.into(),
        }
    }

    fn totals_csv(&self, totals: &Totals) -> Result<Vec<u8>> {
        let mut writer = csv::WriterBuilder::new()
            .delimiter(self.config.delimiter())
            .from_writer(Vec::new());

        writer.write_record(["GRUPO", "TOTAL", "LINHAS"])?;
        for group in totals.ranked() {
            writer.write_record([
                group.group.as_str(),
                format_br_amount(group.total).as_str(),
                group.rows.to_string().as_str(),
            ])?;
        }

        writer
            .into_inner()
            .map_err(|e| PayrollError::IoError(e.into_error()))
    }
}

#[async_trait::async_trait]
impl<S: Storage, C: ConfigProvider> Pipeline for AggregationPipeline<S, C> {
    type Extracted = AggregationInput;
    type Transformed = AggregationOutcome;

    async fn extract(&self) -> Result<AggregationInput> {
        let delimiter = self.config.delimiter();

        tracing::debug!("Reading group map from {}", self.groups_path);
        let groups_bytes = self.storage.read_file(&self.groups_path).await?;
        let groups_text = decode_text(groups_bytes, &self.groups_path)?;
        let (group_map, mut warnings) =
            read_group_map(&groups_text, delimiter, self.config.group_layout())?;

        tracing::debug!("Reading payroll rows from {}", self.payroll_path);
        let payroll_bytes = self.storage.read_file(&self.payroll_path).await?;
        let payroll_text = decode_text(payroll_bytes, &self.payroll_path)?;
        let (rows, row_warnings) = read_payroll_rows(&payroll_text, delimiter, &self.payroll_path)?;
        warnings.extend(row_warnings);

        Ok(AggregationInput {
            group_map,
            rows,
            warnings,
        })
    }

    async fn transform(&self, data: AggregationInput) -> Result<AggregationOutcome> {
        let aggregator = Aggregator::new(self.config.fallback_group());
        let (totals, aggregation_warnings) = aggregator.aggregate(&data.rows, &data.group_map);

        let mut warnings = data.warnings;
        warnings.extend(aggregation_warnings);

        tracing::info!(
            "Aggregated {} payroll rows into {} groups",
            data.rows.len(),
            totals.len()
        );

        Ok(AggregationOutcome {
            totals,
            rows_read: data.rows.len(),
            warnings,
        })
    }

    async fn load(&self, result: AggregationOutcome) -> Result<RunSummary> {
        let table = render_totals_table(&result.totals);
        let mut written = Vec::new();

        for format in self.config.output_formats() {
            let path = match format {
                OutputFormat::Txt => {
                    self.storage
                        .write_file(TOTALS_TEXT_FILE, table.as_bytes())
                        .await?
                }
                OutputFormat::Csv => {
                    let data = self.totals_csv(&result.totals)?;
                    self.storage.write_file(TOTALS_CSV_FILE, &data).await?
                }
                OutputFormat::Json => {
                    let report = TotalsReport {
                        generated_at: Utc::now(),
                        fallback_group: self.config.fallback_group(),
                        rows_read: result.rows_read,
                        grand_total: result.totals.grand_total(),
                        groups: result.totals.ranked(),
                        warnings: &result.warnings,
                    };
                    let json = serde_json::to_string_pretty(&report)?;
                    self.storage.write_file(TOTALS_JSON_FILE, json.as_bytes()).await?
                }
            };
            written.push(path);
        }

        let headline = format!(
            "{} groups, grand total {}",
            result.totals.len(),
            format_brl(result.totals.grand_total())
        );

        Ok(RunSummary {
            headline,
            display: table,
            written,
            warnings: result.warnings,
        })
    }
}
