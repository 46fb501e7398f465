use super::toml_config::TomlConfig;
use crate::domain::model::{GroupLayout, OutputFormat};
use clap::{Parser, Subcommand, ValueEnum};

#[derive(Debug, Clone, Parser)]
#[command(name = "payroll-annotator")]
#[command(about = "Annotates payroll codes in text and totals payroll amounts by accounting group")]
pub struct CliConfig {
    #[command(subcommand)]
    pub command: Command,

    /// TOML job file; command-line values override it
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    #[arg(long, global = true)]
    pub output_path: Option<String>,

    /// Field delimiter of the input files (default ";")
    #[arg(long, global = true)]
    pub delimiter: Option<String>,

    #[arg(long, value_enum, value_delimiter = ',', global = true)]
    pub formats: Vec<OutputFormat>,

    #[arg(short, long, global = true, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, value_enum, default_value = "compact", global = true)]
    pub log_format: LogFormat,

    /// Show what would be processed without reading or writing files
    #[arg(long, global = true)]
    pub dry_run: bool,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Replace catalog codes in a text with "description (value)"
    Substitute {
        #[arg(long)]
        catalog: Option<String>,
        #[arg(long)]
        text: Option<String>,
    },
    /// Sum payroll values by accounting group
    Aggregate {
        #[arg(long)]
        groups: Option<String>,
        #[arg(long)]
        payroll: Option<String>,
        #[arg(long, value_enum)]
        layout: Option<GroupLayout>,
        #[arg(long)]
        fallback_group: Option<String>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    Compact,
    Json,
}

impl CliConfig {
    /// Writes every value given on the command line over the job file.
    pub fn apply_to(&self, config: &mut TomlConfig) {
        if let Some(path) = &self.output_path {
            config.output.output_path = path.clone();
        }
        if let Some(delimiter) = &self.delimiter {
            config.input.delimiter = delimiter.clone();
        }
        if !self.formats.is_empty() {
            config.output.formats = self.formats.clone();
        }

        match &self.command {
            Command::Substitute { catalog, text } => {
                if catalog.is_some() {
                    config.substitution.catalog = catalog.clone();
                }
                if text.is_some() {
                    config.substitution.text = text.clone();
                }
            }
            Command::Aggregate {
                groups,
                payroll,
                layout,
                fallback_group,
            } => {
                if groups.is_some() {
                    config.aggregation.groups = groups.clone();
                }
                if payroll.is_some() {
                    config.aggregation.payroll = payroll.clone();
                }
                if let Some(layout) = layout {
                    config.aggregation.group_layout = *layout;
                }
                if let Some(group) = fallback_group {
                    config.aggregation.fallback_group = group.clone();
                }
            }
        }
    }
}
