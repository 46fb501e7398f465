pub mod adapters;
pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use crate::config::CliConfig;

pub use crate::adapters::LocalStorage;
pub use crate::app::pipelines::{AggregationPipeline, SubstitutionPipeline};
pub use crate::config::toml_config::TomlConfig;
pub use crate::core::aggregation::{Aggregator, GroupMap, Totals};
pub use crate::core::catalog::Catalog;
pub use crate::core::engine::JobEngine;
pub use crate::core::substitution::{substitute, Substitution};
pub use crate::utils::error::{PayrollError, Result};
