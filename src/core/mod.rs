pub mod aggregation;
pub mod catalog;
pub mod engine;
pub mod number;
pub mod substitution;

pub use crate::domain::model::{CatalogEntry, DataQualityWarning, PayrollRow, SourceRow};
pub use crate::domain::ports::{ConfigProvider, Pipeline, RunSummary, Storage};
pub use crate::utils::error::Result;
