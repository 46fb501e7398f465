use crate::domain::model::{DataQualityWarning, GroupLayout, OutputFormat};
use crate::utils::error::Result;
use async_trait::async_trait;

pub trait Storage: Send + Sync {
    /// Reads an input file; the path is used as given.
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    /// Writes an output file relative to the storage's output location.
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<String>> + Send;
}

pub trait ConfigProvider: Send + Sync {
    fn output_path(&self) -> &str;
    fn delimiter(&self) -> u8;
    fn fallback_group(&self) -> &str;
    fn group_layout(&self) -> GroupLayout;
    fn output_formats(&self) -> &[OutputFormat];
}

/// What a finished job hands back to its caller.
#[derive(Debug, Clone, Default)]
pub struct RunSummary {
    pub headline: String,
    /// Human-readable result for the terminal.
    pub display: String,
    pub written: Vec<String>,
    pub warnings: Vec<DataQualityWarning>,
}

#[async_trait]
pub trait Pipeline: Send + Sync {
    type Extracted: Send;
    type Transformed: Send;

    async fn extract(&self) -> Result<Self::Extracted>;
    async fn transform(&self, data: Self::Extracted) -> Result<Self::Transformed>;
    async fn load(&self, result: Self::Transformed) -> Result<RunSummary>;
}
