use crate::core::{Pipeline, RunSummary};
use crate::utils::error::Result;

pub struct JobEngine<P: Pipeline> {
    pipeline: P,
}

impl<P: Pipeline> JobEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self { pipeline }
    }

    pub async fn run(&self) -> Result<RunSummary> {
        tracing::info!("Reading inputs...");
        let extracted = self.pipeline.extract().await?;

        tracing::info!("Processing...");
        let transformed = self.pipeline.transform(extracted).await?;

        tracing::info!("Writing outputs...");
        let summary = self.pipeline.load(transformed).await?;

        if !summary.warnings.is_empty() {
            tracing::warn!("{} data quality warnings", summary.warnings.len());
        }
        for path in &summary.written {
            tracing::info!("Output saved to: {}", path);
        }

        Ok(summary)
    }
}
