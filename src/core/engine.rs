use crate::core::Pipeline;
use crate::utils::error::{ExportError, Result};

pub struct ExportEngine<P: Pipeline> {
    pipeline: P,
}

impl<P: Pipeline> ExportEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self { pipeline }
    }

    pub async fn run(&self) -> Result<String> {
        tracing::info!("Starting order export...");

        let records = self.pipeline.extract().await?;
        tracing::info!("Extracted {} records", records.len());

        if records.is_empty() {
            return Err(ExportError::NoOrdersError);
        }

        let export = self.pipeline.transform(records).await?;
        tracing::info!("Serialized {} records to CSV", export.record_count);

        let output_path = self.pipeline.load(export).await?;
        tracing::info!("Output saved to: {}", output_path);

        Ok(output_path)
    }
}
