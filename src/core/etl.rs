use crate::domain::model::PipelineOutcome;
use crate::domain::ports::Pipeline;
use crate::utils::error::Result;

/// Runs the four-step chain and collapses any failure into the single
/// Failed outcome. `run` never returns an error; callers only see the
/// (status, code) pair.
pub struct EtlEngine<P: Pipeline> {
    pipeline: P,
}

impl<P: Pipeline> EtlEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self { pipeline }
    }

    pub async fn run(&self) -> PipelineOutcome {
        match self.execute().await {
            Ok(rows) => {
                tracing::info!("Pipeline completed with {} rows loaded", rows);
                PipelineOutcome::success()
            }
            Err(e) => {
                tracing::error!(
                    error = %e,
                    category = ?e.category(),
                    detail = ?e,
                    "Pipeline failed"
                );
                PipelineOutcome::failed()
            }
        }
    }

    async fn execute(&self) -> Result<usize> {
        tracing::info!("Starting the pipeline");

        let payload = self.pipeline.fetch().await?;
        tracing::info!("Fetched data from API");

        let key = self.pipeline.archive(&payload).await?;
        tracing::info!("Raw data archived to {}", key);

        let table = self.pipeline.transform(payload).await?;
        let rows = table.row_count();
        tracing::info!("Transformed data into table with {} rows", rows);

        self.pipeline.load(table).await?;
        tracing::info!("Data loaded to warehouse successfully");

        Ok(rows)
    }
}
