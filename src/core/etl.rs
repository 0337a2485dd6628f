use crate::core::Pipeline;
use crate::domain::model::MenuDocument;
use crate::parser::segmenter::SkippedBlock;
use crate::utils::error::Result;

#[derive(Debug, Clone)]
pub struct RunSummary {
    pub output_path: String,
    pub document: MenuDocument,
    pub skipped: Vec<SkippedBlock>,
}

pub struct EtlEngine<P: Pipeline> {
    pipeline: P,
}

impl<P: Pipeline> EtlEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self { pipeline }
    }

    pub async fn run(&self) -> Result<RunSummary> {
        tracing::info!("🚀 Starting menu extraction...");

        // Extract
        let tables = self.pipeline.extract().await?;
        tracing::info!("📄 Extracted {} tables", tables.len());

        // Transform
        let report = self.pipeline.transform(tables).await?;
        let weeks: usize = report
            .document
            .quarters()
            .iter()
            .map(|quarter| quarter.weeks().len())
            .sum();
        tracing::info!(
            "🍽️ Parsed {} weekly menus covering {} weeks ({} blocks skipped)",
            report.document.len(),
            weeks,
            report.skipped.len()
        );

        // Load
        let output_path = self.pipeline.load(&report).await?;
        tracing::info!("📁 Menu saved to: {}", output_path);

        Ok(RunSummary {
            output_path,
            document: report.document,
            skipped: report.skipped,
        })
    }
}
