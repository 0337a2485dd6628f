use crate::core::{ConfigProvider, Pipeline, Storage};
use crate::parser::table::{tables_from_json, Table};
use crate::parser::{MenuParser, ParseReport};
use crate::utils::error::Result;

/// 讀取抽取結果 → 解析菜單 → 寫出 JSON
pub struct MenuPipeline<S: Storage, C: ConfigProvider> {
    storage: S,
    config: C,
    parser: MenuParser,
}

impl<S: Storage, C: ConfigProvider> MenuPipeline<S, C> {
    pub fn new(storage: S, config: C) -> Self {
        let parser = MenuParser::new(config.quarter_context());
        Self {
            storage,
            config,
            parser,
        }
    }
}

#[async_trait::async_trait]
impl<S: Storage, C: ConfigProvider> Pipeline for MenuPipeline<S, C> {
    async fn extract(&self) -> Result<Vec<Table>> {
        tracing::debug!("Reading extracted tables from: {}", self.config.input_path());
        let data = self.storage.read_file(self.config.input_path()).await?;
        tables_from_json(&data)
    }

    async fn transform(&self, tables: Vec<Table>) -> Result<ParseReport> {
        tracing::debug!(
            "Parsing {} tables for academic year {}",
            tables.len(),
            self.parser.context().academic_year()
        );
        let report = self.parser.parse(&tables)?;

        for skipped in &report.skipped {
            tracing::warn!("⚠️ Skipped block at {}: {}", skipped.location, skipped.error);
        }
        Ok(report)
    }

    async fn load(&self, report: &ParseReport) -> Result<String> {
        let output_path = self.config.output_path();
        let json = report.document.to_json_pretty()?;

        tracing::debug!("Writing menu JSON ({} bytes) to storage", json.len());
        self.storage.write_file(&output_path, json.as_bytes()).await?;

        Ok(output_path)
    }
}
