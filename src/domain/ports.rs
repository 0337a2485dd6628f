use crate::domain::model::MealSlots;
use crate::parser::date_range::QuarterContext;
use crate::parser::table::Table;
use crate::parser::ParseReport;
use crate::utils::error::Result;
use async_trait::async_trait;

pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

pub trait ConfigProvider: Send + Sync {
    /// 抽取工具輸出的表格 JSON
    fn input_path(&self) -> &str;
    fn output_path(&self) -> String;
    fn quarter_context(&self) -> QuarterContext;
}

#[async_trait]
pub trait Pipeline: Send + Sync {
    async fn extract(&self) -> Result<Vec<Table>>;
    async fn transform(&self, tables: Vec<Table>) -> Result<ParseReport>;
    async fn load(&self, report: &ParseReport) -> Result<String>;
}

/// 把一天的原始文字行分到三道菜
pub trait MealClassifier: Send + Sync {
    fn classify(&self, lines: &[String]) -> MealSlots;
}
