use crate::domain::model::{ColumnNames, Dataset, RunSummary, SanitizerRules, TransformResult};
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
    fn input_file(&self) -> &str;
    fn output_path(&self) -> &str;
    fn facilities_file(&self) -> &str;
    fn index_file(&self) -> &str;
    fn dropped_file(&self) -> &str;
    fn columns(&self) -> &ColumnNames;
    fn cell_size_deg(&self) -> f64;
    fn sanitizer_rules(&self) -> &SanitizerRules;
}

#[async_trait]
pub trait Pipeline: Send + Sync {
    async fn extract(&self) -> Result<Dataset>;
    async fn transform(&self, data: Dataset) -> Result<TransformResult>;
    async fn load(&self, result: TransformResult) -> Result<RunSummary>;
}
