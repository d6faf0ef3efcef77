use crate::domain::model::{DatePolicy, RawCandidate, TransformResult};
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
    fn source_url(&self) -> &str;
    fn output_path(&self) -> &str;
    fn raw_dump_path(&self) -> Option<&str>;
    fn timeout_seconds(&self) -> Option<u64>;
    fn date_policy(&self) -> DatePolicy;
}

#[async_trait]
pub trait Pipeline: Send + Sync {
    async fn extract(&self) -> Result<Vec<RawCandidate>>;
    async fn transform(&self, data: Vec<RawCandidate>) -> Result<TransformResult>;
    async fn load(&self, result: &TransformResult) -> Result<String>;
}
