use crate::domain::model::{CrawlProgress, CsvExport, OrderRecord};
use crate::utils::error::Result;
use async_trait::async_trait;
use std::time::Duration;
use url::Url;

pub trait PageFetcher: Send + Sync {
    fn fetch(&self, url: &Url) -> impl std::future::Future<Output = Result<String>> + Send;
}

pub trait Delay: Send + Sync {
    fn sleep(&self, duration: Duration) -> impl std::future::Future<Output = ()> + Send;
}

pub trait ProgressSink: Send + Sync {
    fn report(&self, progress: &CrawlProgress);
}

pub trait Storage: Send + Sync {
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

pub trait ConfigProvider: Send + Sync {
    fn start_url(&self) -> &str;
    fn output_path(&self) -> &str;
    fn session_cookie(&self) -> Option<&str>;
    fn timeout_seconds(&self) -> u64;
}

#[async_trait]
pub trait Pipeline: Send + Sync {
    async fn extract(&self) -> Result<Vec<OrderRecord>>;
    async fn transform(&self, records: Vec<OrderRecord>) -> Result<CsvExport>;
    async fn load(&self, export: CsvExport) -> Result<String>;
}
