use crate::core::crawler::{LogProgress, OrderCrawler, TokioDelay};
use crate::core::csv::{export_filename, serialize};
use crate::core::{
    ConfigProvider, CsvExport, Delay, OrderRecord, PageFetcher, Pipeline, ProgressSink,
    SessionStatus, Storage,
};
use crate::utils::error::Result;
use chrono::Local;
use url::Url;

pub struct OrderExportPipeline<F, S, C, D = TokioDelay, P = LogProgress>
where
    F: PageFetcher,
    S: Storage,
    C: ConfigProvider,
    D: Delay,
    P: ProgressSink,
{
    fetcher: F,
    storage: S,
    config: C,
    delay: D,
    progress: P,
}

impl<F: PageFetcher, S: Storage, C: ConfigProvider> OrderExportPipeline<F, S, C> {
    pub fn new(fetcher: F, storage: S, config: C) -> Self {
        Self {
            fetcher,
            storage,
            config,
            delay: TokioDelay,
            progress: LogProgress,
        }
    }
}

impl<F, S, C, D, P> OrderExportPipeline<F, S, C, D, P>
where
    F: PageFetcher,
    S: Storage,
    C: ConfigProvider,
    D: Delay,
    P: ProgressSink,
{
    /// 替換換頁等待的實作
    pub fn with_delay<D2: Delay>(self, delay: D2) -> OrderExportPipeline<F, S, C, D2, P> {
        OrderExportPipeline {
            fetcher: self.fetcher,
            storage: self.storage,
            config: self.config,
            delay,
            progress: self.progress,
        }
    }

    /// 替換進度回報的實作
    pub fn with_progress<P2: ProgressSink>(
        self,
        progress: P2,
    ) -> OrderExportPipeline<F, S, C, D, P2> {
        OrderExportPipeline {
            fetcher: self.fetcher,
            storage: self.storage,
            config: self.config,
            delay: self.delay,
            progress,
        }
    }
}

#[async_trait::async_trait]
impl<F, S, C, D, P> Pipeline for OrderExportPipeline<F, S, C, D, P>
where
    F: PageFetcher,
    S: Storage,
    C: ConfigProvider,
    D: Delay,
    P: ProgressSink,
{
    async fn extract(&self) -> Result<Vec<OrderRecord>> {
        let start_url = Url::parse(self.config.start_url())?;

        tracing::debug!("Fetching first page: {}", start_url);
        let first_page = self.fetcher.fetch(&start_url).await?;

        let crawler = OrderCrawler::new(&self.fetcher, &self.delay, &self.progress);
        let session = crawler.run(&first_page, &start_url).await;

        match session.status {
            SessionStatus::Failed(e) => {
                // 中途失敗時不輸出部分結果
                tracing::warn!(
                    "Export aborted after {} page(s), discarding {} partial record(s)",
                    session.pages_processed,
                    session.records.len()
                );
                Err(e)
            }
            _ => Ok(session.records),
        }
    }

    async fn transform(&self, records: Vec<OrderRecord>) -> Result<CsvExport> {
        let csv = serialize(&records)?;

        Ok(CsvExport {
            csv,
            record_count: records.len(),
        })
    }

    async fn load(&self, export: CsvExport) -> Result<String> {
        let filename = export_filename(Local::now().date_naive());

        tracing::debug!(
            "Writing CSV file ({} bytes) to storage",
            export.csv.len()
        );
        self.storage
            .write_file(&filename, export.csv.as_bytes())
            .await?;

        Ok(format!("{}/{}", self.config.output_path(), filename))
    }
}
