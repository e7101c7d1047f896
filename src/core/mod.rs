pub mod crawler;
pub mod csv;
pub mod engine;
pub mod extract;
pub mod fetcher;
pub mod pagination;
pub mod pipeline;

pub use crate::domain::model::{
    CrawlProgress, CsvExport, ExportSession, OrderRecord, SessionStatus,
};
pub use crate::domain::ports::{
    ConfigProvider, Delay, PageFetcher, Pipeline, ProgressSink, Storage,
};
pub use crate::utils::error::Result;
