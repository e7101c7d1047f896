pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

pub use crate::config::{cli::LocalStorage, toml_config::TomlConfig, CliConfig};
pub use crate::core::{
    engine::ExportEngine, fetcher::HttpPageFetcher, pipeline::OrderExportPipeline,
};
pub use crate::domain::model::OrderRecord;
pub use crate::utils::error::{ExportError, Result};
