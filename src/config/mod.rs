pub mod cli;
pub mod toml_config;

use crate::core::ConfigProvider;
use crate::utils::error::Result;
use crate::utils::validation::{self, Validate};
use clap::Parser;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, Parser)]
#[command(name = "order-export")]
#[command(about = "Export Amazon order history pages to a CSV file")]
pub struct CliConfig {
    #[arg(
        long,
        default_value = "https://www.amazon.com/gp/css/order-history?tab=all"
    )]
    pub start_url: String,

    #[arg(long, default_value = "./output")]
    pub output_path: String,

    #[arg(long, help = "Session cookie attached to every page request")]
    pub cookie: Option<String>,

    #[arg(long, default_value = "30")]
    pub timeout_seconds: u64,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,
}

impl ConfigProvider for CliConfig {
    fn start_url(&self) -> &str {
        &self.start_url
    }

    fn output_path(&self) -> &str {
        &self.output_path
    }

    fn session_cookie(&self) -> Option<&str> {
        self.cookie.as_deref()
    }

    fn timeout_seconds(&self) -> u64 {
        self.timeout_seconds
    }
}

impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        validation::validate_url("start_url", &self.start_url)?;
        validation::validate_path("output_path", &self.output_path)?;

        if let Some(cookie) = &self.cookie {
            validation::validate_non_empty_string("cookie", cookie)?;
        }

        validation::validate_range("timeout_seconds", self.timeout_seconds, 1, 300)?;

        Ok(())
    }
}
