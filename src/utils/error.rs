use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("Page request failed: {0}")]
    RequestError(#[from] reqwest::Error),

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("URL parsing error: {0}")]
    UrlError(#[from] url::ParseError),

    #[error("Config parsing error: {0}")]
    ConfigParseError(#[from] toml::de::Error),

    #[error("Unusable response from {url}: {reason}")]
    ResponseFormatError { url: String, reason: String },

    #[error("No orders found on this page.")]
    NoOrdersError,

    #[error("Invalid configuration value for '{field}' ({value}): {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Data processing error: {message}")]
    ProcessingError { message: String },
}

pub type Result<T> = std::result::Result<T, ExportError>;
