use crate::domain::ports::{ConfigProvider, PageFetcher};
use crate::utils::error::{ExportError, Result};
use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE, COOKIE};
use reqwest::Client;
use std::time::Duration;
use url::Url;

const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/126.0.0.0 Safari/537.36";

pub struct HttpPageFetcher {
    client: Client,
}

impl HttpPageFetcher {
    pub fn new(cookie: Option<&str>, timeout: Duration) -> Result<Self> {
        let mut headers = HeaderMap::new();
        if let Some(cookie) = cookie {
            let value =
                HeaderValue::from_str(cookie).map_err(|e| ExportError::InvalidConfigValueError {
                    field: "cookie".to_string(),
                    value: "<redacted>".to_string(),
                    reason: e.to_string(),
                })?;
            headers.insert(COOKIE, value);
        }

        let client = Client::builder()
            .user_agent(USER_AGENT)
            .default_headers(headers)
            .timeout(timeout)
            .build()?;

        Ok(Self { client })
    }

    pub fn from_config<C: ConfigProvider>(config: &C) -> Result<Self> {
        Self::new(
            config.session_cookie(),
            Duration::from_secs(config.timeout_seconds()),
        )
    }

    /// 送出請求前才套用在位址上的附加參數；已存在的同名參數以新值取代
    fn decorate_locator(url: &Url) -> Url {
        let kept: Vec<(String, String)> = url
            .query_pairs()
            .filter(|(key, _)| key != "disableCsd")
            .map(|(key, value)| (key.into_owned(), value.into_owned()))
            .collect();

        let mut decorated = url.clone();
        decorated.set_query(None);
        for (key, value) in &kept {
            decorated.query_pairs_mut().append_pair(key, value);
        }
        decorated
            .query_pairs_mut()
            .append_pair("disableCsd", "true");
        decorated
    }
}

impl PageFetcher for HttpPageFetcher {
    async fn fetch(&self, url: &Url) -> Result<String> {
        let fetch_url = Self::decorate_locator(url);
        tracing::debug!("GET {}", fetch_url);

        let response = self.client.get(fetch_url).send().await?;
        tracing::debug!("Response status: {}", response.status());
        let response = response.error_for_status()?;

        if let Some(content_type) = response.headers().get(CONTENT_TYPE) {
            let content_type = content_type.to_str().unwrap_or_default();
            if !content_type.starts_with("text/") {
                return Err(ExportError::ResponseFormatError {
                    url: url.to_string(),
                    reason: format!("expected an HTML page, got '{}'", content_type),
                });
            }
        }

        Ok(response.text().await?)
    }
}
