//! HTTP fetcher for JSON collections.
//!
//! ### Classification
//! - Transport errors (connect, TLS, timeout) are failures
//! - Any non-2xx status is a failure
//! - A body that is too large or does not decode as a JSON array is a failure
//!
//! All of these become a single [`FetchFailure`] carrying a message; the cache
//! above does not distinguish them.

pub mod key;

pub use key::{KeyError, cache_key};

use reqwest::{Client, header};
use serde::de::DeserializeOwned;
use std::time::{Duration, Instant};
use userdeck_core::{AppConfig, Error, FetchFailure, Fetcher};

/// Configuration for the HTTP fetcher.
#[derive(Debug, Clone)]
pub struct FetchConfig {
    /// User agent string (default: "userdeck/0.1")
    pub user_agent: String,

    /// Maximum response body size in bytes (default: 5MB)
    pub max_bytes: usize,

    /// Request timeout (default: 20s)
    pub timeout: Duration,

    /// Honour proxy settings from the environment (default: true)
    pub system_proxy: bool,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            user_agent: "userdeck/0.1".to_string(),
            max_bytes: 5 * 1024 * 1024,
            timeout: Duration::from_millis(20000),
            system_proxy: true,
        }
    }
}

impl From<&AppConfig> for FetchConfig {
    fn from(config: &AppConfig) -> Self {
        Self {
            user_agent: config.user_agent.clone(),
            max_bytes: config.max_bytes,
            timeout: config.timeout(),
            system_proxy: config.system_proxy,
        }
    }
}

/// Fetches a URL and decodes its body as a JSON array of records.
///
/// Cheap to clone; clones share the connection pool.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    http: Client,
    config: FetchConfig,
}

impl HttpFetcher {
    /// Create a new fetcher with the given configuration.
    pub fn new(config: FetchConfig) -> Result<Self, Error> {
        let mut builder = Client::builder()
            .user_agent(&config.user_agent)
            .timeout(config.timeout)
            .use_rustls_tls()
            .gzip(true)
            .brotli(true)
            .deflate(true);
        if !config.system_proxy {
            builder = builder.no_proxy();
        }
        let http = builder
            .build()
            .map_err(|e| Error::InvalidInput(format!("failed to build HTTP client: {e}")))?;

        Ok(Self { http, config })
    }

    /// Get reference to the configuration.
    pub fn config(&self) -> &FetchConfig {
        &self.config
    }

    /// GET `url` and decode the body as `Vec<T>`.
    pub async fn fetch_json<T: DeserializeOwned>(&self, url: &str) -> Result<Vec<T>, FetchFailure> {
        let start = Instant::now();

        let response = self
            .http
            .get(url)
            .header(header::ACCEPT, "application/json")
            .send()
            .await
            .map_err(transport_failure)?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchFailure::new(format!("status {}", status.as_u16())));
        }

        if let Some(len) = response.content_length()
            && len as usize > self.config.max_bytes
        {
            return Err(FetchFailure::new(format!("{} bytes exceeds {}", len, self.config.max_bytes)));
        }

        let bytes = response.bytes().await.map_err(transport_failure)?;
        if bytes.len() > self.config.max_bytes {
            return Err(FetchFailure::new(format!("{} bytes exceeds {}", bytes.len(), self.config.max_bytes)));
        }

        let records: Vec<T> =
            serde_json::from_slice(&bytes).map_err(|e| FetchFailure::new(format!("decode error: {e}")))?;

        tracing::debug!(
            "fetched {} in {}ms ({} bytes, {} records)",
            url,
            start.elapsed().as_millis(),
            bytes.len(),
            records.len()
        );

        Ok(records)
    }
}

#[async_trait::async_trait]
impl<T> Fetcher<T> for HttpFetcher
where
    T: DeserializeOwned + Send + 'static,
{
    async fn fetch(&self, key: &str) -> Result<Vec<T>, FetchFailure> {
        self.fetch_json(key).await
    }
}

fn transport_failure(err: reqwest::Error) -> FetchFailure {
    if err.is_timeout() {
        FetchFailure::new("request timeout")
    } else {
        FetchFailure::new(format!("network error: {err}"))
    }
}
