//! High-level Loki client.
//!
//! `LokiClient` binds an HTTP session to a Loki host and exposes the
//! readiness check plus instant and range LogQL queries. Responses are
//! returned as untyped JSON.
//!
//! ## Security
//!
//! - Header values are redacted in Debug output
//! - Header values are never recorded in tracing spans

use std::collections::BTreeMap;

use serde_json::Value;
use tracing::instrument;
use url::Url;

use crate::client::LokiHttpClient;
use crate::config::ClientConfig;
use crate::error::{Error, Result};
use crate::query::{QueryRequest, RangeQueryRequest};

const READY_PATH: &str = "/ready";
const QUERY_PATH: &str = "/loki/api/v1/query";
const QUERY_RANGE_PATH: &str = "/loki/api/v1/query_range";

/// Client for the Loki HTTP query API.
///
/// # Example
///
/// ```rust,ignore
/// use loki_api_client::{LokiClient, QueryRequest};
///
/// let client = LokiClient::new("http://127.0.0.1:3100")?;
///
/// if client.ready().await? {
///     let logs = client
///         .query(&QueryRequest::new(r#"{job="varlogs"}"#).limit(25))
///         .await?;
///     println!("{}", logs["data"]["result"]);
/// }
/// ```
#[derive(Debug, Clone)]
pub struct LokiClient {
    http: LokiHttpClient,
    base_url: String,
    loki_host: String,
    config: ClientConfig,
}

impl LokiClient {
    /// Create a client for the given base URL with default configuration.
    pub fn new(url: impl Into<String>) -> Result<Self> {
        Self::with_config(ClientConfig::builder().with_url(url).build())
    }

    /// Create a client for the default URL (`http://127.0.0.1:3100`).
    pub fn default_client() -> Result<Self> {
        Self::with_config(ClientConfig::default())
    }

    /// Create a client with custom configuration.
    pub fn with_config(config: ClientConfig) -> Result<Self> {
        let trimmed = config.url.trim();
        if trimmed.is_empty() {
            return Err(Error::config("missing url"));
        }

        let parsed = Url::parse(trimmed)?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(Error::config(format!(
                "unsupported URL scheme: {}",
                parsed.scheme()
            )));
        }
        let loki_host = match (parsed.host_str(), parsed.port()) {
            (Some(host), Some(port)) => format!("{}:{}", host, port),
            (Some(host), None) => host.to_string(),
            (None, _) => return Err(Error::config(format!("URL has no host: {}", trimmed))),
        };

        let http = LokiHttpClient::new(&config)?;
        Ok(Self {
            http,
            base_url: trimmed.trim_end_matches('/').to_string(),
            loki_host,
            config,
        })
    }

    /// Base URL all endpoints are resolved against, without a trailing slash.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Host (and port, if explicit) of the Loki server.
    pub fn loki_host(&self) -> &str {
        &self.loki_host
    }

    /// Get the client configuration.
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Check whether the Loki host is ready to accept traffic.
    ///
    /// Returns `Ok(false)` for any 4xx/5xx status; only transport failures
    /// are reported as errors.
    pub async fn ready(&self) -> Result<bool> {
        self.ready_with_params(BTreeMap::new()).await
    }

    /// Readiness check with extra query-string parameters.
    #[instrument(skip(self, params), fields(host = %self.loki_host))]
    pub async fn ready_with_params(&self, params: BTreeMap<String, String>) -> Result<bool> {
        let request = self.http.get(self.endpoint(READY_PATH)).queries(params);
        let response = self.http.execute(request).await?;
        Ok(!response.is_error())
    }

    /// Run an instant LogQL query.
    ///
    /// Validation failures are returned before any request is sent.
    #[instrument(skip(self, request), fields(host = %self.loki_host, query = %request.query_str()))]
    pub async fn query(&self, request: &QueryRequest) -> Result<Value> {
        let params = request.to_params()?;
        self.get_json(QUERY_PATH, params).await
    }

    /// Run a LogQL query over a time range.
    #[instrument(skip(self, request), fields(host = %self.loki_host))]
    pub async fn query_range(&self, request: &RangeQueryRequest) -> Result<Value> {
        let params = request.to_params()?;
        self.get_json(QUERY_RANGE_PATH, params).await
    }

    async fn get_json(&self, path: &str, params: BTreeMap<String, String>) -> Result<Value> {
        let request = self.http.get(self.endpoint(path)).queries(params);
        let mut response = self.http.execute(request).await?;

        if !self.config.ignore_http_errors {
            response = response.error_for_status().await?;
        }

        response.json().await
    }
}
