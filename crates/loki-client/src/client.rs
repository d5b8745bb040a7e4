//! Core HTTP client with retry and TLS/header configuration.

use reqwest::header::{HeaderMap, HeaderName, HeaderValue, AUTHORIZATION, USER_AGENT};
use tracing::{debug, info, instrument, warn};

use crate::config::ClientConfig;
use crate::error::{Error, ErrorKind, Result};
use crate::request::RequestBuilder;
use crate::response::Response;
use crate::retry::{RetryConfig, RetryPolicy};

/// HTTP session for the Loki API with built-in retry.
///
/// Wraps a single `reqwest::Client`, so every request shares one connection
/// pool, the configured default headers and the TLS setting.
#[derive(Debug, Clone)]
pub struct LokiHttpClient {
    inner: reqwest::Client,
    retry: Option<RetryConfig>,
    enable_tracing: bool,
}

impl LokiHttpClient {
    /// Create a new HTTP client from the given configuration.
    pub fn new(config: &ClientConfig) -> Result<Self> {
        let headers = default_headers(config)?;
        // A caller-supplied User-Agent header wins over the configured default.
        let has_user_agent = headers.contains_key(USER_AGENT);

        let mut builder = reqwest::Client::builder()
            .default_headers(headers)
            .danger_accept_invalid_certs(!config.verify_tls)
            .gzip(config.accept_compressed)
            .deflate(config.accept_compressed);

        if !has_user_agent {
            builder = builder.user_agent(&config.user_agent);
        }

        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        if let Some(timeout) = config.connect_timeout {
            builder = builder.connect_timeout(timeout);
        }

        let inner = builder
            .build()
            .map_err(|e| Error::with_source(ErrorKind::Config(e.to_string()), e))?;

        Ok(Self {
            inner,
            retry: config.retry.clone(),
            enable_tracing: config.enable_tracing,
        })
    }

    /// Create a GET request builder.
    pub fn get(&self, url: impl Into<String>) -> RequestBuilder {
        RequestBuilder::new(url)
    }

    /// Execute a request with automatic retry handling.
    ///
    /// A response whose status is still retryable once retries run out is
    /// returned as-is; callers decide whether that status is an error.
    #[instrument(skip(self, request), fields(url = %request.url))]
    pub async fn execute(&self, request: RequestBuilder) -> Result<Response> {
        let url = request.to_url()?;
        let mut retry_policy = self.retry.clone().map(RetryPolicy::new);

        loop {
            match self.execute_once(&request, &url).await {
                Ok(response) => {
                    let status = response.status();
                    let Some(policy) = retry_policy
                        .as_mut()
                        .filter(|p| p.is_retryable_status(status))
                    else {
                        return Ok(response);
                    };

                    match policy.next_delay(Some(status), response.retry_after()) {
                        Some(delay) => {
                            warn!(
                                attempt = policy.attempt(),
                                delay_ms = delay.as_millis() as u64,
                                status,
                                "Retryable status, retrying"
                            );
                            tokio::time::sleep(delay).await;
                        }
                        None => return Ok(response),
                    }
                }
                Err(err) if err.is_retryable() => {
                    let Some(policy) = retry_policy.as_mut() else {
                        return Err(err);
                    };

                    match policy.next_delay(None, None) {
                        Some(delay) => {
                            warn!(
                                attempt = policy.attempt(),
                                delay_ms = delay.as_millis() as u64,
                                error = %err,
                                "Request failed, retrying"
                            );
                            tokio::time::sleep(delay).await;
                        }
                        None => {
                            let attempts = policy.attempt() + 1;
                            let cause = match err.kind {
                                ErrorKind::Transport(message) => message,
                                other => other.to_string(),
                            };
                            return Err(Error {
                                kind: ErrorKind::Transport(format!(
                                    "all {} attempts failed: {}",
                                    attempts, cause
                                )),
                                source: err.source,
                            });
                        }
                    }
                }
                Err(err) => return Err(err),
            }
        }
    }

    /// Execute a single request without retry logic.
    async fn execute_once(&self, request: &RequestBuilder, url: &url::Url) -> Result<Response> {
        let mut req = self.inner.get(url.clone());

        for (name, value) in &request.headers {
            req = req.header(name.as_str(), value.as_str());
        }

        if self.enable_tracing {
            debug!(url = %url, "Sending request");
        }

        let response = req.send().await?;

        if self.enable_tracing {
            let status = response.status().as_u16();
            let content_length = response.content_length();

            if response.status().is_success() {
                debug!(status, content_length, "Response received");
            } else {
                info!(status, content_length, "Non-success response");
            }
        }

        Ok(Response::new(response))
    }
}

/// Convert configured headers into a validated header map.
fn default_headers(config: &ClientConfig) -> Result<HeaderMap> {
    let mut headers = HeaderMap::with_capacity(config.headers.len());
    for (name, value) in &config.headers {
        let header_name = HeaderName::from_bytes(name.as_bytes()).map_err(|e| {
            Error::with_source(ErrorKind::Config(format!("invalid header name: {}", name)), e)
        })?;
        let mut header_value = HeaderValue::from_str(value).map_err(|e| {
            Error::with_source(ErrorKind::Config(format!("invalid value for header {}", name)), e)
        })?;
        header_value.set_sensitive(header_name == AUTHORIZATION);
        headers.insert(header_name, header_value);
    }
    Ok(headers)
}
