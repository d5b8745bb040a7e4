//! Client configuration.

use std::collections::HashMap;
use std::time::Duration;

use crate::retry::RetryConfig;

/// Default Loki address.
pub const DEFAULT_URL: &str = "http://127.0.0.1:3100";

/// Configuration for a [`LokiClient`](crate::LokiClient).
///
/// Header values are redacted in Debug output since they commonly carry
/// bearer tokens.
#[derive(Clone)]
pub struct ClientConfig {
    /// Base URL of the Loki host.
    pub url: String,
    /// Headers attached to every request.
    pub headers: HashMap<String, String>,
    /// Whether TLS certificates are verified.
    pub verify_tls: bool,
    /// Return response bodies for non-2xx statuses instead of failing.
    pub ignore_http_errors: bool,
    /// Retry configuration. `None` sends every request exactly once.
    pub retry: Option<RetryConfig>,
    /// Whole-request deadline. `None` waits indefinitely.
    pub timeout: Option<Duration>,
    /// Connection timeout.
    pub connect_timeout: Option<Duration>,
    /// User-Agent header value.
    pub user_agent: String,
    /// Accept gzip/deflate compressed responses.
    pub accept_compressed: bool,
    /// Whether to enable request/response tracing.
    pub enable_tracing: bool,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_URL.to_string(),
            headers: HashMap::new(),
            verify_tls: true,
            ignore_http_errors: false,
            retry: Some(RetryConfig::default()),
            timeout: None,
            connect_timeout: None,
            user_agent: crate::USER_AGENT.to_string(),
            accept_compressed: true,
            enable_tracing: true,
        }
    }
}

impl std::fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut header_names: Vec<&str> = self.headers.keys().map(String::as_str).collect();
        header_names.sort_unstable();

        f.debug_struct("ClientConfig")
            .field("url", &self.url)
            .field("headers", &header_names)
            .field("verify_tls", &self.verify_tls)
            .field("ignore_http_errors", &self.ignore_http_errors)
            .field("retry", &self.retry)
            .field("timeout", &self.timeout)
            .field("connect_timeout", &self.connect_timeout)
            .field("user_agent", &self.user_agent)
            .field("accept_compressed", &self.accept_compressed)
            .field("enable_tracing", &self.enable_tracing)
            .finish()
    }
}

impl ClientConfig {
    /// Create a new client config builder targeting the default URL.
    pub fn builder() -> ClientConfigBuilder {
        ClientConfigBuilder::default()
    }
}

/// Builder for ClientConfig.
#[derive(Debug, Default)]
pub struct ClientConfigBuilder {
    config: ClientConfig,
}

impl ClientConfigBuilder {
    /// Set the Loki base URL.
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.config.url = url.into();
        self
    }

    /// Add a header sent with every request.
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.config.headers.insert(name.into(), value.into());
        self
    }

    /// Add several headers sent with every request.
    pub fn with_headers<K, V>(mut self, headers: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        self.config
            .headers
            .extend(headers.into_iter().map(|(k, v)| (k.into(), v.into())));
        self
    }

    /// Shorthand for an `Authorization: Bearer <token>` header.
    pub fn with_bearer_token(self, token: impl AsRef<str>) -> Self {
        let value = format!("Bearer {}", token.as_ref());
        self.with_header("Authorization", value)
    }

    /// Skip TLS certificate verification.
    pub fn disable_tls_verification(mut self) -> Self {
        self.config.verify_tls = false;
        self
    }

    /// Set the retry configuration.
    pub fn with_retry(mut self, retry: RetryConfig) -> Self {
        self.config.retry = Some(retry);
        self
    }

    /// Disable retries.
    pub fn without_retry(mut self) -> Self {
        self.config.retry = None;
        self
    }

    /// Return bodies of non-2xx query responses instead of failing.
    pub fn ignore_http_errors(mut self, ignore: bool) -> Self {
        self.config.ignore_http_errors = ignore;
        self
    }

    /// Set request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = Some(timeout);
        self
    }

    /// Set connection timeout.
    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.config.connect_timeout = Some(timeout);
        self
    }

    /// Set custom User-Agent.
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.config.user_agent = user_agent.into();
        self
    }

    /// Enable or disable compressed responses.
    pub fn with_compression(mut self, enabled: bool) -> Self {
        self.config.accept_compressed = enabled;
        self
    }

    /// Enable or disable request/response tracing.
    pub fn with_tracing(mut self, enabled: bool) -> Self {
        self.config.enable_tracing = enabled;
        self
    }

    /// Build the client configuration.
    pub fn build(self) -> ClientConfig {
        self.config
    }
}
