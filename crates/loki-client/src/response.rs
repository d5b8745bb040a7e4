//! HTTP response handling.

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::warn;

use crate::error::{Error, ErrorKind, Result};

/// Wrapper around an HTTP response from the Loki host.
#[derive(Debug)]
pub struct Response {
    inner: reqwest::Response,
}

impl Response {
    pub(crate) fn new(inner: reqwest::Response) -> Self {
        Self { inner }
    }

    /// Get the HTTP status code.
    pub fn status(&self) -> u16 {
        self.inner.status().as_u16()
    }

    /// Returns true if the response status is successful (2xx).
    pub fn is_success(&self) -> bool {
        self.inner.status().is_success()
    }

    /// Returns true for client and server errors (4xx and 5xx).
    pub fn is_error(&self) -> bool {
        self.status() >= 400
    }

    /// Get a header value.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.inner.headers().get(name)?.to_str().ok()
    }

    /// Get the Retry-After header as a Duration.
    ///
    /// Accepts both delay-seconds and HTTP-date values. A date in the past
    /// yields a zero delay.
    pub fn retry_after(&self) -> Option<Duration> {
        parse_retry_after(self.header("retry-after")?, Utc::now())
    }

    /// Get the response body as text.
    pub async fn text(self) -> Result<String> {
        self.inner.text().await.map_err(Into::into)
    }

    /// Get the response body as bytes.
    pub async fn bytes(self) -> Result<bytes::Bytes> {
        self.inner.bytes().await.map_err(Into::into)
    }

    /// Deserialize the response body as JSON.
    pub async fn json<T: DeserializeOwned>(self) -> Result<T> {
        let body = self.bytes().await?;
        serde_json::from_slice(&body).map_err(Into::into)
    }

    /// Fail with [`ErrorKind::HttpStatus`] unless the status is 2xx.
    ///
    /// The error carries the full response body.
    pub async fn error_for_status(self) -> Result<Self> {
        if self.is_success() {
            return Ok(self);
        }

        let status = self.status();
        let body = match self.text().await {
            Ok(body) => body,
            Err(err) => {
                warn!(status, error = %err, "Failed to read error response body");
                String::new()
            }
        };
        Err(Error::new(ErrorKind::HttpStatus { status, body }))
    }
}

/// Parse a Retry-After value relative to `now`.
fn parse_retry_after(value: &str, now: DateTime<Utc>) -> Option<Duration> {
    let value = value.trim();
    if let Ok(seconds) = value.parse::<u64>() {
        return Some(Duration::from_secs(seconds));
    }

    let at = DateTime::parse_from_rfc2822(value).ok()?.with_timezone(&Utc);
    Some((at - now).to_std().unwrap_or(Duration::ZERO))
}
