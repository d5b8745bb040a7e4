//! # loki-client
//!
//! HTTP client for the Grafana Loki query API.
//!
//! This crate provides:
//! - A readiness check against `/ready`
//! - Instant (`/loki/api/v1/query`) and range (`/loki/api/v1/query_range`)
//!   LogQL queries returning raw JSON
//! - Automatic retry with exponential backoff on transient statuses
//! - Custom headers, TLS verification toggle and optional request timeouts
//! - Connection pooling through a single shared session
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                       LokiClient                            │
//! │  - Validates query parameters                               │
//! │  - ready(), query(), query_range()                          │
//! │  - Maps statuses to bool / HttpStatus errors                │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │                     LokiHttpClient                          │
//! │  - Shared reqwest session (headers, TLS, timeouts)          │
//! │  - Retry on transient statuses and transport failures       │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Example
//!
//! ```rust,ignore
//! use loki_api_client::{ClientConfig, Direction, LokiClient, QueryRequest};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), loki_api_client::Error> {
//!     let client = LokiClient::with_config(
//!         ClientConfig::builder()
//!             .with_url("https://loki.example.com")
//!             .with_bearer_token("my-token")
//!             .build(),
//!     )?;
//!
//!     if !client.ready().await? {
//!         return Ok(());
//!     }
//!
//!     let logs = client
//!         .query(&QueryRequest::new(r#"{job="varlogs"}"#).direction(Direction::Forward))
//!         .await?;
//!     println!("{}", logs["status"]);
//!
//!     Ok(())
//! }
//! ```

mod client;
mod config;
mod error;
mod loki_client;
mod query;
mod request;
mod response;
mod retry;

pub use client::LokiHttpClient;
pub use config::{ClientConfig, ClientConfigBuilder, DEFAULT_URL};
pub use error::{Error, ErrorKind, Result};
pub use loki_client::LokiClient;
pub use query::{
    Direction, QueryRequest, RangeQueryRequest, DEFAULT_QUERY_LIMIT, DEFAULT_RANGE_LIMIT,
};
pub use request::RequestBuilder;
pub use response::Response;
pub use retry::{
    RetryConfig, RetryPolicy, DEFAULT_BACKOFF_FACTOR, DEFAULT_MAX_BACKOFF, DEFAULT_MAX_RETRIES,
    DEFAULT_RETRY_STATUSES,
};

/// User-Agent string for the client
pub const USER_AGENT: &str = concat!("loki-api/", env!("CARGO_PKG_VERSION"));
