//! # loki-api
//!
//! A small client library for the Grafana Loki log-aggregation HTTP API.
//!
//! The library checks host readiness and runs LogQL instant and range queries,
//! returning the decoded JSON response. Requests go through one shared HTTP
//! session with retry on transient failures.
//!
//! ## Security
//!
//! - Header values (e.g. bearer tokens) are redacted in Debug output
//! - Tracing spans never record header values
//! - TLS verification is on unless explicitly disabled
//!
//! ## Crates
//!
//! - **loki-api-client** - HTTP session, retry policy, readiness check and query operations
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use loki_api::{LokiClient, QueryRequest};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = LokiClient::new("http://127.0.0.1:3100")?;
//!
//!     if client.ready().await? {
//!         let result = client
//!             .query(&QueryRequest::new(r#"{job="varlogs"} |= "error""#).limit(25))
//!             .await?;
//!
//!         println!("{}", serde_json::to_string_pretty(&result)?);
//!     }
//!
//!     Ok(())
//! }
//! ```

// Re-export the client crate for convenient access
pub use loki_api_client as client;

// Re-export commonly used types at the top level
pub use loki_api_client::{
    ClientConfig, Direction, Error, ErrorKind, LokiClient, QueryRequest, RangeQueryRequest,
    Result, RetryConfig,
};
