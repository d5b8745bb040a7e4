//! LogQL query examples
//!
//! This example demonstrates:
//! 1. An instant query with a custom limit and direction
//! 2. A range query over the last hour
//! 3. Handling validation and HTTP status errors
//!
//! Environment variables:
//! - LOKI_URL (default: http://127.0.0.1:3100)
//! - LOKI_QUERY (default: {job="varlogs"})
//!
//! Run with: cargo run --example query_logs

use chrono::{Duration, Utc};
use loki_api::{ClientConfig, Direction, ErrorKind, LokiClient, QueryRequest, RangeQueryRequest};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let url = std::env::var("LOKI_URL")
        .unwrap_or_else(|_| loki_api::client::DEFAULT_URL.to_string());
    let logql = std::env::var("LOKI_QUERY").unwrap_or_else(|_| r#"{job="varlogs"}"#.to_string());

    let client = LokiClient::with_config(
        ClientConfig::builder()
            .with_url(url)
            .with_timeout(std::time::Duration::from_secs(30))
            .build(),
    )?;

    println!("=== Instant query ===\n");
    let instant = client
        .query(
            &QueryRequest::new(&logql)
                .limit(5)
                .direction(Direction::Forward),
        )
        .await?;
    println!("{}\n", serde_json::to_string_pretty(&instant)?);

    println!("=== Range query (last hour) ===\n");
    let end = Utc::now();
    let range = client
        .query_range(&RangeQueryRequest::new(&logql).between(end - Duration::hours(1), end)?)
        .await?;
    let streams = range["data"]["result"].as_array().map(Vec::len).unwrap_or(0);
    println!("{} streams returned\n", streams);

    println!("=== Error handling ===\n");
    match "sideways".parse::<Direction>() {
        Ok(_) => unreachable!("sideways is not a direction"),
        Err(e) => println!("Rejected before sending: {}", e),
    }

    match client.query(&QueryRequest::new("{not valid logql")).await {
        Ok(body) => println!("Unexpected success: {}", body),
        Err(e) if matches!(e.kind, ErrorKind::HttpStatus { .. }) => {
            println!("Loki rejected the query: {}", e)
        }
        Err(e) => return Err(e.into()),
    }

    Ok(())
}
