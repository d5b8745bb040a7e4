//! Readiness check against a Loki host.
//!
//! Environment variables:
//! - LOKI_URL (default: http://127.0.0.1:3100)
//! - LOKI_TOKEN (optional bearer token)
//!
//! Run with: cargo run --example ready

use loki_api::{ClientConfig, LokiClient};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing for logging
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let mut builder = ClientConfig::builder();
    if let Ok(url) = std::env::var("LOKI_URL") {
        builder = builder.with_url(url);
    }
    if let Ok(token) = std::env::var("LOKI_TOKEN") {
        builder = builder.with_bearer_token(token);
    }

    let client = LokiClient::with_config(builder.build())?;

    match client.ready().await? {
        true => println!("✓ {} is ready", client.loki_host()),
        false => println!("✗ {} is not ready", client.loki_host()),
    }

    Ok(())
}
