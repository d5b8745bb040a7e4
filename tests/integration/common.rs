use std::sync::Once;
use std::time::Duration;

use loki_api::{ClientConfig, LokiClient, RetryConfig};

static TRACING: Once = Once::new();

/// Install a test-friendly tracing subscriber once per process.
pub fn init_tracing() {
    TRACING.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}

/// Default retry policy with the backoff shrunk so tests stay fast.
pub fn fast_retry() -> RetryConfig {
    RetryConfig::default().with_backoff_factor(Duration::from_millis(5))
}

/// Client pointed at a mock server with the default retry policy (fast backoff).
pub fn client_for(uri: &str) -> LokiClient {
    init_tracing();
    LokiClient::with_config(
        ClientConfig::builder()
            .with_url(uri)
            .with_retry(fast_retry())
            .build(),
    )
    .expect("mock server URL is valid")
}

/// Canned Loki streams response.
pub fn streams_body() -> serde_json::Value {
    serde_json::json!({
        "status": "success",
        "data": {
            "resultType": "streams",
            "result": [{
                "stream": {"job": "varlogs", "filename": "/var/log/syslog"},
                "values": [["1700000000000000000", "kernel: eth0 link up"]]
            }],
            "stats": {}
        }
    })
}
