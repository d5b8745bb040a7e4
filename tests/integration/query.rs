use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

use loki_api::{ClientConfig, Direction, ErrorKind, LokiClient, QueryRequest, RangeQueryRequest};
use wiremock::matchers::{header, method, path, query_param, query_param_is_missing};
use wiremock::{Mock, MockServer, ResponseTemplate};

use crate::common::{client_for, fast_retry, init_tracing, streams_body};

const LOGQL: &str = r#"{job="varlogs"} |= "error""#;

#[tokio::test]
async fn test_query_sends_exact_params_once() {
    let server = MockServer::start().await;

    for direction in [Direction::Backward, Direction::Forward] {
        Mock::given(method("GET"))
            .and(path("/loki/api/v1/query"))
            .and(query_param("query", LOGQL))
            .and(query_param("limit", "10"))
            .and(query_param("direction", direction.as_str()))
            .and(query_param_is_missing("time"))
            .respond_with(ResponseTemplate::new(200).set_body_json(streams_body()))
            .expect(1)
            .mount(&server)
            .await;
    }

    let client = client_for(&server.uri());
    for direction in [Direction::Backward, Direction::Forward] {
        let body = client
            .query(&QueryRequest::new(LOGQL).direction(direction))
            .await
            .unwrap();
        assert_eq!(body, streams_body());
    }
}

#[tokio::test]
async fn test_query_with_time() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/loki/api/v1/query"))
        .and(query_param("time", "1700000000000000000"))
        .respond_with(ResponseTemplate::new(200).set_body_json(streams_body()))
        .expect(1)
        .mount(&server)
        .await;

    client_for(&server.uri())
        .query(&QueryRequest::new(LOGQL).time("1700000000000000000"))
        .await
        .unwrap();
}

#[test]
fn test_invalid_direction_rejected_when_parsed() {
    let err = "sideways".parse::<Direction>().unwrap_err();
    assert!(matches!(err.kind, ErrorKind::InvalidArgument(_)));
    assert!(err.to_string().contains("sideways"), "{err}");
}

#[tokio::test]
async fn test_empty_query_sends_no_request() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(streams_body()))
        .expect(0)
        .mount(&server)
        .await;

    let client = client_for(&server.uri());

    let err = client.query(&QueryRequest::new("")).await.unwrap_err();
    assert!(err.is_invalid_argument());

    let err = client.query_range(&RangeQueryRequest::new("")).await.unwrap_err();
    assert!(err.is_invalid_argument());
}

#[tokio::test]
async fn test_limit_omitted_or_zero() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/loki/api/v1/query"))
        .and(query_param_is_missing("limit"))
        .respond_with(ResponseTemplate::new(200).set_body_json(streams_body()))
        .expect(2)
        .mount(&server)
        .await;

    let client = client_for(&server.uri());
    client.query(&QueryRequest::new(LOGQL).no_limit()).await.unwrap();
    client.query(&QueryRequest::new(LOGQL).limit(0)).await.unwrap();
}

#[tokio::test]
async fn test_limit_included() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/loki/api/v1/query"))
        .and(query_param("limit", "25"))
        .respond_with(ResponseTemplate::new(200).set_body_json(streams_body()))
        .expect(1)
        .mount(&server)
        .await;

    client_for(&server.uri())
        .query(&QueryRequest::new(LOGQL).limit(25))
        .await
        .unwrap();
}

#[tokio::test]
async fn test_extra_params_are_overridden_by_named_ones() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/loki/api/v1/query"))
        .and(query_param("query", LOGQL))
        .and(query_param("direction", "forward"))
        .and(query_param("shard", "1_of_2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(streams_body()))
        .expect(1)
        .mount(&server)
        .await;

    let request = QueryRequest::new(LOGQL)
        .param("query", "overridden")
        .param("shard", "1_of_2")
        .direction(Direction::Forward);

    client_for(&server.uri()).query(&request).await.unwrap();
}

#[tokio::test]
async fn test_http_500_is_status_error_after_retries() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/loki/api/v1/query"))
        .respond_with(ResponseTemplate::new(500).set_body_json(serde_json::json!({
            "status": "error",
            "error": "internal"
        })))
        .expect(4)
        .mount(&server)
        .await;

    let err = client_for(&server.uri())
        .query(&QueryRequest::new(LOGQL))
        .await
        .unwrap_err();

    match err.kind {
        ErrorKind::HttpStatus { status, ref body } => {
            assert_eq!(status, 500);
            assert!(body.contains("internal"));
        }
        ref other => panic!("unexpected kind: {other:?}"),
    }
}

#[tokio::test]
async fn test_http_400_is_not_retried() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/loki/api/v1/query"))
        .respond_with(ResponseTemplate::new(400).set_body_string("parse error at line 1, col 2"))
        .expect(1)
        .mount(&server)
        .await;

    let err = client_for(&server.uri())
        .query(&QueryRequest::new("{bad"))
        .await
        .unwrap_err();

    assert_eq!(err.status(), Some(400));
}

#[tokio::test]
async fn test_ignore_http_errors_returns_body() {
    init_tracing();
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/loki/api/v1/query"))
        .respond_with(ResponseTemplate::new(500).set_body_json(serde_json::json!({
            "status": "error",
            "error": "internal"
        })))
        .mount(&server)
        .await;

    let client = LokiClient::with_config(
        ClientConfig::builder()
            .with_url(server.uri())
            .with_retry(fast_retry())
            .ignore_http_errors(true)
            .build(),
    )
    .unwrap();

    let body = client.query(&QueryRequest::new(LOGQL)).await.unwrap();
    assert_eq!(body["status"], "error");
}

#[tokio::test]
async fn test_retry_503_twice_then_success() {
    let server = MockServer::start().await;
    let call_count = Arc::new(AtomicU32::new(0));
    let call_count_clone = call_count.clone();

    Mock::given(method("GET"))
        .and(path("/loki/api/v1/query"))
        .respond_with(move |_: &wiremock::Request| {
            let count = call_count_clone.fetch_add(1, Ordering::SeqCst);
            if count < 2 {
                ResponseTemplate::new(503)
            } else {
                ResponseTemplate::new(200).set_body_json(streams_body())
            }
        })
        .mount(&server)
        .await;

    let body = client_for(&server.uri())
        .query(&QueryRequest::new(LOGQL))
        .await
        .unwrap();

    assert_eq!(body, streams_body());
    assert_eq!(call_count.load(Ordering::SeqCst), 3);
}

#[tokio::test]
async fn test_non_json_body_is_decode_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/loki/api/v1/query"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>proxy</html>"))
        .expect(1)
        .mount(&server)
        .await;

    let err = client_for(&server.uri())
        .query(&QueryRequest::new(LOGQL))
        .await
        .unwrap_err();

    assert!(matches!(err.kind, ErrorKind::Decode(_)), "unexpected error: {err:?}");
}

#[tokio::test]
async fn test_headers_attached_to_every_request() {
    init_tracing();
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(header("X-Scope-OrgID", "tenant-a"))
        .and(header("Authorization", "Bearer abc"))
        .respond_with(ResponseTemplate::new(200).set_body_json(streams_body()))
        .expect(3)
        .mount(&server)
        .await;

    let client = LokiClient::with_config(
        ClientConfig::builder()
            .with_url(server.uri())
            .with_headers([("X-Scope-OrgID", "tenant-a"), ("Authorization", "Bearer abc")])
            .with_retry(fast_retry())
            .build(),
    )
    .unwrap();

    assert!(client.ready().await.unwrap());
    client.query(&QueryRequest::new(LOGQL)).await.unwrap();
    client.query_range(&RangeQueryRequest::new(LOGQL)).await.unwrap();
}

#[tokio::test]
async fn test_query_range_params() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/loki/api/v1/query_range"))
        .and(query_param("query", "rate({job=\"varlogs\"}[5m])"))
        .and(query_param("start", "1700000000000000000"))
        .and(query_param("end", "1700003600000000000"))
        .and(query_param("step", "60s"))
        .and(query_param("limit", "100"))
        .and(query_param("direction", "backward"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "status": "success",
            "data": {"resultType": "matrix", "result": []}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let request = RangeQueryRequest::new("rate({job=\"varlogs\"}[5m])")
        .start("1700000000000000000")
        .end("1700003600000000000")
        .step("60s");

    let body = client_for(&server.uri()).query_range(&request).await.unwrap();
    assert_eq!(body["data"]["resultType"], "matrix");
}
