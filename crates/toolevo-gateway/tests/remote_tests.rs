use httpmock::prelude::*;
use serde_json::json;
use std::time::Duration;
use toolevo_core::{with_request_id, ErrorKind};
use toolevo_gateway::{GatewayError, RemoteGateway, ToolExecutor};

#[tokio::test]
async fn test_remote_call_success() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(POST)
            .path("/call")
            .json_body(json!({"slug": "weather", "input": {"city": "Orlando"}}));
        then.status(200).json_body(json!({
            "tool": {"id": "t1", "slug": "weather"},
            "version": {"id": "v1", "version": "1.0.0"},
            "upstream_status": 200,
            "body": {"temperatureC": 21.5},
            "success": true,
            "warnings": [],
            "duration_ms": 12
        }));
    });

    let remote = RemoteGateway::new(&server.base_url(), Duration::from_secs(5)).unwrap();
    let result = remote.execute("weather", &json!({"city": "Orlando"})).await.unwrap();

    mock.assert();
    assert_eq!(result.body["temperatureC"], 21.5);
    assert_eq!(result.version.version, "1.0.0");
}

#[tokio::test]
async fn test_remote_call_preserves_error_kinds() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(POST).path("/call").json_body_partial(r#"{"slug": "broken"}"#);
        then.status(502).json_body(json!({
            "status": "error",
            "error_kind": "UpstreamError",
            "message": "Upstream returned status 500",
            "details": {"upstream_status": 500, "body": {"error": "boom"}}
        }));
    });
    server.mock(|when, then| {
        when.method(POST).path("/call").json_body_partial(r#"{"slug": "slow"}"#);
        then.status(504).json_body(json!({
            "status": "error",
            "error_kind": "UpstreamUnavailable",
            "message": "request timed out after 10000ms"
        }));
    });
    server.mock(|when, then| {
        when.method(POST).path("/call").json_body_partial(r#"{"slug": "ghost"}"#);
        then.status(404).json_body(json!({
            "status": "error",
            "error_kind": "ToolNotFound",
            "message": "Tool not found: ghost"
        }));
    });

    let remote = RemoteGateway::new(&server.base_url(), Duration::from_secs(5)).unwrap();

    match remote.execute("broken", &json!({})).await.unwrap_err() {
        GatewayError::Upstream { status, body } => {
            assert_eq!(status, 500);
            assert_eq!(body["error"], "boom");
        }
        other => panic!("unexpected {:?}", other),
    }
    assert_eq!(
        remote.execute("slow", &json!({})).await.unwrap_err().kind(),
        ErrorKind::UpstreamUnavailable
    );
    assert_eq!(
        remote.execute("ghost", &json!({})).await.unwrap_err().kind(),
        ErrorKind::ToolNotFound
    );
}

#[tokio::test]
async fn test_unreachable_gateway() {
    let remote = RemoteGateway::new("http://127.0.0.1:9", Duration::from_secs(2)).unwrap();
    let err = remote.execute("weather", &json!({})).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::GatewayUnavailable);
}

#[tokio::test]
async fn test_remote_call_forwards_request_id() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(POST).path("/call").header("x-request-id", "req-9");
        then.status(404).json_body(json!({
            "status": "error",
            "error_kind": "ToolNotFound",
            "message": "Tool not found: ghost"
        }));
    });

    let remote = RemoteGateway::new(&server.base_url(), Duration::from_secs(5)).unwrap();
    let err = with_request_id("req-9".to_string(), remote.execute("ghost", &json!({})))
        .await
        .unwrap_err();

    mock.assert();
    assert_eq!(err.kind(), ErrorKind::ToolNotFound);
}
