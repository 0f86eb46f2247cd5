use axum::{
    body::{self, Body},
    http::{Request, StatusCode},
    Router,
};
use serde_json::{json, Value as JsonValue};
use toolevo_registry::Registry;
use toolevo_server::{middleware::REQUEST_ID_HEADER, registry_router};
use toolevo_store::MemoryToolStore;
use tower::ServiceExt;

fn router() -> Router {
    registry_router(Registry::new(MemoryToolStore::new()))
}

async fn send(router: &Router, method: &str, uri: &str, body: Option<JsonValue>) -> (StatusCode, JsonValue) {
    let mut builder = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(value) => {
            builder = builder.header("content-type", "application/json");
            Body::from(value.to_string())
        }
        None => Body::empty(),
    };
    let response = router.clone().oneshot(builder.body(body).unwrap()).await.unwrap();
    let status = response.status();
    let bytes = body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json = if bytes.is_empty() {
        JsonValue::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, json)
}

fn version_payload(version: &str, status: &str) -> JsonValue {
    json!({
        "version": version,
        "status": status,
        "input_schema": {"type": "object", "properties": {"city": {"type": "string"}}},
        "output_schema": {"type": "object"},
        "endpoint_protocol": "http",
        "endpoint_method": "POST",
        "endpoint_url": "http://127.0.0.1:9/weather"
    })
}

async fn create_weather(router: &Router) -> String {
    let (status, tool) = send(
        router,
        "POST",
        "/tools",
        Some(json!({"slug": "weather", "display_name": "Weather"})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    tool["id"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn health_reports_service() {
    let (status, body) = send(&router(), "GET", "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["service"], "toolevo-registry");
}

#[tokio::test]
async fn tool_lifecycle_over_http() {
    let router = router();
    let tool_id = create_weather(&router).await;

    let (status, version) = send(
        &router,
        "POST",
        &format!("/tools/{}/versions", tool_id),
        Some(version_payload("1.0.0", "draft")),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let version_id = version["id"].as_str().unwrap().to_string();

    // Draft versions do not resolve.
    let (status, body) = send(&router, "GET", "/resolve?slug=weather", None).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error_kind"], "NoActiveVersion");

    let (status, updated) = send(
        &router,
        "PATCH",
        &format!("/tools/{}/versions/{}/status", tool_id, version_id),
        Some(json!({"status": "active"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["status"], "active");

    let (status, resolution) = send(&router, "GET", "/resolve?slug=weather", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(resolution["tool"]["slug"], "weather");
    assert_eq!(resolution["version"]["id"], version_id.as_str());
    assert_eq!(resolution["version"]["endpoint_url"], "http://127.0.0.1:9/weather");

    let (status, detail) = send(&router, "GET", &format!("/tools/{}", tool_id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(detail["slug"], "weather");
    assert_eq!(detail["versions"].as_array().unwrap().len(), 1);

    let (status, fetched) = send(
        &router,
        "GET",
        &format!("/tools/{}/versions/{}", tool_id, version_id),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched["version"], "1.0.0");
}

#[tokio::test]
async fn duplicate_slug_is_conflict() {
    let router = router();
    create_weather(&router).await;
    let (status, body) = send(
        &router,
        "POST",
        "/tools",
        Some(json!({"slug": "weather", "display_name": "Again"})),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["status"], "error");
    assert_eq!(body["error_kind"], "DuplicateSlug");
}

#[tokio::test]
async fn backward_status_transition_is_rejected() {
    let router = router();
    let tool_id = create_weather(&router).await;
    let (_, version) = send(
        &router,
        "POST",
        &format!("/tools/{}/versions", tool_id),
        Some(version_payload("1.0.0", "deprecated")),
    )
    .await;
    let (status, body) = send(
        &router,
        "PATCH",
        &format!("/tools/{}/versions/{}/status", tool_id, version["id"].as_str().unwrap()),
        Some(json!({"status": "active"})),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error_kind"], "InvalidStatusTransition");
}

#[tokio::test]
async fn list_endpoints_filter() {
    let router = router();
    let tool_id = create_weather(&router).await;
    send(&router, "POST", "/tools", Some(json!({"slug": "geocode", "display_name": "Geocode"}))).await;
    send(&router, "POST", &format!("/tools/{}/versions", tool_id), Some(version_payload("1.0.0", "draft"))).await;
    send(&router, "POST", &format!("/tools/{}/versions", tool_id), Some(version_payload("1.1.0", "active"))).await;

    let (status, tools) = send(&router, "GET", "/tools", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(tools.as_array().unwrap().len(), 2);

    let (_, tools) = send(&router, "GET", "/tools?search=geo", None).await;
    let slugs: Vec<&str> = tools.as_array().unwrap().iter().map(|t| t["slug"].as_str().unwrap()).collect();
    assert_eq!(slugs, vec!["geocode"]);

    let (_, versions) = send(&router, "GET", &format!("/tools/{}/versions?status=active", tool_id), None).await;
    let labels: Vec<&str> =
        versions.as_array().unwrap().iter().map(|v| v["version"].as_str().unwrap()).collect();
    assert_eq!(labels, vec!["1.1.0"]);

    let (status, body) =
        send(&router, "GET", &format!("/tools/{}/versions?status=retired", tool_id), None).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error_kind"], "InvalidInput");
}

#[tokio::test]
async fn invalid_payloads_use_error_body() {
    let router = router();

    let (status, body) = send(&router, "POST", "/tools", Some(json!({"display_name": "No slug"}))).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error_kind"], "InvalidInput");

    let (status, body) = send(&router, "GET", "/resolve", None).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error_kind"], "InvalidInput");

    let tool_id = create_weather(&router).await;
    let mut bad_schema = version_payload("1.0.0", "draft");
    bad_schema["input_schema"] = json!({"type": "banana"});
    let (status, body) =
        send(&router, "POST", &format!("/tools/{}/versions", tool_id), Some(bad_schema)).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error_kind"], "InvalidSchema");
}

#[tokio::test]
async fn unknown_ids_are_not_found() {
    let router = router();
    let (status, body) = send(&router, "GET", "/tools/missing", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error_kind"], "ToolNotFound");

    let (status, body) = send(&router, "GET", "/resolve?slug=ghost", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error_kind"], "ToolNotFound");
}

#[tokio::test]
async fn request_id_is_echoed_or_minted() {
    let router = router();

    let response = router
        .clone()
        .oneshot(
            Request::builder()
                .uri("/health")
                .header(REQUEST_ID_HEADER, "req-42")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.headers().get(REQUEST_ID_HEADER).unwrap(), "req-42");

    let response = router
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert!(!response.headers().get(REQUEST_ID_HEADER).unwrap().is_empty());
}

#[tokio::test]
async fn credentials_are_masked_everywhere_but_resolve() {
    let router = router();
    let tool_id = create_weather(&router).await;

    let mut payload = version_payload("1.0.0", "active");
    payload["auth_type"] = json!("bearer");
    payload["auth_config"] = json!({"token": "tok_live_123"});
    payload["cost_per_call_usd"] = json!("0.0025");
    payload["valid_from"] = json!("2026-01-01T00:00:00Z");
    payload["valid_to"] = json!("2026-12-31T23:59:59Z");
    let (status, created) =
        send(&router, "POST", &format!("/tools/{}/versions", tool_id), Some(payload)).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_ne!(created["auth_config"]["token"], "tok_live_123");
    let version_id = created["id"].as_str().unwrap().to_string();

    let (_, detail) = send(&router, "GET", &format!("/tools/{}", tool_id), None).await;
    let (_, listed) = send(&router, "GET", &format!("/tools/{}/versions", tool_id), None).await;
    let (_, fetched) = send(
        &router,
        "GET",
        &format!("/tools/{}/versions/{}", tool_id, version_id),
        None,
    )
    .await;
    for shown in [&detail["versions"][0], &listed[0], &fetched] {
        assert_ne!(shown["auth_config"]["token"], "tok_live_123");
        assert_eq!(shown["auth_type"], "bearer");
        assert_eq!(shown["cost_per_call_usd"], "0.0025");
        assert_eq!(shown["valid_from"], "2026-01-01T00:00:00Z");
        assert_eq!(shown["valid_to"], "2026-12-31T23:59:59Z");
    }

    let (status, resolution) = send(&router, "GET", "/resolve?slug=weather", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(resolution["version"]["auth_config"]["token"], "tok_live_123");
}

#[tokio::test]
async fn bad_pricing_metadata_is_rejected() {
    let router = router();
    let tool_id = create_weather(&router).await;

    let mut payload = version_payload("1.0.0", "draft");
    payload["cost_per_call_usd"] = json!("free");
    let (status, body) =
        send(&router, "POST", &format!("/tools/{}/versions", tool_id), Some(payload)).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error_kind"], "InvalidInput");
}
