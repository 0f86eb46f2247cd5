use chrono::{Duration, Utc};
use serde_json::json;
use tempfile::{tempdir, TempDir};
use toolevo_core::{
    AuthType, CoreError, HttpMethod, Protocol, Tool, ToolListFilter, ToolStore, ToolVersion,
    VersionStatus,
};
use toolevo_store::SqlStore;

/// Helper to create a temporary database for testing
async fn create_test_db() -> (SqlStore, TempDir) {
    let dir = tempdir().expect("Failed to create temp dir");
    let db_path = dir.path().join("test.sqlite");
    let db_url = format!("sqlite://{}", db_path.to_string_lossy());
    let store = SqlStore::new(&db_url)
        .await
        .expect("Failed to create test database");
    (store, dir)
}

fn new_tool(slug: &str, display_name: &str) -> Tool {
    let now = Utc::now();
    Tool {
        id: uuid::Uuid::new_v4().to_string(),
        slug: slug.to_string(),
        display_name: display_name.to_string(),
        description: Some(format!("{} tool", slug)),
        created_at: now,
        updated_at: now,
    }
}

fn new_version(tool_id: &str, label: &str, status: VersionStatus) -> ToolVersion {
    let now = Utc::now();
    ToolVersion {
        id: uuid::Uuid::new_v4().to_string(),
        tool_id: tool_id.to_string(),
        seq: 0,
        version: label.to_string(),
        status,
        input_schema: json!({"type": "object", "properties": {"city": {"type": "string"}}}),
        output_schema: json!({"type": "object"}),
        endpoint_protocol: Protocol::Http,
        endpoint_method: HttpMethod::Post,
        endpoint_url: "http://localhost:9000/weather".to_string(),
        auth_type: AuthType::Bearer,
        auth_config: json!({"token": "tok_123"}),
        cost_per_call_usd: None,
        valid_from: None,
        valid_to: None,
        created_at: now,
        updated_at: now,
    }
}

#[tokio::test]
async fn test_tool_crud_and_search() {
    let (store, _dir) = create_test_db().await;

    let weather = new_tool("weather", "Weather Service");
    let geo = new_tool("geo_lookup", "Geocoder");
    store.insert_tool(&weather).await.expect("insert weather");
    store.insert_tool(&geo).await.expect("insert geo");

    let fetched = store.get_tool(&weather.id).await.unwrap().expect("tool");
    assert_eq!(fetched.slug, "weather");
    assert_eq!(fetched.description.as_deref(), Some("weather tool"));

    let all = store.list_tools(&ToolListFilter::default()).await.unwrap();
    let slugs: Vec<_> = all.iter().map(|t| t.slug.as_str()).collect();
    assert_eq!(slugs, vec!["weather", "geo_lookup"]);

    let hits = store
        .list_tools(&ToolListFilter { search: Some("GEO".to_string()) })
        .await
        .unwrap();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].id, geo.id);

    // `_` is matched literally, not as a LIKE wildcard
    let literal = store
        .list_tools(&ToolListFilter { search: Some("o_l".to_string()) })
        .await
        .unwrap();
    assert_eq!(literal.len(), 1);
    let none = store
        .list_tools(&ToolListFilter { search: Some("r_s".to_string()) })
        .await
        .unwrap();
    assert!(none.is_empty());

    assert!(store.get_tool("missing").await.unwrap().is_none());
}

#[tokio::test]
async fn test_unique_constraints_map_to_conflict() {
    let (store, _dir) = create_test_db().await;

    let tool = new_tool("weather", "Weather");
    store.insert_tool(&tool).await.unwrap();

    let err = store
        .insert_tool(&new_tool("weather", "Another"))
        .await
        .unwrap_err();
    assert!(matches!(err, CoreError::Conflict(_)), "got {:?}", err);
    assert_eq!(store.list_tools(&ToolListFilter::default()).await.unwrap().len(), 1);

    store
        .insert_version(&new_version(&tool.id, "1.0.0", VersionStatus::Draft))
        .await
        .unwrap();
    let err = store
        .insert_version(&new_version(&tool.id, "1.0.0", VersionStatus::Active))
        .await
        .unwrap_err();
    assert!(matches!(err, CoreError::Conflict(_)), "got {:?}", err);
}

#[tokio::test]
async fn test_version_for_unknown_tool_is_not_found() {
    let (store, _dir) = create_test_db().await;

    let err = store
        .insert_version(&new_version("no-such-tool", "1.0.0", VersionStatus::Draft))
        .await
        .unwrap_err();
    assert!(matches!(err, CoreError::NotFound(_)), "got {:?}", err);
}

#[tokio::test]
async fn test_version_roundtrip_and_status_update() {
    let (store, _dir) = create_test_db().await;
    let tool = new_tool("weather", "Weather");
    store.insert_tool(&tool).await.unwrap();

    let mut first = new_version(&tool.id, "1.0.0", VersionStatus::Draft);
    first.endpoint_method = HttpMethod::Get;
    first.auth_type = AuthType::None;
    first.auth_config = serde_json::Value::Null;
    let first = store.insert_version(&first).await.unwrap();
    let second = store
        .insert_version(&new_version(&tool.id, "2.0.0", VersionStatus::Active))
        .await
        .unwrap();
    assert!(second.seq > first.seq);

    let fetched = store.get_version(&tool.id, &first.id).await.unwrap().unwrap();
    assert_eq!(fetched, first);
    assert_eq!(fetched.auth_config, serde_json::Value::Null);

    let fetched = store.get_version(&tool.id, &second.id).await.unwrap().unwrap();
    assert_eq!(fetched.auth_type, AuthType::Bearer);
    assert_eq!(fetched.auth_config["token"], "tok_123");
    assert_eq!(fetched.input_schema["properties"]["city"]["type"], "string");

    let active = store
        .list_versions(&tool.id, Some(VersionStatus::Active))
        .await
        .unwrap();
    assert_eq!(active.len(), 1);
    assert_eq!(active[0].id, second.id);

    let later = Utc::now() + Duration::seconds(5);
    let updated = store
        .update_version_status(
            &tool.id,
            &first.id,
            VersionStatus::Draft,
            VersionStatus::Deprecated,
            later,
        )
        .await
        .unwrap()
        .expect("updated");
    assert_eq!(updated.status, VersionStatus::Deprecated);
    assert_eq!(updated.updated_at, later);

    assert!(store
        .update_version_status(
            &tool.id,
            "missing",
            VersionStatus::Draft,
            VersionStatus::Active,
            later,
        )
        .await
        .unwrap()
        .is_none());
}

#[tokio::test]
async fn test_status_update_requires_expected_status() {
    let (store, _dir) = create_test_db().await;
    let tool = new_tool("weather", "Weather");
    store.insert_tool(&tool).await.unwrap();
    let version = store
        .insert_version(&new_version(&tool.id, "1.0.0", VersionStatus::Draft))
        .await
        .unwrap();

    store
        .update_version_status(
            &tool.id,
            &version.id,
            VersionStatus::Draft,
            VersionStatus::Deprecated,
            Utc::now(),
        )
        .await
        .unwrap()
        .expect("first writer wins");

    // A writer that read `draft` before the first write must not land
    let stale = store
        .update_version_status(
            &tool.id,
            &version.id,
            VersionStatus::Draft,
            VersionStatus::Active,
            Utc::now(),
        )
        .await
        .unwrap();
    assert!(stale.is_none());

    let current = store.get_version(&tool.id, &version.id).await.unwrap().unwrap();
    assert_eq!(current.status, VersionStatus::Deprecated);
}

#[tokio::test]
async fn test_version_metadata_roundtrip() {
    let (store, _dir) = create_test_db().await;
    let tool = new_tool("weather", "Weather");
    store.insert_tool(&tool).await.unwrap();

    let from = Utc::now();
    let mut priced = new_version(&tool.id, "1.0.0", VersionStatus::Active);
    priced.cost_per_call_usd = Some("0.0025".to_string());
    priced.valid_from = Some(from);
    priced.valid_to = Some(from + Duration::days(30));
    let priced = store.insert_version(&priced).await.unwrap();
    let plain = store
        .insert_version(&new_version(&tool.id, "2.0.0", VersionStatus::Draft))
        .await
        .unwrap();

    let fetched = store.get_version(&tool.id, &priced.id).await.unwrap().unwrap();
    assert_eq!(fetched, priced);
    assert_eq!(fetched.cost_per_call_usd.as_deref(), Some("0.0025"));
    assert_eq!(fetched.valid_to, Some(from + Duration::days(30)));

    let loaded = store.load_by_slug("weather").await.unwrap().unwrap();
    assert_eq!(loaded.versions[0].valid_from, Some(from));
    let fetched = store.get_version(&tool.id, &plain.id).await.unwrap().unwrap();
    assert!(fetched.cost_per_call_usd.is_none());
    assert!(fetched.valid_from.is_none() && fetched.valid_to.is_none());
}

#[tokio::test]
async fn test_load_by_slug_returns_versions_in_insertion_order() {
    let (store, _dir) = create_test_db().await;
    let tool = new_tool("weather", "Weather");
    store.insert_tool(&tool).await.unwrap();

    for label in ["b", "a", "c"] {
        store
            .insert_version(&new_version(&tool.id, label, VersionStatus::Active))
            .await
            .unwrap();
    }

    let loaded = store.load_by_slug("weather").await.unwrap().expect("tool");
    let labels: Vec<_> = loaded.versions.iter().map(|v| v.version.as_str()).collect();
    assert_eq!(labels, vec!["b", "a", "c"]);
    assert_eq!(loaded.tool.id, tool.id);

    assert!(store.load_by_slug("unknown").await.unwrap().is_none());
}

#[tokio::test]
async fn test_in_memory_database() {
    let store = SqlStore::new("sqlite::memory:").await.expect("memory db");
    let tool = new_tool("echo", "Echo");
    store.insert_tool(&tool).await.unwrap();
    store
        .insert_version(&new_version(&tool.id, "1", VersionStatus::Draft))
        .await
        .unwrap();

    // Same pool connection, so the data is still there
    let loaded = store.load_by_slug("echo").await.unwrap().unwrap();
    assert_eq!(loaded.versions.len(), 1);
}

#[tokio::test]
async fn test_migrations_are_idempotent() {
    let (store, _dir) = create_test_db().await;
    store.migrate().await.expect("second migrate run");
    store.migrate().await.expect("third migrate run");
}
