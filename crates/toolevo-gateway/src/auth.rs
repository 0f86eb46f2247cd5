//! Credential injection for outbound requests.
//!
//! One applier per [`AuthType`], indexed the same way as `AUTH_SCHEMES`.
//! Configs were checked against the scheme table when the version was
//! registered, so appliers only read the fields.

use reqwest::RequestBuilder;
use serde_json::Value as JsonValue;
use toolevo_core::AuthType;

type AuthApplier = fn(RequestBuilder, &JsonValue) -> RequestBuilder;

const AUTH_APPLIERS: [AuthApplier; 4] = [apply_none, apply_bearer, apply_basic, apply_api_key];

fn field<'a>(config: &'a JsonValue, name: &str) -> &'a str {
    config.get(name).and_then(JsonValue::as_str).unwrap_or_default()
}

fn apply_none(builder: RequestBuilder, _config: &JsonValue) -> RequestBuilder {
    builder
}

fn apply_bearer(builder: RequestBuilder, config: &JsonValue) -> RequestBuilder {
    builder.bearer_auth(field(config, "token"))
}

fn apply_basic(builder: RequestBuilder, config: &JsonValue) -> RequestBuilder {
    builder.basic_auth(field(config, "username"), Some(field(config, "password")))
}

fn apply_api_key(builder: RequestBuilder, config: &JsonValue) -> RequestBuilder {
    let name = field(config, "name");
    let value = field(config, "value");
    if field(config, "location").eq_ignore_ascii_case("query") {
        builder.query(&[(name, value)])
    } else {
        builder.header(name, value)
    }
}

/// Attach the credentials of `auth_type` to the request.
pub fn apply_auth(builder: RequestBuilder, auth_type: AuthType, config: &JsonValue) -> RequestBuilder {
    AUTH_APPLIERS[auth_type as usize](builder, config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn build(auth_type: AuthType, config: JsonValue) -> reqwest::Request {
        let builder = reqwest::Client::new().get("http://localhost/x");
        apply_auth(builder, auth_type, &config).build().unwrap()
    }

    #[test]
    fn test_bearer_and_basic_headers() {
        let req = build(AuthType::Bearer, json!({"token": "tok_123"}));
        assert_eq!(req.headers()["authorization"], "Bearer tok_123");

        let req = build(AuthType::Basic, json!({"username": "svc", "password": "pw"}));
        // base64("svc:pw")
        assert_eq!(req.headers()["authorization"], "Basic c3ZjOnB3");
    }

    #[test]
    fn test_api_key_header_and_query() {
        let req = build(AuthType::ApiKey, json!({"name": "X-Api-Key", "value": "k1"}));
        assert_eq!(req.headers()["x-api-key"], "k1");

        let req = build(
            AuthType::ApiKey,
            json!({"name": "api_key", "value": "k2", "location": "query"}),
        );
        assert_eq!(req.url().query(), Some("api_key=k2"));
        assert!(req.headers().get("api_key").is_none());
    }

    #[test]
    fn test_none_leaves_request_untouched() {
        let req = build(AuthType::None, JsonValue::Null);
        assert!(req.headers().get("authorization").is_none());
    }
}
