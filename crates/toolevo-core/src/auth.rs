//! Authentication schemes a tool version may select for its backend.
//!
//! The set of schemes is closed. Each scheme is one row in [`AUTH_SCHEMES`],
//! which lists the `auth_config` fields it needs; the gateway keeps a parallel
//! table of functions that attach the credentials to an outbound request.

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuthType {
    #[default]
    None = 0,
    Bearer = 1,
    Basic = 2,
    #[serde(alias = "api-key")]
    ApiKey = 3,
}

/// Static description of one authentication scheme.
#[derive(Debug)]
pub struct AuthScheme {
    pub auth_type: AuthType,
    pub name: &'static str,
    pub aliases: &'static [&'static str],
    /// Fields that must be present in `auth_config` as non-empty strings.
    pub required_fields: &'static [&'static str],
    /// Optional fields restricted to a fixed set of values.
    pub constrained_fields: &'static [(&'static str, &'static [&'static str])],
}

/// Indexed by `AuthType as usize`.
pub const AUTH_SCHEMES: &[AuthScheme] = &[
    AuthScheme {
        auth_type: AuthType::None,
        name: "none",
        aliases: &[],
        required_fields: &[],
        constrained_fields: &[],
    },
    AuthScheme {
        auth_type: AuthType::Bearer,
        name: "bearer",
        aliases: &["bearer_token", "bearer-token"],
        required_fields: &["token"],
        constrained_fields: &[],
    },
    AuthScheme {
        auth_type: AuthType::Basic,
        name: "basic",
        aliases: &[],
        required_fields: &["username", "password"],
        constrained_fields: &[],
    },
    AuthScheme {
        auth_type: AuthType::ApiKey,
        name: "api_key",
        aliases: &["api-key", "apikey"],
        required_fields: &["name", "value"],
        constrained_fields: &[("location", &["header", "query"])],
    },
];

impl AuthType {
    pub fn scheme(self) -> &'static AuthScheme {
        &AUTH_SCHEMES[self as usize]
    }

    pub fn as_str(self) -> &'static str {
        self.scheme().name
    }

    /// Check `config` against the scheme's field requirements.
    pub fn validate_config(self, config: &JsonValue) -> Result<(), String> {
        let scheme = self.scheme();
        let obj = match config {
            JsonValue::Null if scheme.required_fields.is_empty() => return Ok(()),
            JsonValue::Object(obj) => obj,
            _ => {
                return Err(format!(
                    "auth_config for '{}' must be an object",
                    scheme.name
                ))
            }
        };

        for field in scheme.required_fields {
            match obj.get(*field) {
                Some(JsonValue::String(s)) if !s.is_empty() => {}
                _ => {
                    return Err(format!(
                        "auth_config for '{}' requires non-empty string field '{}'",
                        scheme.name, field
                    ))
                }
            }
        }

        for (field, allowed) in scheme.constrained_fields {
            if let Some(value) = obj.get(*field) {
                let ok = value
                    .as_str()
                    .map(|s| allowed.contains(&s.to_ascii_lowercase().as_str()))
                    .unwrap_or(false);
                if !ok {
                    return Err(format!(
                        "auth_config field '{}' must be one of: {}",
                        field,
                        allowed.join(", ")
                    ));
                }
            }
        }

        Ok(())
    }
}

impl fmt::Display for AuthType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AuthType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        AUTH_SCHEMES
            .iter()
            .find(|scheme| scheme.name == wanted || scheme.aliases.contains(&wanted.as_str()))
            .map(|scheme| scheme.auth_type)
            .ok_or_else(|| format!("unsupported auth_type: {}", s))
    }
}
