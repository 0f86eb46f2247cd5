//! Endpoint descriptor: everything the gateway needs to reach a backend.

use crate::auth::AuthType;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum DescriptorError {
    #[error("unsupported endpoint_protocol: {0}")]
    UnsupportedProtocol(String),
    #[error("unsupported endpoint_method: {0}")]
    UnsupportedMethod(String),
    #[error("endpoint_url is required")]
    MissingUrl,
    #[error("invalid endpoint_url '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },
    #[error("{0}")]
    Auth(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Protocol {
    Http,
    Https,
}

impl Protocol {
    pub fn scheme(&self) -> &'static str {
        match self {
            Protocol::Http => "http",
            Protocol::Https => "https",
        }
    }
}

impl FromStr for Protocol {
    type Err = DescriptorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "http" => Ok(Protocol::Http),
            "https" => Ok(Protocol::Https),
            _ => Err(DescriptorError::UnsupportedProtocol(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    Get,
    #[default]
    Post,
    Put,
    Patch,
    Delete,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Patch => "PATCH",
            HttpMethod::Delete => "DELETE",
        }
    }

    /// Whether the call input travels as a JSON body (otherwise as query parameters).
    pub fn sends_body(&self) -> bool {
        matches!(self, HttpMethod::Post | HttpMethod::Put | HttpMethod::Patch)
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HttpMethod {
    type Err = DescriptorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "GET" => Ok(HttpMethod::Get),
            "POST" => Ok(HttpMethod::Post),
            "PUT" => Ok(HttpMethod::Put),
            "PATCH" => Ok(HttpMethod::Patch),
            "DELETE" => Ok(HttpMethod::Delete),
            _ => Err(DescriptorError::UnsupportedMethod(s.to_string())),
        }
    }
}

/// Validated dispatch descriptor of a tool version.
#[derive(Debug, Clone, PartialEq)]
pub struct EndpointDescriptor {
    pub protocol: Protocol,
    pub method: HttpMethod,
    /// Absolute URL; a scheme-less URL gets `{protocol}://` prefixed at parse time.
    pub url: String,
    pub auth_type: AuthType,
    pub auth_config: JsonValue,
}

impl EndpointDescriptor {
    /// Validate the raw descriptor fields of a version registration.
    pub fn parse(
        protocol: &str,
        method: Option<&str>,
        url: Option<&str>,
        auth_type: Option<&str>,
        auth_config: Option<&JsonValue>,
    ) -> Result<Self, DescriptorError> {
        let protocol: Protocol = protocol.parse()?;
        let method = match method.map(str::trim).filter(|m| !m.is_empty()) {
            Some(m) => m.parse()?,
            None => HttpMethod::default(),
        };

        let raw_url = url
            .map(str::trim)
            .filter(|u| !u.is_empty())
            .ok_or(DescriptorError::MissingUrl)?;
        let url = if raw_url.starts_with("http://") || raw_url.starts_with("https://") {
            raw_url.to_string()
        } else {
            format!("{}://{}", protocol.scheme(), raw_url)
        };
        url::Url::parse(&url).map_err(|e| DescriptorError::InvalidUrl {
            url: url.clone(),
            reason: e.to_string(),
        })?;

        let auth_type = match auth_type.map(str::trim).filter(|a| !a.is_empty()) {
            Some(a) => a.parse::<AuthType>().map_err(DescriptorError::Auth)?,
            None => AuthType::None,
        };
        let auth_config = auth_config.cloned().unwrap_or(JsonValue::Null);
        auth_type.validate_config(&auth_config).map_err(DescriptorError::Auth)?;

        Ok(Self { protocol, method, url, auth_type, auth_config })
    }
}
