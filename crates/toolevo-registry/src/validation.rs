//! Checks applied to registration payloads before anything is stored.

use crate::error::{RegistryError, RegistryResult};
use serde_json::Value as JsonValue;
use toolevo_core::{EndpointDescriptor, NewToolVersion, SchemaNode};

/// Slugs are lowercase ASCII letters, digits, `-` and `_`.
pub fn validate_slug(slug: &str) -> RegistryResult<()> {
    if slug.is_empty() {
        return Err(RegistryError::InvalidInput("slug must not be empty".to_string()));
    }
    if let Some(bad) = slug
        .chars()
        .find(|c| !(c.is_ascii_lowercase() || c.is_ascii_digit() || *c == '-' || *c == '_'))
    {
        return Err(RegistryError::InvalidInput(format!(
            "slug '{}' contains invalid character '{}'",
            slug, bad
        )));
    }
    Ok(())
}

fn parse_schema(field: &str, doc: &JsonValue) -> RegistryResult<SchemaNode> {
    SchemaNode::parse(doc).map_err(|e| RegistryError::InvalidSchema(format!("{}: {}", field, e)))
}

/// Validate the contract and descriptor of a version registration.
pub fn validate_version(payload: &NewToolVersion) -> RegistryResult<EndpointDescriptor> {
    if payload.version.trim().is_empty() {
        return Err(RegistryError::InvalidInput("version label must not be empty".to_string()));
    }

    parse_schema("input_schema", &payload.input_schema)?;
    parse_schema("output_schema", &payload.output_schema)?;
    validate_metadata(payload)?;

    EndpointDescriptor::parse(
        &payload.endpoint_protocol,
        payload.endpoint_method.as_deref(),
        payload.endpoint_url.as_deref(),
        payload.auth_type.as_deref(),
        payload.auth_config.as_ref(),
    )
    .map_err(|e| RegistryError::InvalidDescriptor(e.to_string()))
}

fn validate_metadata(payload: &NewToolVersion) -> RegistryResult<()> {
    if let Some(cost) = payload.cost_per_call_usd.as_deref() {
        let valid = cost.trim().parse::<f64>().map_or(false, |c| c.is_finite() && c >= 0.0);
        if !valid {
            return Err(RegistryError::InvalidInput(format!(
                "cost_per_call_usd '{}' is not a non-negative decimal",
                cost
            )));
        }
    }
    if let (Some(from), Some(to)) = (payload.valid_from, payload.valid_to) {
        if to < from {
            return Err(RegistryError::InvalidInput(
                "valid_to must not be earlier than valid_from".to_string(),
            ));
        }
    }
    Ok(())
}
