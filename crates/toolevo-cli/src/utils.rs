//! Utility functions for the CLI

use crate::error::{CliError, CliResult};
use anyhow::Context;
use colored::{ColoredString, Colorize};
use serde_json::Value as JsonValue;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

/// Initialize tracing; `RUST_LOG` overrides the `info` default.
pub fn init_tracing() -> CliResult<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .map_err(|e| CliError::General(format!("Failed to set tracing subscriber: {}", e)))?;

    Ok(())
}

/// Utility for colored console output
pub struct ColoredOutput;

impl ColoredOutput {
    pub fn success(msg: &str) -> ColoredString {
        msg.green().bold()
    }

    pub fn error(msg: &str) -> ColoredString {
        msg.red().bold()
    }

    pub fn warning(msg: &str) -> ColoredString {
        msg.yellow().bold()
    }

    pub fn info(msg: &str) -> ColoredString {
        msg.blue()
    }

    pub fn highlight(msg: &str) -> ColoredString {
        msg.cyan().bold()
    }
}

/// Truncate text to a maximum length with ellipsis
pub fn truncate_text(text: &str, max_len: usize) -> String {
    if text.chars().count() <= max_len {
        text.to_string()
    } else {
        let kept: String = text.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

/// Read tool input from an inline JSON string or a JSON/YAML file.
/// Neither given means an empty object.
pub fn read_input_data(input: Option<String>, input_file: Option<String>) -> CliResult<JsonValue> {
    match (input, input_file) {
        (Some(_), Some(_)) => Err(CliError::InvalidArgument(
            "--input and --input-file are mutually exclusive".to_string(),
        )),
        (Some(raw), None) => serde_json::from_str(&raw)
            .map_err(|e| CliError::InvalidArgument(format!("Invalid JSON input: {}", e))),
        (None, Some(path)) => {
            let content = std::fs::read_to_string(&path)
                .with_context(|| format!("Failed to read input file '{}'", path))?;
            if let Ok(value) = serde_json::from_str::<JsonValue>(&content) {
                return Ok(value);
            }
            serde_yaml::from_str(&content).map_err(|e| {
                CliError::InvalidArgument(format!("Invalid JSON/YAML input file '{}': {}", path, e))
            })
        }
        (None, None) => Ok(serde_json::json!({})),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::io::Write;

    #[test]
    fn test_truncate_text() {
        assert_eq!(truncate_text("weather", 20), "weather");
        assert_eq!(truncate_text("a-very-long-tool-slug", 10), "a-very-...");
    }

    #[test]
    fn test_read_inline_input() {
        let value = read_input_data(Some(r#"{"city":"Orlando"}"#.into()), None).unwrap();
        assert_eq!(value, json!({"city": "Orlando"}));
        assert_eq!(read_input_data(None, None).unwrap(), json!({}));
        assert!(matches!(
            read_input_data(Some("{oops".into()), None),
            Err(CliError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_read_yaml_file_input() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "city: Orlando\ndays: 3").unwrap();
        let path = file.path().to_str().unwrap().to_string();
        let value = read_input_data(None, Some(path)).unwrap();
        assert_eq!(value, json!({"city": "Orlando", "days": 3}));
    }

    #[test]
    fn test_missing_input_file() {
        let err = read_input_data(None, Some("/no/such/input.json".into())).unwrap_err();
        assert!(err.to_string().contains("/no/such/input.json"));
    }
}
