pub mod catalog;
pub mod invite;
pub mod journey;

use anyhow::{Context, Result};
use onboard_core::journey::FormData;
use serde_json::Value;

/// Parses `key=value` pairs into form data.
///
/// Values that parse as JSON (`true`, `42`, `"x"`) keep their type; anything
/// else is taken as a string.
pub fn parse_fields(pairs: &[String]) -> Result<FormData> {
    pairs
        .iter()
        .map(|pair| {
            let (key, raw) = pair
                .split_once('=')
                .with_context(|| format!("Expected key=value, got '{}'", pair))?;
            let value = serde_json::from_str::<Value>(raw)
                .unwrap_or_else(|_| Value::String(raw.to_string()));
            Ok((key.trim().to_string(), value))
        })
        .collect()
}
