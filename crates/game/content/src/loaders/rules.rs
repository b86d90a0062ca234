//! Rule source list loader.

use std::path::Path;

use serde_json::Value;

use crate::loaders::{LoadResult, read_file};

/// Loader for JSON arrays of raw rule sources.
///
/// Entries are returned untouched, so a malformed entry still reaches the
/// rule element validation that reports it.
pub struct RuleSourceLoader;

impl RuleSourceLoader {
    pub fn load(path: &Path) -> LoadResult<Vec<Value>> {
        let content = read_file(path)?;
        Self::parse(&content)
            .map_err(|e| anyhow::anyhow!("Failed to load rules {}: {}", path.display(), e))
    }

    pub fn parse(content: &str) -> LoadResult<Vec<Value>> {
        let value: Value = serde_json::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse rule sources JSON: {}", e))?;

        match value {
            Value::Array(sources) => Ok(sources),
            other => Err(anyhow::anyhow!(
                "Rule sources must be a JSON array, found {}",
                json_type(&other)
            )),
        }
    }
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
