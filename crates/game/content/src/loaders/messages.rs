//! Message template loader.
//!
//! Templates are keyed by message key. Both spellings below load the same
//! override:
//!
//! ```toml
//! "rules.messages.notSaved" = "Rule kept out of the sheet."
//!
//! [rules.messages]
//! notSaved = "Rule kept out of the sheet."
//! ```

use std::path::Path;

use wasteland_core::TemplateCatalog;

use crate::loaders::{LoadResult, read_file};

/// Loader for message template overrides from TOML files.
pub struct MessageCatalogLoader;

impl MessageCatalogLoader {
    /// Load template overrides on top of the built-in English catalog.
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the TOML file of `key = "template"` entries
    ///
    /// # Returns
    ///
    /// Returns the English TemplateCatalog with every loaded template
    /// replacing the built-in one under the same key.
    pub fn load(path: &Path) -> LoadResult<TemplateCatalog> {
        let content = read_file(path)?;
        let overrides = Self::parse(&content)?;
        Ok(TemplateCatalog::english().with_templates(overrides))
    }

    /// Parse TOML text into flattened `(key, template)` pairs.
    pub fn parse(content: &str) -> LoadResult<Vec<(String, String)>> {
        let table: toml::Table = toml::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse message catalog TOML: {}", e))?;

        let mut templates = Vec::new();
        flatten("", &table, &mut templates)?;
        Ok(templates)
    }
}

fn flatten(prefix: &str, table: &toml::Table, out: &mut Vec<(String, String)>) -> LoadResult<()> {
    for (name, value) in table {
        let key = if prefix.is_empty() {
            name.clone()
        } else {
            format!("{prefix}.{name}")
        };
        match value {
            toml::Value::String(template) => out.push((key, template.clone())),
            toml::Value::Table(nested) => flatten(&key, nested, out)?,
            other => {
                return Err(anyhow::anyhow!(
                    "Message template {} must be a string, found {}",
                    key,
                    other.type_str()
                ));
            }
        }
    }
    Ok(())
}
