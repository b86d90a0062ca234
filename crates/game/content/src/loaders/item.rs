//! Item catalog loader.

use std::path::Path;

use serde::{Deserialize, Serialize};
use wasteland_core::ItemSource;

use crate::loaders::{LoadResult, read_file};

/// Item catalog structure for RON files.
///
/// Item systems and rule sources are written as RON maps with string keys,
/// e.g. `system: {"type": "weapon", "skill": "guns"}`, the same shape an
/// actor snapshot carries in JSON.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItemCatalog {
    pub items: Vec<ItemSource>,
}

/// Loader for item catalogs from RON files.
pub struct ItemLoader;

impl ItemLoader {
    /// Load item catalog from a RON file.
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the RON file containing ItemCatalog
    ///
    /// # Returns
    ///
    /// Returns a Vec of ItemSources in catalog order.
    pub fn load(path: &Path) -> LoadResult<Vec<ItemSource>> {
        let content = read_file(path)?;
        let catalog = Self::parse(&content)?;

        tracing::debug!(items = catalog.items.len(), "loaded item catalog");
        Ok(catalog.items)
    }

    /// Parse catalog text.
    ///
    /// The text is read into a RON value tree first and then bound through
    /// JSON, so map keys reach the `type`-tagged item systems as strings.
    pub fn parse(content: &str) -> LoadResult<ItemCatalog> {
        let value: ron::Value = ron::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse item catalog RON: {}", e))?;
        let json = serde_json::Value::deserialize(value)
            .map_err(|e| anyhow::anyhow!("Failed to convert item catalog RON: {}", e))?;
        let catalog: ItemCatalog = serde_json::from_value(json)
            .map_err(|e| anyhow::anyhow!("Invalid item catalog: {}", e))?;

        Ok(catalog)
    }
}
