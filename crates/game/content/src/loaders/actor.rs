//! Actor snapshot loader.

use std::path::Path;

use wasteland_core::ActorSource;

use crate::loaders::{LoadResult, read_file};

/// Loader for actor snapshots from JSON files.
pub struct ActorLoader;

impl ActorLoader {
    /// Load an actor snapshot, including its owned items, from a JSON file.
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the JSON file containing an ActorSource
    ///
    /// # Returns
    ///
    /// Returns the ActorSource. Item rule sources are kept as raw JSON and are
    /// only validated when a derivation pass hydrates them.
    pub fn load(path: &Path) -> LoadResult<ActorSource> {
        let content = read_file(path)?;
        Self::parse(&content)
            .map_err(|e| anyhow::anyhow!("Failed to parse actor {}: {}", path.display(), e))
    }

    /// Parse an actor snapshot from JSON text.
    pub fn parse(content: &str) -> LoadResult<ActorSource> {
        let actor: ActorSource = serde_json::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse actor JSON: {}", e))?;

        tracing::debug!(
            actor = %actor.id,
            items = actor.items.len(),
            "loaded actor snapshot"
        );
        Ok(actor)
    }
}
