//! Utility functions for xtask commands

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use wasteland_content::{ConfigLoader, MessageCatalogLoader};
use wasteland_core::{EngineConfig, RuleEngine, RuleTypeRegistry, TemplateCatalog};

use crate::dirs;

/// Environment variable naming the engine configuration file.
pub const CONFIG_ENV: &str = "WASTELAND_CONFIG";

/// Environment variable naming the message template overrides file.
pub const MESSAGES_ENV: &str = "WASTELAND_MESSAGES";

/// Build the engine from the resolved configuration and message catalog.
pub fn build_engine(config: Option<&Path>, messages: Option<&Path>) -> Result<RuleEngine> {
    let config = match resolve(config, CONFIG_ENV, dirs::CONFIG_FILE) {
        Some(path) => {
            tracing::info!(path = %path.display(), "using engine config");
            ConfigLoader::load(&path)
                .with_context(|| format!("Failed to load engine config {}", path.display()))?
        }
        None => EngineConfig::default(),
    };

    let catalog = match resolve(messages, MESSAGES_ENV, dirs::MESSAGES_FILE) {
        Some(path) => {
            tracing::info!(path = %path.display(), "using message templates");
            MessageCatalogLoader::load(&path)
                .with_context(|| format!("Failed to load messages {}", path.display()))?
        }
        None => TemplateCatalog::english(),
    };

    Ok(RuleEngine::new(config, RuleTypeRegistry::default(), catalog))
}

/// Resolve a file: explicit flag, then environment variable, then the
/// platform config directory if the file exists there.
fn resolve(explicit: Option<&Path>, env: &str, file_name: &str) -> Option<PathBuf> {
    if let Some(path) = explicit {
        return Some(path.to_path_buf());
    }
    if let Ok(path) = std::env::var(env)
        && !path.is_empty()
    {
        return Some(PathBuf::from(path));
    }
    let fallback = dirs::config_dir().join(file_name);
    fallback.exists().then_some(fallback)
}
