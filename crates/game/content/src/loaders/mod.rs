//! Content loaders for reading engine inputs from files.
//!
//! JSON carries actor snapshots and rule sources, RON carries item catalogs,
//! TOML carries engine configuration and message templates.

pub mod actor;
pub mod config;
pub mod item;
pub mod messages;
pub mod rules;

pub use actor::ActorLoader;
pub use config::ConfigLoader;
pub use item::{ItemCatalog, ItemLoader};
pub use messages::MessageCatalogLoader;
pub use rules::RuleSourceLoader;

use std::path::Path;

/// Common result type for loaders.
pub type LoadResult<T> = anyhow::Result<T>;

/// Helper function to read file contents.
pub(crate) fn read_file(path: &Path) -> LoadResult<String> {
    std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("Failed to read file {}: {}", path.display(), e))
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn read_file_reports_path() {
        let dir = tempfile::tempdir().expect("temp dir");
        let missing = dir.path().join("absent.json");

        let err = read_file(&missing).unwrap_err().to_string();
        assert!(err.starts_with("Failed to read file"));
        assert!(err.contains("absent.json"));
    }
}
