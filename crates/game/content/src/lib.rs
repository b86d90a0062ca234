//! Data loaders for wasteland content.
//!
//! This crate reads the persisted inputs of the rule engine from disk:
//! - Actor snapshots, including owned items and their rules (JSON)
//! - Item catalogs (RON)
//! - Rule source lists for authoring checks (JSON)
//! - Engine configuration (TOML)
//! - Message template overrides (TOML)
//!
//! Every loader returns `wasteland-core` types directly; nothing here runs a
//! derivation pass.

#[cfg(feature = "loaders")]
pub mod loaders;

#[cfg(feature = "loaders")]
pub use loaders::{
    ActorLoader, ConfigLoader, ItemCatalog, ItemLoader, LoadResult, MessageCatalogLoader,
    RuleSourceLoader,
};
