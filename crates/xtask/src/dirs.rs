//! Platform-specific directory utilities
//!
//! Provides consistent directory paths across different operating systems,
//! following platform conventions for configuration directories.

use std::path::PathBuf;

/// File name of the engine configuration inside the config directory.
pub const CONFIG_FILE: &str = "engine.toml";

/// File name of the message template overrides inside the config directory.
pub const MESSAGES_FILE: &str = "messages.toml";

/// Get the platform-specific config directory for wasteland
///
/// Follows platform conventions:
/// - macOS: `~/Library/Application Support/wasteland`
/// - Linux: `~/.config/wasteland` (or `$XDG_CONFIG_HOME/wasteland`)
/// - Windows: `%APPDATA%\wasteland\config`
/// - Fallback: `./config`
pub fn config_dir() -> PathBuf {
    directories::ProjectDirs::from("", "", "wasteland")
        .map(|dirs| dirs.config_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from("./config"))
}
