use serde::{Deserialize, Serialize};

use crate::stats::Bounds;

/// Engine configuration constants and tunable parameters.
///
/// Every field has a default so partial TOML files are accepted.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EngineConfig {
    /// Bounds applied to both the permanent and temporary SPECIAL totals.
    pub special_bounds: Bounds,
    /// Base value used for SPECIALs missing from an actor source.
    pub default_special: f64,
    /// Bounds applied to every skill total.
    pub skill_bounds: Bounds,
    /// Actor levels below this are raised to it before any formula runs.
    pub min_level: u32,
}

impl EngineConfig {
    // ===== compile-time constants =====
    /// Maximum number of segments in a rule target path.
    pub const MAX_PATH_DEPTH: usize = 8;

    // ===== runtime-tunable defaults =====
    pub const DEFAULT_SPECIAL_BOUNDS: Bounds = Bounds::between(0.0, 15.0);
    pub const DEFAULT_SPECIAL: f64 = 5.0;
    pub const DEFAULT_SKILL_BOUNDS: Bounds = Bounds::between(0.0, 100.0);
    pub const DEFAULT_MIN_LEVEL: u32 = 1;

    pub fn new() -> Self {
        Self {
            special_bounds: Self::DEFAULT_SPECIAL_BOUNDS,
            default_special: Self::DEFAULT_SPECIAL,
            skill_bounds: Self::DEFAULT_SKILL_BOUNDS,
            min_level: Self::DEFAULT_MIN_LEVEL,
        }
    }

    pub fn with_special_bounds(mut self, bounds: Bounds) -> Self {
        self.special_bounds = bounds;
        self
    }

    pub fn with_skill_bounds(mut self, bounds: Bounds) -> Self {
        self.skill_bounds = bounds;
        self
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self::new()
    }
}
