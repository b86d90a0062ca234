//! Hook phases of a derivation pass.

use serde::{Deserialize, Serialize};

/// Stage of a derivation pass at which a rule runs.
///
/// Phases run in declaration order; later phases observe what earlier ones
/// wrote.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
    strum::EnumIter,
)]
#[serde(rename_all = "camelCase")]
#[strum(serialize_all = "camelCase")]
pub enum HookPhase {
    /// After SPECIALs are prepared, before skills are derived from them.
    AfterSpecial = 0,

    /// After skills are derived, before the remaining derived statistics.
    AfterSkills = 1,

    /// After every derived statistic is computed.
    AfterComputation = 2,
}

impl HookPhase {
    /// All phases in execution order.
    pub const ALL: [Self; 3] = [Self::AfterSpecial, Self::AfterSkills, Self::AfterComputation];
}
