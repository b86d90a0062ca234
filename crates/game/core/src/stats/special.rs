//! SPECIAL - the seven primary attributes of an actor.
//!
//! Each SPECIAL is an accumulator with two layers:
//! - **Permanent**: persisted base value plus permanent components (perks, traits)
//! - **Temporary**: permanent total plus temporary components (chems, radiation)
//!
//! Skills and every derived statistic read the temporary total.

use serde::{Deserialize, Serialize};

use super::composite::{Bounds, Component, CompositeNumber};

/// The seven SPECIAL attributes.
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
pub enum SpecialName {
    Strength,
    Perception,
    Endurance,
    Charisma,
    Intelligence,
    Agility,
    Luck,
}

impl SpecialName {
    /// Number of SPECIAL attributes.
    pub const COUNT: usize = 7;
}

/// A SPECIAL accumulator with permanent and temporary components.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SpecialValue {
    pub permanent: CompositeNumber,
    #[serde(default)]
    pub temporary: Vec<Component>,
}

impl SpecialValue {
    /// Create a SPECIAL from its persisted base value.
    pub fn new(base: f64, bounds: Bounds) -> Self {
        Self {
            permanent: CompositeNumber::new(base).with_bounds(bounds),
            temporary: Vec::new(),
        }
    }

    pub fn add_permanent(&mut self, component: Component) {
        self.permanent.add(component);
    }

    pub fn add_temporary(&mut self, component: Component) {
        self.temporary.push(component);
    }

    /// Base plus permanent components, clamped.
    pub fn permanent_total(&self) -> f64 {
        self.permanent.total()
    }

    /// Permanent total plus temporary components, clamped with the same bounds.
    pub fn temporary_total(&self) -> f64 {
        let temporary: f64 = self.temporary.iter().map(|c| c.value).sum();
        self.permanent
            .bounds
            .clamp(self.permanent_total() + temporary)
    }

    pub fn bounds(&self) -> Bounds {
        self.permanent.bounds
    }
}
