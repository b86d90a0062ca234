//! Derived statistics - computed after the `afterSkills` hook phase.
//!
//! Formulas (all SPECIAL reads use the temporary total):
//! - Health = 10 + STR + 2 × END + (level − 1) × (3 + ⌊END / 2⌋)
//! - Action points = 5 + ⌊AGI / 2⌋
//! - Carry weight = 25 + 25 × STR
//! - Healing rate = ⌊END / 3⌋ (at least 1)
//! - Initiative = 2 × PER
//! - Damage threshold = Σ equipped apparel damage threshold

use super::composite::Bounds;
use super::special::SpecialName;

/// Each derived statistic stored on an actor.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::AsRefStr,
    strum::EnumIter,
)]
#[strum(serialize_all = "camelCase")]
pub enum DerivedStat {
    Health,
    ActionPoints,
    CarryWeight,
    HealingRate,
    Initiative,
    DamageThreshold,
}

impl DerivedStat {
    /// Resources keep a persisted current value next to their total.
    pub const fn is_resource(&self) -> bool {
        matches!(self, Self::Health | Self::ActionPoints)
    }

    /// Domain bounds of the statistic.
    pub const fn bounds(&self) -> Bounds {
        match self {
            Self::HealingRate => Bounds::at_least(1.0),
            _ => Bounds::at_least(0.0),
        }
    }
}

/// Inputs the derived formulas read from an actor.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DerivedInputs {
    pub level: f64,
    /// Sum of the damage threshold totals of all equipped apparel.
    pub apparel_threshold: f64,
}

/// Base values of every derived statistic, before rule components.
#[derive(Clone, Debug, PartialEq)]
pub struct DerivedStats {
    pub health: f64,
    pub action_points: f64,
    pub carry_weight: f64,
    pub healing_rate: f64,
    pub initiative: f64,
    pub damage_threshold: f64,
}

impl DerivedStats {
    pub fn compute(special: impl Fn(SpecialName) -> f64, inputs: DerivedInputs) -> Self {
        let strength = special(SpecialName::Strength);
        let endurance = special(SpecialName::Endurance);
        let agility = special(SpecialName::Agility);
        let perception = special(SpecialName::Perception);

        let per_level = 3.0 + (endurance / 2.0).floor();
        Self {
            health: 10.0 + strength + 2.0 * endurance + (inputs.level - 1.0).max(0.0) * per_level,
            action_points: 5.0 + (agility / 2.0).floor(),
            carry_weight: 25.0 + 25.0 * strength,
            healing_rate: (endurance / 3.0).floor(),
            initiative: 2.0 * perception,
            damage_threshold: inputs.apparel_threshold,
        }
    }

    pub fn get(&self, stat: DerivedStat) -> f64 {
        match stat {
            DerivedStat::Health => self.health,
            DerivedStat::ActionPoints => self.action_points,
            DerivedStat::CarryWeight => self.carry_weight,
            DerivedStat::HealingRate => self.healing_rate,
            DerivedStat::Initiative => self.initiative,
            DerivedStat::DamageThreshold => self.damage_threshold,
        }
    }
}
