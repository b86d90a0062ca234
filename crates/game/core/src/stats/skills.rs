//! Skills - derived from SPECIAL totals after the `afterSpecial` hook phase.
//!
//! Formula: skill = 2 × governing SPECIAL + ⌊Luck / 2⌋ + ranks

use serde::{Deserialize, Serialize};

use super::composite::{Bounds, CompositeNumber};
use super::special::SpecialName;

/// Every skill an actor can train.
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
pub enum SkillName {
    Barter,
    EnergyWeapons,
    Explosives,
    Guns,
    Lockpick,
    Medicine,
    MeleeWeapons,
    Repair,
    Science,
    Sneak,
    Speech,
    Survival,
    Unarmed,
}

impl SkillName {
    /// The SPECIAL that governs this skill.
    pub const fn governing_special(&self) -> SpecialName {
        match self {
            Self::Barter | Self::Speech => SpecialName::Charisma,
            Self::EnergyWeapons | Self::Explosives | Self::Lockpick => SpecialName::Perception,
            Self::Guns | Self::Sneak => SpecialName::Agility,
            Self::Medicine | Self::Repair | Self::Science => SpecialName::Intelligence,
            Self::MeleeWeapons => SpecialName::Strength,
            Self::Survival | Self::Unarmed => SpecialName::Endurance,
        }
    }

    /// Base value before ranks, from the temporary SPECIAL totals.
    pub fn base_value(&self, special: impl Fn(SpecialName) -> f64) -> f64 {
        2.0 * special(self.governing_special()) + (special(SpecialName::Luck) / 2.0).floor()
    }

    /// Build this skill's composite for the current pass.
    pub fn composite(
        &self,
        special: impl Fn(SpecialName) -> f64,
        ranks: f64,
        bounds: Bounds,
    ) -> CompositeNumber {
        CompositeNumber::new(self.base_value(special) + ranks).with_bounds(bounds)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn specials(name: SpecialName) -> f64 {
        match name {
            SpecialName::Agility => 7.0,
            SpecialName::Luck => 5.0,
            _ => 5.0,
        }
    }

    #[test]
    fn guns_from_agility_and_luck() {
        // 2 × 7 + ⌊5 / 2⌋ = 16
        assert_eq!(SkillName::Guns.base_value(specials), 16.0);
    }

    #[test]
    fn ranks_and_bounds_apply() {
        let skill = SkillName::Guns.composite(specials, 90.0, Bounds::between(0.0, 100.0));
        assert_eq!(skill.source, 106.0);
        assert_eq!(skill.total(), 100.0);
    }

    #[test]
    fn camel_case_identifiers() {
        assert_eq!(SkillName::EnergyWeapons.as_ref(), "energyWeapons");
        assert_eq!("meleeWeapons".parse::<SkillName>(), Ok(SkillName::MeleeWeapons));
    }
}
