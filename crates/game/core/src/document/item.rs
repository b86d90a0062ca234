//! Prepared item documents.

use std::str::FromStr;

use serde::Serialize;

use super::data::{DataObject, DataValue};
use super::id::DocumentId;
use super::source::{ItemKind, ItemSource, ItemSystem};
use crate::stats::{Bounds, CompositeNumber, SkillName};

pub(crate) const EQUIPPED: &str = "equipped";
pub(crate) const SKILL: &str = "skill";
pub(crate) const DAMAGE_THRESHOLD: &str = "damageThreshold";

/// An item prepared for one derivation pass.
///
/// `data` mirrors the item's system source. Rule sources stay raw until the
/// engine hydrates them.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ItemDocument {
    pub id: DocumentId,
    pub name: String,
    pub kind: ItemKind,
    pub tags: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub container: Option<DocumentId>,
    pub data: DataObject,
    #[serde(skip)]
    pub rule_sources: Vec<serde_json::Value>,
}

impl ItemDocument {
    pub fn prepare(source: &ItemSource) -> Self {
        let data = match &source.system {
            ItemSystem::Weapon(weapon) => DataObject::new()
                .with(SKILL, weapon.skill.as_ref())
                .with(
                    "damage",
                    CompositeNumber::new(weapon.damage).with_bounds(Bounds::at_least(0.0)),
                )
                .with("range", weapon.range)
                .with("apCost", weapon.ap_cost)
                .with("strengthRequirement", weapon.strength_requirement)
                .with(EQUIPPED, weapon.equipped)
                .with("value", weapon.value)
                .with("weight", weapon.weight),
            ItemSystem::Apparel(apparel) => DataObject::new()
                .with(
                    DAMAGE_THRESHOLD,
                    CompositeNumber::new(apparel.damage_threshold)
                        .with_bounds(Bounds::at_least(0.0)),
                )
                .with(EQUIPPED, apparel.equipped)
                .with("value", apparel.value)
                .with("weight", apparel.weight),
            ItemSystem::Misc(misc) => DataObject::new()
                .with("value", misc.value)
                .with("weight", misc.weight)
                .with("quantity", misc.quantity),
        };

        Self {
            id: source.id,
            name: source.name.clone(),
            kind: source.kind(),
            tags: source.tags.clone(),
            container: source.container,
            data,
            rule_sources: source.rules.sources.clone(),
        }
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }

    /// Current equipped flag; items without one (or with a replaced one) are unequipped.
    pub fn equipped(&self) -> bool {
        self.data
            .get(EQUIPPED)
            .and_then(DataValue::as_bool)
            .unwrap_or(false)
    }

    /// Skill a weapon-like item uses, read from current data.
    pub fn skill(&self) -> Option<SkillName> {
        let raw = self.data.get(SKILL)?.as_text()?;
        SkillName::from_str(raw).ok()
    }

    /// Damage threshold contributed to the owner when equipped.
    pub fn damage_threshold(&self) -> f64 {
        if !self.equipped() {
            return 0.0;
        }
        self.data
            .get(DAMAGE_THRESHOLD)
            .and_then(DataValue::total)
            .unwrap_or(0.0)
    }
}
