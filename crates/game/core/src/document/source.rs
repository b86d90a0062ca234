//! Persisted document sources.
//!
//! These are the only inputs of a derivation pass. The engine never writes to
//! them; every pass prepares fresh documents from them.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::id::DocumentId;
use crate::stats::{SkillName, SpecialName};

/// Actor subtypes.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
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
pub enum ActorKind {
    #[default]
    Character,
    Npc,
}

/// Item subtypes.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
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
pub enum ItemKind {
    Weapon,
    Apparel,
    Misc,
}

/// Persisted current value of a resource.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ResourceSource {
    pub value: f64,
}

/// Persisted actor record, including its owned items.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActorSource {
    pub id: DocumentId,
    pub name: String,
    #[serde(rename = "type", default)]
    pub kind: ActorKind,
    #[serde(default = "default_level")]
    pub level: u32,
    /// Base SPECIAL values; missing entries use the configured default.
    #[serde(default)]
    pub specials: BTreeMap<SpecialName, f64>,
    /// Skill ranks; missing entries are 0.
    #[serde(default)]
    pub skills: BTreeMap<SkillName, f64>,
    #[serde(default)]
    pub health: ResourceSource,
    #[serde(default)]
    pub action_points: ResourceSource,
    #[serde(default)]
    pub items: Vec<ItemSource>,
}

fn default_level() -> u32 {
    1
}

impl ActorSource {
    pub fn new(id: DocumentId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            kind: ActorKind::Character,
            level: default_level(),
            specials: BTreeMap::new(),
            skills: BTreeMap::new(),
            health: ResourceSource::default(),
            action_points: ResourceSource::default(),
            items: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_special(mut self, name: SpecialName, value: f64) -> Self {
        self.specials.insert(name, value);
        self
    }

    #[must_use]
    pub fn with_skill(mut self, name: SkillName, ranks: f64) -> Self {
        self.skills.insert(name, ranks);
        self
    }

    #[must_use]
    pub fn with_item(mut self, item: ItemSource) -> Self {
        self.items.push(item);
        self
    }
}

/// Rules block of an item: raw rule sources, validated on every pass.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct RulesBlock {
    #[serde(default)]
    pub sources: Vec<serde_json::Value>,
}

/// Persisted item record.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ItemSource {
    pub id: DocumentId,
    pub name: String,
    #[serde(default)]
    pub tags: Vec<String>,
    /// Containing item; `None` means the item belongs directly to its actor.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub container: Option<DocumentId>,
    pub system: ItemSystem,
    #[serde(default)]
    pub rules: RulesBlock,
}

impl ItemSource {
    pub fn new(id: DocumentId, name: impl Into<String>, system: ItemSystem) -> Self {
        Self {
            id,
            name: name.into(),
            tags: Vec::new(),
            container: None,
            system,
            rules: RulesBlock::default(),
        }
    }

    #[must_use]
    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tags.push(tag.into());
        self
    }

    #[must_use]
    pub fn with_container(mut self, container: DocumentId) -> Self {
        self.container = Some(container);
        self
    }

    #[must_use]
    pub fn with_rule(mut self, rule: serde_json::Value) -> Self {
        self.rules.sources.push(rule);
        self
    }

    pub fn kind(&self) -> ItemKind {
        self.system.kind()
    }
}

/// Subtype-specific item data.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ItemSystem {
    Weapon(WeaponSource),
    Apparel(ApparelSource),
    Misc(MiscSource),
}

impl ItemSystem {
    pub fn kind(&self) -> ItemKind {
        match self {
            Self::Weapon(_) => ItemKind::Weapon,
            Self::Apparel(_) => ItemKind::Apparel,
            Self::Misc(_) => ItemKind::Misc,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeaponSource {
    pub skill: SkillName,
    #[serde(default)]
    pub damage: f64,
    #[serde(default)]
    pub range: f64,
    #[serde(default)]
    pub ap_cost: f64,
    #[serde(default)]
    pub strength_requirement: f64,
    #[serde(default)]
    pub equipped: bool,
    #[serde(default)]
    pub value: f64,
    #[serde(default)]
    pub weight: f64,
}

impl WeaponSource {
    pub fn new(skill: SkillName, damage: f64) -> Self {
        Self {
            skill,
            damage,
            range: 0.0,
            ap_cost: 0.0,
            strength_requirement: 0.0,
            equipped: false,
            value: 0.0,
            weight: 0.0,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ApparelSource {
    pub damage_threshold: f64,
    pub equipped: bool,
    pub value: f64,
    pub weight: f64,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct MiscSource {
    pub value: f64,
    pub weight: f64,
    pub quantity: f64,
}
