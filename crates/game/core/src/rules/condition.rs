//! Runtime gates checked before a rule mutates anything.

use serde::{Deserialize, Serialize};

use crate::document::ItemDocument;

/// A condition evaluated against the rule's owning item.
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
pub enum Condition {
    /// The owning item is currently equipped.
    WhenEquipped,
}

impl Condition {
    pub fn holds(&self, owner: &ItemDocument) -> bool {
        match self {
            Self::WhenEquipped => owner.equipped(),
        }
    }
}
