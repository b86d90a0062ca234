//! Rule kinds and the identifier registry that resolves them.

use std::collections::HashMap;

use serde::Serialize;
use strum::IntoEnumIterator;

/// Every concrete rule element kind.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
    strum::EnumIter,
)]
pub enum RuleKind {
    /// Adds `value` to a plain number.
    FlatModifier,
    /// Overwrites a plain value with `value`.
    ReplaceValue,
    /// Appends `value` as a component of a composite number.
    NumberComponent,
    /// Appends a permanent component to an actor's SPECIAL.
    PermSpecialComponent,
    /// Appends a temporary component to an actor's SPECIAL.
    TempSpecialComponent,
}

/// What a rule kind accepts as its `value`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ValueKind {
    Number,
    Any,
}

impl RuleKind {
    pub const fn accepted_value(&self) -> ValueKind {
        match self {
            Self::ReplaceValue => ValueKind::Any,
            _ => ValueKind::Number,
        }
    }

    /// Kinds whose selector and target are forced onto an actor's SPECIAL.
    pub const fn is_special(&self) -> bool {
        matches!(self, Self::PermSpecialComponent | Self::TempSpecialComponent)
    }
}

/// Maps persisted `type` identifiers to rule kinds.
///
/// The default registry holds every [`RuleKind`] under its own name.
/// Aliases cover identifiers from older data.
#[derive(Clone, Debug)]
pub struct RuleTypeRegistry {
    kinds: HashMap<String, RuleKind>,
}

impl RuleTypeRegistry {
    pub fn new() -> Self {
        let kinds = RuleKind::iter()
            .map(|kind| (kind.as_ref().to_owned(), kind))
            .collect();
        Self { kinds }
    }

    /// Register an additional identifier (builder pattern).
    #[must_use]
    pub fn with_alias(mut self, identifier: impl Into<String>, kind: RuleKind) -> Self {
        self.kinds.insert(identifier.into(), kind);
        self
    }

    pub fn resolve(&self, identifier: &str) -> Option<RuleKind> {
        self.kinds.get(identifier).copied()
    }

    /// Registered identifiers, sorted.
    pub fn identifiers(&self) -> Vec<&str> {
        let mut identifiers: Vec<&str> = self.kinds.keys().map(String::as_str).collect();
        identifiers.sort_unstable();
        identifiers
    }
}

impl Default for RuleTypeRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_kind_is_registered() {
        let registry = RuleTypeRegistry::default();
        for kind in RuleKind::iter() {
            assert_eq!(registry.resolve(kind.as_ref()), Some(kind));
        }
        assert_eq!(registry.identifiers().len(), 5);
    }

    #[test]
    fn unknown_identifiers_do_not_resolve() {
        let registry = RuleTypeRegistry::default();
        assert_eq!(registry.resolve("flatModifier"), None);
        assert_eq!(registry.resolve(""), None);
    }

    #[test]
    fn aliases_extend_the_table() {
        let registry =
            RuleTypeRegistry::default().with_alias("SpecialComponent", RuleKind::PermSpecialComponent);
        assert_eq!(
            registry.resolve("SpecialComponent"),
            Some(RuleKind::PermSpecialComponent)
        );
        assert_eq!(registry.identifiers()[0], "FlatModifier");
    }

    #[test]
    fn value_expectations() {
        assert_eq!(RuleKind::ReplaceValue.accepted_value(), ValueKind::Any);
        assert_eq!(RuleKind::NumberComponent.accepted_value(), ValueKind::Number);
        assert!(RuleKind::TempSpecialComponent.is_special());
        assert!(!RuleKind::FlatModifier.is_special());
    }
}
