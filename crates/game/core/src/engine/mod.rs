//! Rule application orchestrator.
//!
//! The [`RuleEngine`] recomputes every derived value of an actor and its
//! items from their persisted sources. A pass never reads the output of a
//! previous pass, so deriving twice from the same sources gives identical
//! results.
//!
//! # Pass
//!
//! ```text
//! sources ─► DocumentGraph (level, SPECIALs, item data)
//!         ─► hydrate RuleElements (stages 1-2)
//!         ─► afterSpecial      ─► skills
//!         ─► afterSkills       ─► health, action points, carry weight, ...
//!         ─► afterComputation  ─► clamp resource values
//!         ─► RuleReports
//! ```
//!
//! Within a phase rules run by ascending `priority`; equal priorities keep
//! declaration order (item order, then source order).

mod pass;

use std::sync::Arc;

use serde::Serialize;

use crate::config::EngineConfig;
use crate::document::{
    ActorDocument, ActorSource, DocumentGraph, DocumentId, DocumentRef, ItemDocument, ItemSource,
};
use crate::error::DerivationError;
use crate::rules::{MessageFormatter, RuleElement, RuleReport, RuleTypeRegistry, TemplateCatalog};

use self::pass::DerivationPass;

/// Result of an actor pass.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct DerivedActor {
    pub actor: ActorDocument,
    pub items: Vec<ItemDocument>,
    /// One report per enabled rule element, in declaration order.
    pub reports: Vec<RuleReport>,
}

impl DerivedActor {
    pub fn item(&self, id: DocumentId) -> Option<&ItemDocument> {
        self.items.iter().find(|item| item.id == id)
    }

    pub fn reports_for(&self, item: DocumentId) -> impl Iterator<Item = &RuleReport> {
        self.reports.iter().filter(move |report| report.item == item)
    }

    pub fn has_errors(&self) -> bool {
        self.reports.iter().any(RuleReport::has_errors)
    }
}

/// Result of a pass over an item owned by no actor.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct DerivedItem {
    pub item: ItemDocument,
    pub reports: Vec<RuleReport>,
}

/// Derives actors and items with an explicit configuration, rule type
/// registry and message formatter.
#[derive(Clone)]
pub struct RuleEngine {
    config: EngineConfig,
    registry: RuleTypeRegistry,
    formatter: Arc<dyn MessageFormatter>,
}

impl RuleEngine {
    pub fn new(
        config: EngineConfig,
        registry: RuleTypeRegistry,
        formatter: impl MessageFormatter + 'static,
    ) -> Self {
        Self {
            config,
            registry,
            formatter: Arc::new(formatter),
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn registry(&self) -> &RuleTypeRegistry {
        &self.registry
    }

    pub fn formatter(&self) -> &dyn MessageFormatter {
        self.formatter.as_ref()
    }

    /// Full pass over an actor and the items it owns.
    pub fn derive_actor(&self, source: &ActorSource) -> Result<DerivedActor, DerivationError> {
        let actor = ActorDocument::prepare_base(source, &self.config);
        let items = source.items.iter().map(ItemDocument::prepare).collect();
        let graph = DocumentGraph::new(Some(actor), items)?;

        let (graph, elements) =
            DerivationPass::new(&self.config, &self.registry, Some(source), graph).run()?;
        let (actor, items) = graph.into_parts();

        Ok(DerivedActor {
            actor: actor.ok_or(DerivationError::MissingDocument {
                document: DocumentRef::Actor,
            })?,
            items,
            reports: self.reports(&elements),
        })
    }

    /// Pass over a single item that no actor owns.
    ///
    /// The graph holds only the item, so `actor`, `parent` and `sibling`
    /// select nothing and the actor preparation steps are skipped. A
    /// container reference is ignored.
    pub fn derive_item(&self, source: &ItemSource) -> Result<DerivedItem, DerivationError> {
        let mut item = ItemDocument::prepare(source);
        item.container = None;
        let id = item.id;
        let graph = DocumentGraph::new(None, vec![item])?;

        let (graph, elements) =
            DerivationPass::new(&self.config, &self.registry, None, graph).run()?;
        let (_, items) = graph.into_parts();
        let item = items
            .into_iter()
            .next()
            .ok_or(DerivationError::MissingDocument {
                document: DocumentRef::Item(id),
            })?;

        Ok(DerivedItem {
            item,
            reports: self.reports(&elements),
        })
    }

    /// Schema and shape checks of an item's rules, without a graph.
    pub fn validate_item_rules(&self, source: &ItemSource) -> Vec<RuleReport> {
        let owner = ItemDocument::prepare(source);
        let elements: Vec<RuleElement> = owner
            .rule_sources
            .iter()
            .enumerate()
            .filter_map(|(index, raw)| RuleElement::hydrate(&owner, index, raw, &self.registry))
            .map(|mut element| {
                element.finish();
                element
            })
            .collect();
        self.reports(&elements)
    }

    fn reports(&self, elements: &[RuleElement]) -> Vec<RuleReport> {
        elements
            .iter()
            .map(|element| element.report(self.formatter()))
            .collect()
    }
}

impl Default for RuleEngine {
    fn default() -> Self {
        Self::new(
            EngineConfig::default(),
            RuleTypeRegistry::default(),
            TemplateCatalog::english(),
        )
    }
}

impl std::fmt::Debug for RuleEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RuleEngine")
            .field("config", &self.config)
            .field("registry", &self.registry)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::{ItemSystem, MiscSource};
    use crate::rules::{RuleElementSource, RuleKind, RuleState};

    #[test]
    fn derive_item_without_actor() {
        let source = ItemSource::new(
            DocumentId(7),
            "Lunchbox",
            ItemSystem::Misc(MiscSource {
                weight: 1.0,
                ..MiscSource::default()
            }),
        )
        .with_container(DocumentId(99))
        .with_rule(
            RuleElementSource::new(RuleKind::FlatModifier, "weight", 2.0)
                .with_selector("this")
                .to_json(),
        )
        .with_rule(
            RuleElementSource::new(RuleKind::TempSpecialComponent, "luck", 1.0)
                .with_selector("actor")
                .to_json(),
        );

        let derived = RuleEngine::default().derive_item(&source).unwrap();
        assert_eq!(derived.item.container, None);
        assert_eq!(
            derived.item.data.get("weight").and_then(|v| v.as_number()),
            Some(3.0)
        );
        assert_eq!(derived.reports.len(), 2);
        assert!(derived.reports.iter().all(RuleReport::is_clean));
    }

    #[test]
    fn validate_item_rules_skips_target_checks() {
        let source = ItemSource::new(DocumentId(7), "Junk", ItemSystem::Misc(MiscSource::default()))
            .with_rule(
                RuleElementSource::new(RuleKind::NumberComponent, "doesNotExist", 1.0)
                    .with_selector("this")
                    .to_json(),
            )
            .with_rule(serde_json::json!({ "type": "FlatModifier" }))
            .with_rule(
                RuleElementSource::new(RuleKind::FlatModifier, "weight", 1.0)
                    .disabled()
                    .to_json(),
            );

        let reports = RuleEngine::default().validate_item_rules(&source);
        assert_eq!(reports.len(), 2);
        assert_eq!(reports[0].state, RuleState::Valid);
        assert!(reports[0].is_clean());
        assert_eq!(reports[1].state, RuleState::Invalid);
        assert_eq!(reports[1].index, 1);
    }
}
