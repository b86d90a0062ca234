//! One derivation pass over a document graph.

use tracing::{debug, warn};

use crate::config::EngineConfig;
use crate::document::{ActorSource, DocumentGraph};
use crate::error::DerivationError;
use crate::rules::{HookPhase, RuleElement, RuleTypeRegistry};

/// Owns the graph and the hydrated rule elements for the duration of a pass.
pub(super) struct DerivationPass<'a> {
    config: &'a EngineConfig,
    actor: Option<&'a ActorSource>,
    graph: DocumentGraph,
    elements: Vec<RuleElement>,
}

impl<'a> DerivationPass<'a> {
    /// Hydrate every item's rule sources, in item then source order.
    pub(super) fn new(
        config: &'a EngineConfig,
        registry: &RuleTypeRegistry,
        actor: Option<&'a ActorSource>,
        graph: DocumentGraph,
    ) -> Self {
        let elements = graph
            .items()
            .iter()
            .flat_map(|item| {
                item.rule_sources
                    .iter()
                    .enumerate()
                    .filter_map(move |(index, raw)| {
                        RuleElement::hydrate(item, index, raw, registry)
                    })
            })
            .collect();

        Self {
            config,
            actor,
            graph,
            elements,
        }
    }

    /// Run every phase and the preparation steps between them.
    pub(super) fn run(mut self) -> Result<(DocumentGraph, Vec<RuleElement>), DerivationError> {
        self.run_phase(HookPhase::AfterSpecial)?;

        if let (Some(source), Some(actor)) = (self.actor, self.graph.actor_mut()) {
            actor.prepare_skills(source, self.config);
        }
        self.run_phase(HookPhase::AfterSkills)?;

        let threshold = self.graph.equipped_threshold();
        if let (Some(source), Some(actor)) = (self.actor, self.graph.actor_mut()) {
            actor.prepare_derived(source, self.config, threshold);
        }
        self.run_phase(HookPhase::AfterComputation)?;

        if let Some(actor) = self.graph.actor_mut() {
            actor.finalize_resources();
        }

        for element in &mut self.elements {
            element.finish();
            if element.has_errors() {
                warn!(
                    item = %element.item(),
                    index = element.index(),
                    label = element.label(),
                    messages = element.messages().len(),
                    "rule element ended the pass with errors"
                );
            }
        }

        Ok((self.graph, self.elements))
    }

    /// Apply the phase's rules by ascending priority, ties in declaration order.
    fn run_phase(&mut self, phase: HookPhase) -> Result<(), DerivationError> {
        let mut order: Vec<usize> = self
            .elements
            .iter()
            .enumerate()
            .filter(|(_, element)| element.hook() == Some(phase))
            .map(|(position, _)| position)
            .collect();
        // `sort_by` is stable.
        order.sort_by(|&a, &b| {
            self.elements[a]
                .priority()
                .total_cmp(&self.elements[b].priority())
        });

        debug!(phase = %phase, rules = order.len(), "running hook phase");

        for position in order {
            self.elements[position].apply(&mut self.graph)?;
        }
        Ok(())
    }
}
