//! Rule elements: one validated, applicable rule for the current pass.
//!
//! # Lifecycle
//!
//! ```text
//! raw JSON ──hydrate──► Unvalidated ──► Validating ──┬─► Valid
//!                                                    └─► Invalid (any error)
//! ```
//!
//! Validation runs in three stages:
//!
//! 1. **Syntactic**: the raw source against the schema ([`RuleElementSource::parse`])
//! 2. **Semantic**: selectors, target path and value type against the rule kind
//! 3. **Logical**: the resolved target on each selected document
//!
//! Errors from stages 1 and 2 block every document. A stage 3 error blocks
//! only the document it was found on.

use serde::Serialize;
use serde_json::Value;
use tracing::trace;

use super::condition::Condition;
use super::hook::HookPhase;
use super::kind::{RuleKind, RuleTypeRegistry, ValueKind};
use super::message::{MessageFormatter, RuleElementMessage};
use super::selector::{DocumentSelector, SelectorSource};
use super::source::{self, RuleElementSource};
use super::value::RuleValue;
use crate::document::{
    DataValue, DocumentGraph, DocumentId, DocumentView, ItemDocument, Mutation, PropertyPath,
    ValueType,
};
use crate::error::DerivationError;
use crate::stats::{Component, SpecialName};

/// Validation state of a rule element within one pass.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, strum::Display, strum::AsRefStr,
)]
#[serde(rename_all = "camelCase")]
#[strum(serialize_all = "camelCase")]
pub enum RuleState {
    #[default]
    Unvalidated,
    Validating,
    Valid,
    Invalid,
}

/// Selectors, target and value after the semantic stage.
#[derive(Clone, Debug)]
struct Plan {
    selectors: Vec<DocumentSelector>,
    target: PropertyPath,
    value: RuleValue,
}

/// A rule element hydrated from one source of an item.
#[derive(Clone, Debug)]
pub struct RuleElement {
    item: DocumentId,
    index: usize,
    label: String,
    source: Option<RuleElementSource>,
    plan: Option<Plan>,
    state: RuleState,
    messages: Vec<RuleElementMessage>,
}

impl RuleElement {
    /// Hydrate the `index`-th rule source of `owner` and run stages 1 and 2.
    ///
    /// Returns `None` for disabled sources; they are never validated.
    pub fn hydrate(
        owner: &ItemDocument,
        index: usize,
        raw: &Value,
        registry: &RuleTypeRegistry,
    ) -> Option<Self> {
        if source::is_disabled(raw) {
            return None;
        }

        let mut element = Self {
            item: owner.id,
            index,
            label: owner.name.clone(),
            source: None,
            plan: None,
            state: RuleState::Unvalidated,
            messages: Vec::new(),
        };
        element.state = RuleState::Validating;

        match RuleElementSource::parse(raw, registry) {
            Ok(source) => {
                if !source.label.is_empty() {
                    element.label = source.label.clone();
                }
                element.plan = element.check_shape(owner.id, &source);
                element.source = Some(source);
            }
            Err(messages) => messages.into_iter().for_each(|m| element.push(m)),
        }

        Some(element)
    }

    /// Stage 2. Returns `None` when any semantic error was recorded.
    fn check_shape(&mut self, root: DocumentId, source: &RuleElementSource) -> Option<Plan> {
        let (selectors, target) = if source.kind.is_special() {
            self.special_shape(source)?
        } else {
            self.plain_shape(root, source)?
        };

        if source.kind.accepted_value() == ValueKind::Number && source.value.as_number().is_none()
        {
            self.push(RuleElementMessage::WrongValueType {
                expected: ValueType::Number.to_string(),
                found: source.value.value_type(),
            });
            return None;
        }

        Some(Plan {
            selectors,
            target,
            value: source.value.clone(),
        })
    }

    fn plain_shape(
        &mut self,
        root: DocumentId,
        source: &RuleElementSource,
    ) -> Option<(Vec<DocumentSelector>, PropertyPath)> {
        let mut selectors = Vec::with_capacity(source.selectors.len());
        let mut failed = false;
        for selector in &source.selectors {
            match DocumentSelector::new(root, selector) {
                Ok(selector) => selectors.push(selector),
                Err(e) => {
                    self.push(RuleElementMessage::SyntaxError {
                        property: "selectors".into(),
                        reason: e.to_string(),
                    });
                    failed = true;
                }
            }
        }

        let target = match PropertyPath::parse(&source.target) {
            Ok(target) => Some(target),
            Err(e) => {
                self.push(RuleElementMessage::SyntaxError {
                    property: "target".into(),
                    reason: format!("`{}`: {e}", source.target),
                });
                None
            }
        };

        match target {
            Some(target) if !failed => Some((selectors, target)),
            _ => None,
        }
    }

    /// SPECIAL kinds always select the actor and write `specials.<name>`.
    ///
    /// The name comes from the first selector keyword naming a SPECIAL, or
    /// from `target` (`luck` or `specials.luck`) when no selector names one.
    fn special_shape(
        &mut self,
        source: &RuleElementSource,
    ) -> Option<(Vec<DocumentSelector>, PropertyPath)> {
        let mut named: Option<SpecialName> = None;
        let mut failed = false;
        for selector in &source.selectors {
            let ignored = match selector {
                SelectorSource::Keyword(keyword) if keyword == "actor" => false,
                SelectorSource::Keyword(keyword) => match keyword.parse::<SpecialName>() {
                    Ok(special) if named.is_none() || named == Some(special) => {
                        named = Some(special);
                        false
                    }
                    Ok(_) => true,
                    Err(_) if DocumentSelector::new(self.item, selector).is_ok() => true,
                    Err(_) => {
                        self.push(RuleElementMessage::WrongSpecialName {
                            name: keyword.clone(),
                        });
                        failed = true;
                        false
                    }
                },
                _ => true,
            };
            if ignored {
                self.push(RuleElementMessage::NotMatchingSelector {
                    selector: selector.to_string(),
                });
            }
        }
        if failed {
            return None;
        }

        let special = match named {
            Some(special) => special,
            None => {
                let raw = source.target.trim();
                let name = raw.strip_prefix("specials.").unwrap_or(raw);
                let Ok(special) = name.parse::<SpecialName>() else {
                    self.push(RuleElementMessage::WrongSpecialName {
                        name: name.to_owned(),
                    });
                    return None;
                };
                special
            }
        };

        let target = PropertyPath::from_segments(["specials", special.as_ref()]).ok()?;
        let actor = DocumentSelector::new(self.item, &SelectorSource::from("actor")).ok()?;
        Some((vec![actor], target))
    }

    fn push(&mut self, message: RuleElementMessage) {
        if message.is_error() {
            self.state = RuleState::Invalid;
        }
        self.messages.push(message);
    }

    pub fn item(&self) -> DocumentId {
        self.item
    }

    pub fn index(&self) -> usize {
        self.index
    }

    /// Rule label, or the owning item's name when the rule has none.
    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn source(&self) -> Option<&RuleElementSource> {
        self.source.as_ref()
    }

    pub fn kind(&self) -> Option<RuleKind> {
        self.source.as_ref().map(|s| s.kind)
    }

    /// Phase the rule runs in; `None` when the source failed the schema.
    pub fn hook(&self) -> Option<HookPhase> {
        self.source.as_ref().map(|s| s.hook)
    }

    pub fn priority(&self) -> f64 {
        self.source.as_ref().map_or(0.0, |s| s.priority)
    }

    pub fn state(&self) -> RuleState {
        self.state
    }

    pub fn messages(&self) -> &[RuleElementMessage] {
        &self.messages
    }

    pub fn has_errors(&self) -> bool {
        self.messages.iter().any(RuleElementMessage::is_error)
    }

    fn conditions_hold(&self, graph: &DocumentGraph, conditions: &[Condition]) -> bool {
        match graph.item(self.item) {
            Some(owner) => conditions.iter().all(|c| c.holds(owner)),
            None => false,
        }
    }

    /// Validate against every selected document and apply where possible.
    ///
    /// Only an engine bug produces `Err`; authoring mistakes become messages.
    pub fn apply(&mut self, graph: &mut DocumentGraph) -> Result<(), DerivationError> {
        // No plan means stage 1 or 2 failed; nothing is applied anywhere.
        let (Some(source), Some(plan)) = (&self.source, &self.plan) else {
            return Ok(());
        };

        let kind = source.kind;
        let enabled_now = self.conditions_hold(graph, &source.conditions);
        let targets = DocumentSelector::select_all(&plan.selectors, graph);
        let target = plan.target.clone();
        let value = plan.value.clone();

        for doc in targets {
            let Some(view) = graph.view(doc) else {
                continue;
            };
            let checked = self.check_target(kind, &view, &target, &value);
            let (mutation, changed) = match checked {
                Ok(outcome) => outcome,
                Err(message) => {
                    self.push(message);
                    continue;
                }
            };
            if !enabled_now {
                continue;
            }

            let document = view.name().to_owned();
            graph
                .mutate(doc, &target, mutation)
                .map_err(|_| DerivationError::MutationFailed {
                    item: self.item,
                    index: self.index,
                    path: target.clone(),
                })?;
            trace!(
                item = %self.item,
                index = self.index,
                rule = %kind,
                target = %target,
                document = %document,
                "applied rule"
            );

            if let Some((from, to)) = changed {
                self.push(RuleElementMessage::ChangedType {
                    path: target.to_string(),
                    document,
                    from,
                    to,
                });
            }
        }
        Ok(())
    }

    /// Stage 3 for one document: the mutation to write, and for replacements
    /// a type change worth warning about.
    fn check_target(
        &self,
        kind: RuleKind,
        view: &DocumentView<'_>,
        path: &PropertyPath,
        value: &RuleValue,
    ) -> Result<(Mutation, Option<(ValueType, ValueType)>), RuleElementMessage> {
        let document = view.name().to_owned();
        let current = view.data().resolve(path).map_err(|miss| {
            if miss.is_root() {
                RuleElementMessage::WrongSelectedType {
                    path: path.to_string(),
                    document: document.clone(),
                }
            } else {
                RuleElementMessage::NotMatchingTarget {
                    path: path.to_string(),
                    document: document.clone(),
                }
            }
        })?;
        let found = current.value_type();
        let amount = value.as_number().unwrap_or_default();
        let component = || Component::labeled(amount, self.label.clone());

        match kind {
            RuleKind::FlatModifier => match current {
                DataValue::Number(_) => Ok((Mutation::Add(amount), None)),
                _ => Err(RuleElementMessage::NotModifiableNumber {
                    path: path.to_string(),
                    document,
                    found,
                }),
            },
            RuleKind::ReplaceValue if found.is_plain() => {
                let to = value.value_type();
                let changed = (to != found).then_some((found, to));
                Ok((Mutation::Replace(value.clone().into()), changed))
            }
            RuleKind::ReplaceValue => Err(RuleElementMessage::WrongTargetType {
                path: path.to_string(),
                document,
                expected: "a boolean, number or string".into(),
                found,
            }),
            RuleKind::NumberComponent => match current {
                DataValue::Composite(_) | DataValue::Resource(_) => {
                    Ok((Mutation::Component(component()), None))
                }
                _ => Err(RuleElementMessage::NotCompositeNumber {
                    path: path.to_string(),
                    document,
                    found,
                }),
            },
            RuleKind::PermSpecialComponent | RuleKind::TempSpecialComponent => {
                // Unreachable from sources: the plan always selects the actor.
                if !view.reference().is_actor() {
                    return Err(RuleElementMessage::NotActor { document });
                }
                if found != ValueType::Special {
                    return Err(RuleElementMessage::WrongTargetType {
                        path: path.to_string(),
                        document,
                        expected: ValueType::Special.to_string(),
                        found,
                    });
                }
                let mutation = if kind == RuleKind::PermSpecialComponent {
                    Mutation::PermanentSpecial(component())
                } else {
                    Mutation::TemporarySpecial(component())
                };
                Ok((mutation, None))
            }
        }
    }

    /// Close the pass: settle the state and flag a broken rule once.
    pub fn finish(&mut self) {
        if self.has_errors() {
            self.state = RuleState::Invalid;
            self.messages.push(RuleElementMessage::NotSaved);
        } else {
            self.state = RuleState::Valid;
        }
    }

    pub fn report(&self, formatter: &dyn MessageFormatter) -> RuleReport {
        RuleReport {
            item: self.item,
            index: self.index,
            label: self.label.clone(),
            state: self.state,
            rendered: self.messages.iter().map(|m| m.render(formatter)).collect(),
            messages: self.messages.clone(),
        }
    }
}

/// Diagnostics of one enabled rule element after a pass.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct RuleReport {
    pub item: DocumentId,
    pub index: usize,
    pub label: String,
    pub state: RuleState,
    pub messages: Vec<RuleElementMessage>,
    /// `messages` rendered through the engine's formatter, same order.
    pub rendered: Vec<String>,
}

impl RuleReport {
    pub fn has_errors(&self) -> bool {
        self.messages.iter().any(RuleElementMessage::is_error)
    }

    pub fn is_clean(&self) -> bool {
        self.messages.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EngineConfig;
    use crate::document::{
        ActorDocument, ActorSource, ApparelSource, ItemSource, ItemSystem, WeaponSource,
    };
    use crate::rules::message::MessageKind;
    use crate::stats::SkillName;
    use serde_json::json;

    const PISTOL: DocumentId = DocumentId(2);

    fn pistol(equipped: bool) -> ItemSource {
        let mut weapon = WeaponSource::new(SkillName::Guns, 6.0);
        weapon.equipped = equipped;
        weapon.range = 10.0;
        ItemSource::new(PISTOL, "10mm Pistol", ItemSystem::Weapon(weapon))
    }

    fn graph(item: &ItemSource) -> DocumentGraph {
        let actor = ActorDocument::prepare_base(
            &ActorSource::new(DocumentId(1), "Courier"),
            &EngineConfig::default(),
        );
        DocumentGraph::new(Some(actor), vec![ItemDocument::prepare(item)]).unwrap()
    }

    fn run(item: &ItemSource, source: RuleElementSource) -> (RuleElement, DocumentGraph) {
        let mut graph = graph(item);
        let owner = ItemDocument::prepare(item);
        let mut element =
            RuleElement::hydrate(&owner, 0, &source.to_json(), &RuleTypeRegistry::default())
                .unwrap();
        element.apply(&mut graph).unwrap();
        element.finish();
        (element, graph)
    }

    fn kinds(element: &RuleElement) -> Vec<MessageKind> {
        element.messages().iter().map(RuleElementMessage::kind).collect()
    }

    fn item_field(graph: &DocumentGraph, field: &str) -> Option<DataValue> {
        graph.item(PISTOL)?.data.get(field).cloned()
    }

    #[test]
    fn flat_modifier_adds_to_plain_number() {
        let source =
            RuleElementSource::new(RuleKind::FlatModifier, "range", 5.0).with_selector("this");
        let (element, graph) = run(&pistol(false), source);

        assert_eq!(element.state(), RuleState::Valid);
        assert!(element.messages().is_empty());
        assert_eq!(item_field(&graph, "range"), Some(DataValue::Number(15.0)));
    }

    #[test]
    fn label_falls_back_to_item_name() {
        let source =
            RuleElementSource::new(RuleKind::NumberComponent, "damage", 2.0).with_selector("this");
        let (element, graph) = run(&pistol(false), source);

        assert_eq!(element.label(), "10mm Pistol");
        let damage = item_field(&graph, "damage").unwrap();
        assert_eq!(
            damage.as_composite().unwrap().components(),
            [Component::labeled(2.0, "10mm Pistol")]
        );
    }

    #[test]
    fn number_component_on_plain_number_is_rejected() {
        let source =
            RuleElementSource::new(RuleKind::NumberComponent, "range", 2.0).with_selector("this");
        let (element, graph) = run(&pistol(false), source);

        assert_eq!(element.state(), RuleState::Invalid);
        assert_eq!(
            kinds(&element),
            [MessageKind::NotCompositeNumber, MessageKind::NotSaved]
        );
        assert_eq!(item_field(&graph, "range"), Some(DataValue::Number(10.0)));
    }

    #[test]
    fn missing_fields_distinguish_root_and_depth() {
        let source =
            RuleElementSource::new(RuleKind::FlatModifier, "charm", 1.0).with_selector("this");
        let (element, _) = run(&pistol(false), source);
        assert_eq!(kinds(&element)[0], MessageKind::WrongSelectedType);

        let source = RuleElementSource::new(RuleKind::FlatModifier, "damage.bonus", 1.0)
            .with_selector("this");
        let (element, _) = run(&pistol(false), source);
        assert_eq!(kinds(&element)[0], MessageKind::NotMatchingTarget);
    }

    #[test]
    fn replace_value_warns_on_type_change() {
        let source =
            RuleElementSource::new(RuleKind::ReplaceValue, "range", RuleValue::Text("far".into()))
                .with_selector("this");
        let (element, graph) = run(&pistol(false), source);

        assert_eq!(element.state(), RuleState::Valid);
        assert_eq!(kinds(&element), [MessageKind::ChangedType]);
        assert_eq!(item_field(&graph, "range"), Some(DataValue::from("far")));
    }

    #[test]
    fn conditions_gate_mutation_but_not_diagnostics() {
        let source = RuleElementSource::new(RuleKind::FlatModifier, "range", 5.0)
            .with_selector("this")
            .with_condition(Condition::WhenEquipped);
        let (element, graph) = run(&pistol(false), source.clone());
        assert!(element.messages().is_empty());
        assert_eq!(item_field(&graph, "range"), Some(DataValue::Number(10.0)));

        let (_, graph) = run(&pistol(true), source);
        assert_eq!(item_field(&graph, "range"), Some(DataValue::Number(15.0)));

        let broken = RuleElementSource::new(RuleKind::FlatModifier, "damage", 5.0)
            .with_selector("this")
            .with_condition(Condition::WhenEquipped);
        let (element, _) = run(&pistol(false), broken);
        assert_eq!(
            kinds(&element),
            [MessageKind::NotModifiableNumber, MessageKind::NotSaved]
        );
    }

    #[test]
    fn special_component_redirects_to_actor() {
        let source = RuleElementSource::new(RuleKind::TempSpecialComponent, "luck", 2.0)
            .with_selector("this")
            .with_label("Lucky Shades");
        let (element, graph) = run(&pistol(false), source);

        assert_eq!(element.state(), RuleState::Valid);
        assert_eq!(kinds(&element), [MessageKind::NotMatchingSelector]);
        let luck = graph.actor().unwrap().special(SpecialName::Luck).unwrap();
        assert_eq!(luck.temporary_total(), 7.0);
        assert_eq!(luck.permanent_total(), 5.0);
    }

    #[test]
    fn selector_keyword_names_the_special() {
        let source = RuleElementSource::new(RuleKind::PermSpecialComponent, "", 2.0)
            .with_selector("luck");
        let (element, graph) = run(&pistol(false), source);

        assert_eq!(element.state(), RuleState::Valid);
        assert!(element.messages().is_empty());
        let luck = graph.actor().unwrap().special(SpecialName::Luck).unwrap();
        assert_eq!(luck.permanent_total(), 7.0);
    }

    #[test]
    fn selector_special_wins_over_target() {
        let source = RuleElementSource::new(RuleKind::TempSpecialComponent, "strength", 1.0)
            .with_selector("actor")
            .with_selector("agility")
            .with_selector("luck");
        let (element, graph) = run(&pistol(false), source);

        assert_eq!(kinds(&element), [MessageKind::NotMatchingSelector]);
        let actor = graph.actor().unwrap();
        assert_eq!(actor.special_total(SpecialName::Agility), 6.0);
        assert_eq!(actor.special_total(SpecialName::Strength), 5.0);
        assert_eq!(actor.special_total(SpecialName::Luck), 5.0);
    }

    #[test]
    fn unknown_selector_keyword_is_wrong_special_name() {
        let source = RuleElementSource::new(RuleKind::PermSpecialComponent, "luck", 2.0)
            .with_selector("foobar");
        let (element, graph) = run(&pistol(false), source);

        assert_eq!(element.state(), RuleState::Invalid);
        assert_eq!(
            element.messages()[0],
            RuleElementMessage::WrongSpecialName {
                name: "foobar".into()
            }
        );
        assert_eq!(
            kinds(&element),
            [MessageKind::WrongSpecialName, MessageKind::NotSaved]
        );
        assert_eq!(graph.actor().unwrap().special_total(SpecialName::Luck), 5.0);
    }

    #[test]
    fn unknown_special_name_blocks_rule() {
        let source = RuleElementSource::new(RuleKind::PermSpecialComponent, "foobar", 1.0)
            .with_selector("actor");
        let (element, graph) = run(&pistol(false), source);

        assert_eq!(
            kinds(&element),
            [MessageKind::WrongSpecialName, MessageKind::NotSaved]
        );
        assert_eq!(
            graph.actor().unwrap().special_total(SpecialName::Strength),
            5.0
        );
    }

    #[test]
    fn wrong_value_type_blocks_rule() {
        let source = RuleElementSource::new(RuleKind::FlatModifier, "range", RuleValue::Bool(true))
            .with_selector("this");
        let (element, graph) = run(&pistol(false), source);

        assert_eq!(
            kinds(&element),
            [MessageKind::WrongValueType, MessageKind::NotSaved]
        );
        assert_eq!(item_field(&graph, "range"), Some(DataValue::Number(10.0)));
    }

    #[test]
    fn invalid_selector_and_target_are_syntax_errors() {
        let source = RuleElementSource::new(RuleKind::FlatModifier, "range..x", 1.0)
            .with_selector("owner");
        let (element, _) = run(&pistol(false), source);
        assert_eq!(
            kinds(&element),
            [
                MessageKind::SyntaxError,
                MessageKind::SyntaxError,
                MessageKind::NotSaved
            ]
        );
    }

    #[test]
    fn schema_errors_prevent_hook_assignment() {
        let owner = ItemDocument::prepare(&pistol(false));
        let mut element = RuleElement::hydrate(
            &owner,
            3,
            &json!({ "type": "FlatModifier" }),
            &RuleTypeRegistry::default(),
        )
        .unwrap();
        assert_eq!(element.hook(), None);
        assert_eq!(element.state(), RuleState::Invalid);

        element.finish();
        assert_eq!(element.messages().last(), Some(&RuleElementMessage::NotSaved));
    }

    #[test]
    fn disabled_sources_do_not_hydrate() {
        let owner = ItemDocument::prepare(&pistol(false));
        let raw = RuleElementSource::new(RuleKind::FlatModifier, "nope", RuleValue::Bool(true))
            .disabled()
            .to_json();
        assert!(RuleElement::hydrate(&owner, 0, &raw, &RuleTypeRegistry::default()).is_none());
    }

    #[test]
    fn document_errors_block_only_that_document() {
        let armor = ApparelSource {
            damage_threshold: 2.0,
            ..ApparelSource::default()
        };
        let vest = ItemSource::new(DocumentId(3), "Vest", ItemSystem::Apparel(armor));
        let weapon = pistol(false);

        let actor = ActorDocument::prepare_base(
            &ActorSource::new(DocumentId(1), "Courier"),
            &EngineConfig::default(),
        );
        let mut graph = DocumentGraph::new(
            Some(actor),
            vec![ItemDocument::prepare(&weapon), ItemDocument::prepare(&vest)],
        )
        .unwrap();

        let source =
            RuleElementSource::new(RuleKind::NumberComponent, "damage", 1.0).with_selector("item");
        let owner = ItemDocument::prepare(&weapon);
        let mut element = RuleElement::hydrate(
            &owner,
            0,
            &source.to_json(),
            &RuleTypeRegistry::default(),
        )
        .unwrap();
        element.apply(&mut graph).unwrap();
        element.finish();

        assert_eq!(
            kinds(&element),
            [MessageKind::WrongSelectedType, MessageKind::NotSaved]
        );
        assert_eq!(
            graph.item(PISTOL).and_then(|i| i.data.get("damage")?.total()),
            Some(7.0)
        );
    }

    #[test]
    fn report_renders_messages() {
        let source =
            RuleElementSource::new(RuleKind::NumberComponent, "range", 2.0).with_selector("this");
        let (element, _) = run(&pistol(false), source);
        let report = element.report(&crate::rules::TemplateCatalog::english());

        assert_eq!(report.index, 0);
        assert!(report.has_errors());
        assert_eq!(report.rendered.len(), 2);
        assert_eq!(
            report.rendered[0],
            "`range` on 10mm Pistol is a number, not a CompositeNumber."
        );
    }
}
