//! The document graph a derivation pass owns.
//!
//! # Architecture
//!
//! ```text
//! DocumentGraph
//!   ├─ actor: Option<ActorDocument>     (absent for unowned items)
//!   └─ items: Vec<ItemDocument>         (declaration order)
//!         └─ container ──► parent item, or the actor when unset
//! ```
//!
//! Selectors read the graph through [`DocumentView`]s. Every write goes
//! through [`DocumentGraph::mutate`], the single mutation entry point.

use std::collections::{HashMap, HashSet};

use super::actor::ActorDocument;
use super::data::{DataObject, DataValue, PathMiss, ValueType};
use super::id::{DocumentId, DocumentKind, DocumentRef};
use super::item::ItemDocument;
use super::path::PropertyPath;
use crate::error::DerivationError;
use crate::stats::{Component, SkillName};

/// A write to a single target field.
#[derive(Clone, Debug, PartialEq)]
pub enum Mutation {
    /// Add to a plain number.
    Add(f64),
    /// Overwrite a plain value wholesale.
    Replace(DataValue),
    /// Append a component to a composite or resource.
    Component(Component),
    /// Append a permanent component to a SPECIAL.
    PermanentSpecial(Component),
    /// Append a temporary component to a SPECIAL.
    TemporarySpecial(Component),
}

/// Why a mutation could not be written.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum MutationError {
    #[error("document {0:?} is not part of the graph")]
    UnknownDocument(DocumentRef),

    #[error("target does not resolve past segment {}", .0.depth)]
    Unresolved(PathMiss),

    #[error("target holds a {found}, which this mutation cannot write")]
    ShapeMismatch { found: ValueType },
}

impl Mutation {
    fn write(self, target: &mut DataValue) -> Result<(), MutationError> {
        let found = target.value_type();
        match (self, target) {
            (Self::Add(delta), DataValue::Number(value)) => *value += delta,
            (Self::Replace(value), target) if found.is_plain() => *target = value,
            (Self::Component(component), DataValue::Composite(number)) => number.add(component),
            (Self::Component(component), DataValue::Resource(resource)) => {
                resource.add(component)
            }
            (Self::PermanentSpecial(component), DataValue::Special(special)) => {
                special.add_permanent(component)
            }
            (Self::TemporarySpecial(component), DataValue::Special(special)) => {
                special.add_temporary(component)
            }
            _ => return Err(MutationError::ShapeMismatch { found }),
        }
        Ok(())
    }
}

/// Read-only view of one graph member.
#[derive(Clone, Copy, Debug)]
pub enum DocumentView<'a> {
    Actor(&'a ActorDocument),
    Item(&'a ItemDocument),
}

impl<'a> DocumentView<'a> {
    pub fn reference(&self) -> DocumentRef {
        match self {
            Self::Actor(_) => DocumentRef::Actor,
            Self::Item(item) => DocumentRef::Item(item.id),
        }
    }

    pub fn kind(&self) -> DocumentKind {
        match self {
            Self::Actor(_) => DocumentKind::Actor,
            Self::Item(_) => DocumentKind::Item,
        }
    }

    pub fn name(&self) -> &'a str {
        match self {
            Self::Actor(actor) => &actor.name,
            Self::Item(item) => &item.name,
        }
    }

    /// Declared subtype identifier, e.g. `character` or `weapon`.
    pub fn subtype(&self) -> &'a str {
        match self {
            Self::Actor(actor) => actor.kind.as_ref(),
            Self::Item(item) => item.kind.as_ref(),
        }
    }

    pub fn data(&self) -> &'a DataObject {
        match self {
            Self::Actor(actor) => &actor.data,
            Self::Item(item) => &item.data,
        }
    }

    pub fn as_item(&self) -> Option<&'a ItemDocument> {
        match self {
            Self::Actor(_) => None,
            Self::Item(item) => Some(item),
        }
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.as_item().is_some_and(|item| item.has_tag(tag))
    }

    pub fn skill(&self) -> Option<SkillName> {
        self.as_item().and_then(ItemDocument::skill)
    }
}

/// An actor (if any) and the items of one derivation pass.
#[derive(Clone, Debug)]
pub struct DocumentGraph {
    actor: Option<ActorDocument>,
    items: Vec<ItemDocument>,
    index: HashMap<DocumentId, usize>,
}

impl DocumentGraph {
    /// Build a graph, rejecting duplicate ids, dangling containers and cycles.
    pub fn new(
        actor: Option<ActorDocument>,
        items: Vec<ItemDocument>,
    ) -> Result<Self, DerivationError> {
        let mut index = HashMap::with_capacity(items.len());
        for (position, item) in items.iter().enumerate() {
            if index.insert(item.id, position).is_some() {
                return Err(DerivationError::DuplicateItem { id: item.id });
            }
        }

        let graph = Self {
            actor,
            items,
            index,
        };
        graph.check_containers()?;
        Ok(graph)
    }

    fn check_containers(&self) -> Result<(), DerivationError> {
        for item in &self.items {
            if let Some(container) = item.container {
                if !self.index.contains_key(&container) {
                    return Err(DerivationError::UnknownContainer {
                        item: item.id,
                        container,
                    });
                }
            }
        }

        for item in &self.items {
            let mut seen = HashSet::from([item.id]);
            let mut current = item.container;
            while let Some(container) = current {
                if !seen.insert(container) {
                    return Err(DerivationError::ContainerCycle { item: item.id });
                }
                current = self.item(container).and_then(|c| c.container);
            }
        }
        Ok(())
    }

    pub fn actor(&self) -> Option<&ActorDocument> {
        self.actor.as_ref()
    }

    pub fn actor_mut(&mut self) -> Option<&mut ActorDocument> {
        self.actor.as_mut()
    }

    pub fn items(&self) -> &[ItemDocument] {
        &self.items
    }

    pub fn item(&self, id: DocumentId) -> Option<&ItemDocument> {
        self.index.get(&id).map(|&position| &self.items[position])
    }

    fn item_mut(&mut self, id: DocumentId) -> Option<&mut ItemDocument> {
        let position = *self.index.get(&id)?;
        self.items.get_mut(position)
    }

    /// Hand the prepared documents back once the pass is over.
    pub fn into_parts(self) -> (Option<ActorDocument>, Vec<ItemDocument>) {
        (self.actor, self.items)
    }

    pub fn view(&self, doc: DocumentRef) -> Option<DocumentView<'_>> {
        match doc {
            DocumentRef::Actor => self.actor().map(DocumentView::Actor),
            DocumentRef::Item(id) => self.item(id).map(DocumentView::Item),
        }
    }

    /// Owning parent of an item: its container, or the actor.
    pub fn parent_of(&self, id: DocumentId) -> Option<DocumentRef> {
        match self.item(id)?.container {
            Some(container) => Some(DocumentRef::Item(container)),
            None => self.actor.as_ref().map(|_| DocumentRef::Actor),
        }
    }

    /// Items sharing `id`'s parent, excluding `id` itself.
    pub fn siblings_of(&self, id: DocumentId) -> Vec<DocumentId> {
        let Some(parent) = self.parent_of(id) else {
            return Vec::new();
        };
        self.items
            .iter()
            .filter(|item| item.id != id && self.parent_of(item.id) == Some(parent))
            .map(|item| item.id)
            .collect()
    }

    /// Every document a selector can reach: the actor, then items in
    /// declaration order.
    pub fn members(&self) -> impl Iterator<Item = DocumentView<'_>> {
        self.actor
            .iter()
            .map(DocumentView::Actor)
            .chain(self.items.iter().map(DocumentView::Item))
    }

    /// Sum of the damage threshold of every equipped item.
    pub fn equipped_threshold(&self) -> f64 {
        self.items.iter().map(ItemDocument::damage_threshold).sum()
    }

    /// Write one mutation to a target field.
    pub fn mutate(
        &mut self,
        doc: DocumentRef,
        path: &PropertyPath,
        mutation: Mutation,
    ) -> Result<(), MutationError> {
        let data = match doc {
            DocumentRef::Actor => self.actor.as_mut().map(|actor| &mut actor.data),
            DocumentRef::Item(id) => self.item_mut(id).map(|item| &mut item.data),
        }
        .ok_or(MutationError::UnknownDocument(doc))?;

        let target = data.resolve_mut(path).map_err(MutationError::Unresolved)?;
        mutation.write(target)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EngineConfig;
    use crate::document::source::{ActorSource, ItemSource, ItemSystem, MiscSource, WeaponSource};

    fn misc(id: u32) -> ItemSource {
        ItemSource::new(DocumentId(id), format!("Item {id}"), ItemSystem::Misc(MiscSource::default()))
    }

    fn graph(items: Vec<ItemSource>) -> Result<DocumentGraph, DerivationError> {
        let actor = ActorDocument::prepare_base(
            &ActorSource::new(DocumentId(1), "Courier"),
            &EngineConfig::default(),
        );
        DocumentGraph::new(
            Some(actor),
            items.iter().map(ItemDocument::prepare).collect(),
        )
    }

    #[test]
    fn rejects_duplicate_ids() {
        assert_eq!(
            graph(vec![misc(2), misc(2)]).unwrap_err(),
            DerivationError::DuplicateItem { id: DocumentId(2) }
        );
    }

    #[test]
    fn rejects_unknown_container() {
        assert_eq!(
            graph(vec![misc(2).with_container(DocumentId(9))]).unwrap_err(),
            DerivationError::UnknownContainer {
                item: DocumentId(2),
                container: DocumentId(9),
            }
        );
    }

    #[test]
    fn rejects_container_cycles() {
        let result = graph(vec![
            misc(2).with_container(DocumentId(3)),
            misc(3).with_container(DocumentId(2)),
        ]);
        assert!(matches!(result, Err(DerivationError::ContainerCycle { .. })));

        let result = graph(vec![misc(4).with_container(DocumentId(4))]);
        assert!(matches!(result, Err(DerivationError::ContainerCycle { .. })));
    }

    #[test]
    fn parents_and_siblings() {
        let graph = graph(vec![
            misc(2),
            misc(3),
            misc(4).with_container(DocumentId(2)),
            misc(5).with_container(DocumentId(2)),
        ])
        .unwrap();

        assert_eq!(graph.parent_of(DocumentId(3)), Some(DocumentRef::Actor));
        assert_eq!(graph.parent_of(DocumentId(4)), Some(DocumentRef::Item(DocumentId(2))));
        assert_eq!(graph.siblings_of(DocumentId(2)), vec![DocumentId(3)]);
        assert_eq!(graph.siblings_of(DocumentId(4)), vec![DocumentId(5)]);
        assert_eq!(graph.members().count(), 5);
    }

    #[test]
    fn unowned_item_has_no_parent() {
        let graph = DocumentGraph::new(None, vec![ItemDocument::prepare(&misc(2))]).unwrap();
        assert_eq!(graph.parent_of(DocumentId(2)), None);
        assert!(graph.siblings_of(DocumentId(2)).is_empty());
    }

    #[test]
    fn mutate_checks_target_shape() {
        let pistol = ItemSource::new(
            DocumentId(2),
            "Pistol",
            ItemSystem::Weapon(WeaponSource::new(SkillName::Guns, 6.0)),
        );
        let mut graph = graph(vec![pistol]).unwrap();
        let doc = DocumentRef::Item(DocumentId(2));
        let damage = PropertyPath::parse("damage").unwrap();

        graph
            .mutate(doc, &damage, Mutation::Component(Component::labeled(2.0, "Mod")))
            .unwrap();
        assert_eq!(
            graph.view(doc).and_then(|v| v.data().get("damage")?.total()),
            Some(8.0)
        );

        assert_eq!(
            graph.mutate(doc, &damage, Mutation::Add(1.0)),
            Err(MutationError::ShapeMismatch {
                found: ValueType::Composite
            })
        );

        let range = PropertyPath::parse("range").unwrap();
        graph.mutate(doc, &range, Mutation::Add(30.0)).unwrap();
        graph
            .mutate(doc, &range, Mutation::Replace(DataValue::from("far")))
            .unwrap();
        assert_eq!(
            graph.view(doc).and_then(|v| v.data().get("range")?.as_text()),
            Some("far")
        );
    }
}
