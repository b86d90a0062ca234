//! Document selectors: which graph members a rule applies to.
//!
//! # Vocabulary
//!
//! ```text
//! "this" | "actor" | "item" | "parent" | "sibling"
//! { "tag": <tag> }
//! { "type": <subtype> }
//! { "usesSkill": <skill> }
//! { "or": [<selector>, ...] }      (no nested "or")
//! ```
//!
//! A rule's selector list is OR-combined: its targets are the union of every
//! member each selector selects.

use core::fmt;
use core::str::FromStr;

use serde_json::{Map, Value};

use crate::document::{ActorKind, DocumentGraph, DocumentId, DocumentRef, DocumentView, ItemKind};
use crate::stats::SkillName;

/// Persisted selector shape, before it is checked.
#[derive(Clone, Debug, PartialEq)]
pub enum SelectorSource {
    Keyword(String),
    Tag(String),
    Type(String),
    UsesSkill(String),
    Or(Vec<SelectorSource>),
    /// Any other JSON shape; rejected when the selector is constructed.
    Other(Value),
}

impl SelectorSource {
    pub fn from_json(value: &Value) -> Self {
        match value {
            Value::String(keyword) => Self::Keyword(keyword.clone()),
            Value::Object(object) if object.len() == 1 => Self::from_object(object),
            other => Self::Other(other.clone()),
        }
    }

    fn from_object(object: &Map<String, Value>) -> Self {
        let Some((key, value)) = object.iter().next() else {
            return Self::Other(Value::Object(object.clone()));
        };
        match (key.as_str(), value) {
            ("tag", Value::String(tag)) => Self::Tag(tag.clone()),
            ("type", Value::String(subtype)) => Self::Type(subtype.clone()),
            ("usesSkill", Value::String(skill)) => Self::UsesSkill(skill.clone()),
            ("or", Value::Array(selectors)) => {
                Self::Or(selectors.iter().map(Self::from_json).collect())
            }
            _ => Self::Other(Value::Object(object.clone())),
        }
    }

    pub fn to_json(&self) -> Value {
        match self {
            Self::Keyword(keyword) => Value::String(keyword.clone()),
            Self::Tag(tag) => single("tag", Value::String(tag.clone())),
            Self::Type(subtype) => single("type", Value::String(subtype.clone())),
            Self::UsesSkill(skill) => single("usesSkill", Value::String(skill.clone())),
            Self::Or(selectors) => single(
                "or",
                Value::Array(selectors.iter().map(Self::to_json).collect()),
            ),
            Self::Other(value) => value.clone(),
        }
    }

    pub fn is_keyword(&self, keyword: &str) -> bool {
        matches!(self, Self::Keyword(k) if k == keyword)
    }
}

fn single(key: &str, value: Value) -> Value {
    let mut object = Map::new();
    object.insert(key.to_owned(), value);
    Value::Object(object)
}

impl fmt::Display for SelectorSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_json())
    }
}

impl From<&str> for SelectorSource {
    fn from(keyword: &str) -> Self {
        Self::Keyword(keyword.to_owned())
    }
}

/// Why a selector source could not be turned into a selector.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum SelectorError {
    #[error("unknown selector `{0}`")]
    UnknownKeyword(String),

    #[error("unknown document type `{0}`")]
    UnknownSubtype(String),

    #[error("unknown skill `{0}`")]
    UnknownSkill(String),

    #[error("`or` selectors cannot be nested")]
    NestedOr,

    #[error("unsupported selector {0}")]
    Malformed(String),
}

/// The predicate a selector applies.
#[derive(Clone, Debug, PartialEq)]
pub enum SelectorKind {
    This,
    Actor,
    Item,
    Parent,
    Sibling,
    Tag(String),
    Type(String),
    UsesSkill(SkillName),
    Or(Vec<SelectorKind>),
}

impl SelectorKind {
    fn from_source(source: &SelectorSource, nested: bool) -> Result<Self, SelectorError> {
        match source {
            SelectorSource::Keyword(keyword) => match keyword.as_str() {
                "this" => Ok(Self::This),
                "actor" => Ok(Self::Actor),
                "item" => Ok(Self::Item),
                "parent" => Ok(Self::Parent),
                "sibling" => Ok(Self::Sibling),
                other => Err(SelectorError::UnknownKeyword(other.to_owned())),
            },
            SelectorSource::Tag(tag) => Ok(Self::Tag(tag.clone())),
            SelectorSource::Type(subtype) => {
                let known =
                    ItemKind::from_str(subtype).is_ok() || ActorKind::from_str(subtype).is_ok();
                if known {
                    Ok(Self::Type(subtype.clone()))
                } else {
                    Err(SelectorError::UnknownSubtype(subtype.clone()))
                }
            }
            SelectorSource::UsesSkill(skill) => SkillName::from_str(skill)
                .map(Self::UsesSkill)
                .map_err(|_| SelectorError::UnknownSkill(skill.clone())),
            SelectorSource::Or(_) if nested => Err(SelectorError::NestedOr),
            SelectorSource::Or(selectors) => selectors
                .iter()
                .map(|selector| Self::from_source(selector, true))
                .collect::<Result<Vec<_>, _>>()
                .map(Self::Or),
            SelectorSource::Other(value) => Err(SelectorError::Malformed(value.to_string())),
        }
    }

    fn selects(
        &self,
        root: DocumentId,
        graph: &DocumentGraph,
        candidate: &DocumentView<'_>,
    ) -> bool {
        let reference = candidate.reference();
        match self {
            Self::This => reference == DocumentRef::Item(root),
            Self::Actor => reference.is_actor(),
            Self::Item => !reference.is_actor(),
            Self::Parent => graph.parent_of(root) == Some(reference),
            Self::Sibling => match reference.item_id() {
                Some(id) if id != root => {
                    let parent = graph.parent_of(root);
                    parent.is_some() && graph.parent_of(id) == parent
                }
                _ => false,
            },
            Self::Tag(tag) => candidate.has_tag(tag),
            Self::Type(subtype) => candidate.subtype() == subtype.as_str(),
            Self::UsesSkill(skill) => candidate.skill() == Some(*skill),
            Self::Or(selectors) => selectors
                .iter()
                .any(|selector| selector.selects(root, graph, candidate)),
        }
    }
}

/// A selector bound to the item that owns the rule.
#[derive(Clone, Debug, PartialEq)]
pub struct DocumentSelector {
    root: DocumentId,
    kind: SelectorKind,
}

impl DocumentSelector {
    pub fn new(root: DocumentId, source: &SelectorSource) -> Result<Self, SelectorError> {
        Ok(Self {
            root,
            kind: SelectorKind::from_source(source, false)?,
        })
    }

    pub fn kind(&self) -> &SelectorKind {
        &self.kind
    }

    pub fn selects(&self, graph: &DocumentGraph, candidate: &DocumentView<'_>) -> bool {
        self.kind.selects(self.root, graph, candidate)
    }

    /// Union of the graph members any of `selectors` selects, in graph order.
    pub fn select_all(selectors: &[Self], graph: &DocumentGraph) -> Vec<DocumentRef> {
        graph
            .members()
            .filter(|candidate| selectors.iter().any(|s| s.selects(graph, candidate)))
            .map(|candidate| candidate.reference())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EngineConfig;
    use crate::document::{
        ActorDocument, ActorSource, ApparelSource, ItemDocument, ItemSource, ItemSystem,
        MiscSource, WeaponSource,
    };
    use serde_json::json;

    const RIFLE: DocumentId = DocumentId(2);
    const SCOPE: DocumentId = DocumentId(3);
    const SUPPRESSOR: DocumentId = DocumentId(4);
    const ARMOR: DocumentId = DocumentId(5);

    fn graph() -> DocumentGraph {
        let actor = ActorDocument::prepare_base(
            &ActorSource::new(DocumentId(1), "Courier"),
            &EngineConfig::default(),
        );
        let items = [
            ItemSource::new(
                RIFLE,
                "Varmint Rifle",
                ItemSystem::Weapon(WeaponSource::new(SkillName::Guns, 8.0)),
            )
            .with_tag("rifle"),
            ItemSource::new(SCOPE, "Scope", ItemSystem::Misc(MiscSource::default()))
                .with_container(RIFLE)
                .with_tag("mod"),
            ItemSource::new(SUPPRESSOR, "Suppressor", ItemSystem::Misc(MiscSource::default()))
                .with_container(RIFLE)
                .with_tag("mod"),
            ItemSource::new(ARMOR, "Leather Armor", ItemSystem::Apparel(ApparelSource::default())),
        ];
        DocumentGraph::new(Some(actor), items.iter().map(ItemDocument::prepare).collect()).unwrap()
    }

    fn select(root: DocumentId, raw: Value) -> Vec<DocumentRef> {
        let graph = graph();
        let selector = DocumentSelector::new(root, &SelectorSource::from_json(&raw)).unwrap();
        DocumentSelector::select_all(&[selector], &graph)
    }

    fn items(ids: &[DocumentId]) -> Vec<DocumentRef> {
        ids.iter().copied().map(DocumentRef::Item).collect()
    }

    #[test]
    fn keyword_selectors() {
        assert_eq!(select(SCOPE, json!("this")), items(&[SCOPE]));
        assert_eq!(select(SCOPE, json!("actor")), vec![DocumentRef::Actor]);
        assert_eq!(select(SCOPE, json!("item")), items(&[RIFLE, SCOPE, SUPPRESSOR, ARMOR]));
        assert_eq!(select(SCOPE, json!("parent")), items(&[RIFLE]));
        assert_eq!(select(RIFLE, json!("parent")), vec![DocumentRef::Actor]);
        assert_eq!(select(SCOPE, json!("sibling")), items(&[SUPPRESSOR]));
        assert_eq!(select(RIFLE, json!("sibling")), items(&[ARMOR]));
    }

    #[test]
    fn object_selectors() {
        assert_eq!(select(SCOPE, json!({ "tag": "mod" })), items(&[SCOPE, SUPPRESSOR]));
        assert_eq!(select(SCOPE, json!({ "tag": "ghost" })), Vec::new());
        assert_eq!(select(SCOPE, json!({ "type": "apparel" })), items(&[ARMOR]));
        assert_eq!(select(SCOPE, json!({ "type": "character" })), vec![DocumentRef::Actor]);
        assert_eq!(select(SCOPE, json!({ "usesSkill": "guns" })), items(&[RIFLE]));
        assert_eq!(select(SCOPE, json!({ "usesSkill": "unarmed" })), Vec::new());
    }

    #[test]
    fn or_matches_any() {
        assert_eq!(
            select(SCOPE, json!({ "or": ["actor", { "tag": "rifle" }] })),
            vec![DocumentRef::Actor, DocumentRef::Item(RIFLE)]
        );
    }

    #[test]
    fn selector_list_is_a_union() {
        let graph = graph();
        let selectors: Vec<_> = [json!("parent"), json!("this"), json!("parent")]
            .iter()
            .map(|raw| DocumentSelector::new(SCOPE, &SelectorSource::from_json(raw)).unwrap())
            .collect();
        assert_eq!(
            DocumentSelector::select_all(&selectors, &graph),
            items(&[RIFLE, SCOPE])
        );
    }

    #[test]
    fn construction_errors() {
        let build = |raw: Value| DocumentSelector::new(SCOPE, &SelectorSource::from_json(&raw));

        assert_eq!(
            build(json!("owner")),
            Err(SelectorError::UnknownKeyword("owner".into()))
        );
        assert_eq!(
            build(json!({ "or": [{ "or": ["actor"] }] })),
            Err(SelectorError::NestedOr)
        );
        assert_eq!(
            build(json!({ "type": "vehicle" })),
            Err(SelectorError::UnknownSubtype("vehicle".into()))
        );
        assert_eq!(
            build(json!({ "usesSkill": "cooking" })),
            Err(SelectorError::UnknownSkill("cooking".into()))
        );
        assert!(matches!(
            build(json!({ "tag": "a", "type": "weapon" })),
            Err(SelectorError::Malformed(_))
        ));
        assert!(matches!(build(json!(3)), Err(SelectorError::Malformed(_))));
    }

    #[test]
    fn source_round_trips_to_json() {
        let raw = json!({ "or": ["actor", { "usesSkill": "guns" }] });
        assert_eq!(SelectorSource::from_json(&raw).to_json(), raw);
        assert_eq!(SelectorSource::from("actor").to_string(), "\"actor\"");
    }
}
