//! Rule engine for derived character statistics.
//!
//! `wasteland-core` recomputes every derived number on an actor and its items
//! from their persisted sources. Items carry declarative rules; each pass
//! hydrates them into [`RuleElement`]s, validates them against the document
//! graph, and applies them phase by phase through [`engine::RuleEngine`].
//! Authoring mistakes surface as [`RuleElementMessage`]s, never as panics.
pub mod config;
pub mod document;
pub mod engine;
pub mod error;
pub mod rules;
pub mod stats;

pub use config::EngineConfig;
pub use document::{
    ActorDocument, ActorKind, ActorSource, DataObject, DataValue, DocumentGraph, DocumentId,
    DocumentRef, ItemDocument, ItemKind, ItemSource, ItemSystem, PropertyPath, ValueType,
};
pub use engine::{DerivedActor, DerivedItem, RuleEngine};
pub use error::{DerivationError, ErrorSeverity};
pub use rules::{
    Condition, DocumentSelector, HookPhase, MessageFormatter, MessageKind, RuleElement,
    RuleElementMessage, RuleElementSource, RuleKind, RuleReport, RuleState, RuleTypeRegistry,
    RuleValue, SelectorSource, Severity, TemplateCatalog,
};
pub use stats::{
    Bounds, Component, CompositeNumber, CompositeResource, DerivedStat, SkillName, SpecialName,
    SpecialValue,
};
