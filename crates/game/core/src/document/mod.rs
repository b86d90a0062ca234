//! Actor and item documents, their data trees, and the graph a pass owns.
//!
//! Persisted sources ([`ActorSource`], [`ItemSource`]) are never written.
//! Each pass prepares fresh [`ActorDocument`]s and [`ItemDocument`]s from them
//! and assembles a [`DocumentGraph`].

mod actor;
mod data;
mod graph;
mod id;
mod item;
mod path;
mod source;

pub use actor::ActorDocument;
pub use data::{DataObject, DataValue, PathMiss, ValueType};
pub use graph::{DocumentGraph, DocumentView, Mutation, MutationError};
pub use id::{DocumentId, DocumentKind, DocumentRef};
pub use item::ItemDocument;
pub use path::{PathError, PropertyPath};
pub use source::{
    ActorKind, ActorSource, ApparelSource, ItemKind, ItemSource, ItemSystem, MiscSource,
    ResourceSource, RulesBlock, WeaponSource,
};
