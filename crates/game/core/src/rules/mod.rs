//! Declarative rules attached to items.
//!
//! # Architecture
//!
//! ```text
//! ItemSource.rules.sources (raw JSON)
//!        │ hydrate: schema check (stage 1), shape check (stage 2)
//!        ▼
//!   RuleElement ── DocumentSelector[] ──► targets in the DocumentGraph
//!        │ apply: target check (stage 3), conditions, Mutation
//!        ▼
//!   RuleElementMessage[] ──MessageFormatter──► RuleReport
//! ```
//!
//! Rule kinds are a closed enum ([`RuleKind`]); persisted `type` identifiers
//! resolve through a [`RuleTypeRegistry`] passed in by the caller.

mod condition;
mod element;
mod hook;
mod kind;
mod message;
mod selector;
mod source;
mod value;

pub use condition::Condition;
pub use element::{RuleElement, RuleReport, RuleState};
pub use hook::HookPhase;
pub use kind::{RuleKind, RuleTypeRegistry, ValueKind};
pub use message::{MessageFormatter, MessageKind, RuleElementMessage, Severity, TemplateCatalog};
pub use selector::{DocumentSelector, SelectorError, SelectorKind, SelectorSource};
pub use source::{RuleElementSource, is_disabled};
pub use value::RuleValue;
