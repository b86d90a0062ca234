//! Command implementations for xtask
//!
//! Each command is a separate module that implements its own CLI args and execution logic.

mod derive;
mod report;
mod rule_types;
mod validate;

pub use derive::Derive;
pub use rule_types::RuleTypes;
pub use validate::Validate;
