//! Common error infrastructure for wasteland-core.
//!
//! Authoring mistakes in rule sources are never errors in the Rust sense: they
//! are collected as [`RuleElementMessage`](crate::rules::RuleElementMessage)s
//! on the rule element. The types here cover the failures that make a
//! derivation pass meaningless, such as a corrupted document graph.
//!
//! # Design Principles
//!
//! - **Type Safety**: Each failure has its own variant with the offending ids
//! - **Severity Classification**: Errors are categorized for recovery strategies
//! - **No Panics**: Invariant violations are returned, not unwrapped

use crate::document::{DocumentId, DocumentRef, PropertyPath};

/// Severity level of an error, used for categorization and recovery strategies.
///
/// - **Validation**: The persisted input is inconsistent and must be fixed by the host
/// - **Internal**: The engine broke one of its own invariants; indicates a bug
/// - **Fatal**: The pass cannot produce any usable output
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ErrorSeverity {
    /// Invalid persisted input, should not retry without changes.
    ///
    /// Examples: duplicate item ids, dangling container reference
    Validation,

    /// Unexpected state inconsistency inside the engine.
    ///
    /// Examples: a mutation failed on a target that passed validation
    Internal,

    /// Document graph cannot be built at all.
    ///
    /// Examples: container cycle
    Fatal,
}

impl ErrorSeverity {
    /// Returns a human-readable description of this severity level.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Validation => "validation",
            Self::Internal => "internal",
            Self::Fatal => "fatal",
        }
    }

    /// Returns true if this error indicates an internal bug.
    pub const fn is_internal(&self) -> bool {
        matches!(self, Self::Internal | Self::Fatal)
    }
}

/// Hard failures of a derivation pass.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum DerivationError {
    /// Two items in one graph share an id.
    #[error("duplicate item id {id} in document graph")]
    DuplicateItem { id: DocumentId },

    /// An item names a container that is not part of the graph.
    #[error("item {item} is contained in unknown item {container}")]
    UnknownContainer {
        item: DocumentId,
        container: DocumentId,
    },

    /// Following container links from an item leads back to it.
    #[error("item {item} is part of a container cycle")]
    ContainerCycle { item: DocumentId },

    /// A document the pass started with is gone from the graph.
    #[error("{document} is missing from the document graph")]
    MissingDocument { document: DocumentRef },

    /// A mutation could not be written to a target that passed validation.
    #[error("rule {index} of item {item} failed to write {path}")]
    MutationFailed {
        item: DocumentId,
        index: usize,
        path: PropertyPath,
    },
}

impl DerivationError {
    /// Returns the severity level of this error.
    pub fn severity(&self) -> ErrorSeverity {
        use DerivationError::*;
        match self {
            DuplicateItem { .. } | UnknownContainer { .. } => ErrorSeverity::Validation,
            ContainerCycle { .. } => ErrorSeverity::Fatal,
            MissingDocument { .. } | MutationFailed { .. } => ErrorSeverity::Internal,
        }
    }

    /// Returns a static string identifier for this error variant.
    pub fn error_code(&self) -> &'static str {
        use DerivationError::*;
        match self {
            DuplicateItem { .. } => "DERIVE_DUPLICATE_ITEM",
            UnknownContainer { .. } => "DERIVE_UNKNOWN_CONTAINER",
            ContainerCycle { .. } => "DERIVE_CONTAINER_CYCLE",
            MissingDocument { .. } => "DERIVE_MISSING_DOCUMENT",
            MutationFailed { .. } => "DERIVE_MUTATION_FAILED",
        }
    }
}
