use core::fmt;

use serde::{Deserialize, Serialize};

/// Identifier of an actor or item document.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DocumentId(pub u32);

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Handle to a member of a document graph.
///
/// A graph holds at most one actor, so the actor needs no id.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DocumentRef {
    Actor,
    Item(DocumentId),
}

impl DocumentRef {
    pub const fn is_actor(&self) -> bool {
        matches!(self, Self::Actor)
    }

    pub const fn item_id(&self) -> Option<DocumentId> {
        match self {
            Self::Actor => None,
            Self::Item(id) => Some(*id),
        }
    }
}

impl fmt::Display for DocumentRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Actor => write!(f, "actor"),
            Self::Item(id) => write!(f, "item {id}"),
        }
    }
}

/// The two kinds of documents in a graph.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::AsRefStr)]
#[strum(serialize_all = "lowercase")]
pub enum DocumentKind {
    Actor,
    Item,
}
