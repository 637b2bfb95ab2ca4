//! Core types for mutation events.

use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Field values carried by an added or changed document.
pub type Fields = serde_json::Map<String, serde_json::Value>;

/// Ordered subscription arguments.
pub type Params = Vec<serde_json::Value>;

/// Identifier of a document within a collection.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DocumentId(pub String);

impl DocumentId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "DocumentId({})", self.0)
    }
}

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for DocumentId {
    fn from(s: &str) -> Self {
        DocumentId(s.to_string())
    }
}

impl From<String> for DocumentId {
    fn from(s: String) -> Self {
        DocumentId(s)
    }
}

/// What happened to a document.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MutationKind {
    /// Document entered the local view.
    Added {
        #[serde(default)]
        fields: Option<Fields>,
    },

    /// Some fields were set and others cleared.
    Changed {
        #[serde(default)]
        fields: Option<Fields>,
        /// Names of fields removed from the document.
        #[serde(default)]
        cleared: Option<Vec<String>>,
    },

    /// Document left the local view.
    Removed,
}

/// A single remote mutation, as emitted by the protocol engine.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MutationEvent {
    /// Target collection name.
    pub collection: String,

    /// Target document.
    pub id: DocumentId,

    #[serde(flatten)]
    pub kind: MutationKind,
}

impl MutationEvent {
    pub fn added(collection: impl Into<String>, id: impl Into<DocumentId>, fields: Option<Fields>) -> Self {
        Self {
            collection: collection.into(),
            id: id.into(),
            kind: MutationKind::Added { fields },
        }
    }

    pub fn changed(
        collection: impl Into<String>,
        id: impl Into<DocumentId>,
        fields: Option<Fields>,
        cleared: Option<Vec<String>>,
    ) -> Self {
        Self {
            collection: collection.into(),
            id: id.into(),
            kind: MutationKind::Changed { fields, cleared },
        }
    }

    pub fn removed(collection: impl Into<String>, id: impl Into<DocumentId>) -> Self {
        Self {
            collection: collection.into(),
            id: id.into(),
            kind: MutationKind::Removed,
        }
    }

    /// Parse an event from its JSON form.
    pub fn from_json(s: &str) -> Result<Self> {
        Ok(serde_json::from_str(s)?)
    }

    /// Short label for logging.
    pub fn kind_name(&self) -> &'static str {
        match self.kind {
            MutationKind::Added { .. } => "added",
            MutationKind::Changed { .. } => "changed",
            MutationKind::Removed => "removed",
        }
    }
}
