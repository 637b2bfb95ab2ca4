//! Collection handlers: the receiving end of mutation dispatch.

use crate::types::Fields;
use parking_lot::RwLock;
use std::sync::Arc;

/// Anything that reacts to document mutations for one collection.
///
/// Every method defaults to a no-op, so an implementation only overrides the
/// notifications it cares about. Methods are invoked on the UI context.
pub trait CollectionHandler: Send + Sync {
    fn document_was_added(&self, _collection: &str, _id: &str, _fields: Option<&Fields>) {}

    fn document_was_changed(
        &self,
        _collection: &str,
        _id: &str,
        _fields: Option<&Fields>,
        _cleared: Option<&[String]>,
    ) {
    }

    fn document_was_removed(&self, _collection: &str, _id: &str) {}
}

/// Callback invoked when a document is added.
pub type AddedCallback = Arc<dyn Fn(&str, &str, Option<&Fields>) + Send + Sync>;

/// Callback invoked when a document is changed.
pub type ChangedCallback = Arc<dyn Fn(&str, &str, Option<&Fields>, Option<&[String]>) + Send + Sync>;

/// Callback invoked when a document is removed.
pub type RemovedCallback = Arc<dyn Fn(&str, &str) + Send + Sync>;

/// Closure-backed slots; empty slots are no-ops.
#[derive(Default)]
struct CallbackSlots {
    on_added: Option<AddedCallback>,
    on_changed: Option<ChangedCallback>,
    on_removed: Option<RemovedCallback>,
}

/// A handler driven by optional callback closures.
///
/// Callbacks can be attached before or after registration; a slot that is
/// unset makes the matching notification a no-op.
pub struct Collection {
    name: String,
    slots: RwLock<CallbackSlots>,
}

impl Collection {
    /// Create a collection handler with empty callback slots.
    pub fn new(name: impl Into<String>) -> Arc<Self> {
        Arc::new(Self {
            name: name.into(),
            slots: RwLock::new(CallbackSlots::default()),
        })
    }

    /// Name this collection was created with.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Set the callback for added documents, replacing any previous one.
    pub fn set_on_added<F>(&self, f: F)
    where
        F: Fn(&str, &str, Option<&Fields>) + Send + Sync + 'static,
    {
        self.slots.write().on_added = Some(Arc::new(f));
    }

    /// Set the callback for changed documents, replacing any previous one.
    pub fn set_on_changed<F>(&self, f: F)
    where
        F: Fn(&str, &str, Option<&Fields>, Option<&[String]>) + Send + Sync + 'static,
    {
        self.slots.write().on_changed = Some(Arc::new(f));
    }

    /// Set the callback for removed documents, replacing any previous one.
    pub fn set_on_removed<F>(&self, f: F)
    where
        F: Fn(&str, &str) + Send + Sync + 'static,
    {
        self.slots.write().on_removed = Some(Arc::new(f));
    }

    /// Detach all callbacks.
    pub fn clear_callbacks(&self) {
        *self.slots.write() = CallbackSlots::default();
    }
}

impl CollectionHandler for Collection {
    fn document_was_added(&self, collection: &str, id: &str, fields: Option<&Fields>) {
        // Cloned out so a callback may replace slots without deadlocking.
        let added = self.slots.read().on_added.clone();
        if let Some(added) = added {
            added(collection, id, fields);
        }
    }

    fn document_was_changed(
        &self,
        collection: &str,
        id: &str,
        fields: Option<&Fields>,
        cleared: Option<&[String]>,
    ) {
        let changed = self.slots.read().on_changed.clone();
        if let Some(changed) = changed {
            changed(collection, id, fields, cleared);
        }
    }

    fn document_was_removed(&self, collection: &str, id: &str) {
        let removed = self.slots.read().on_removed.clone();
        if let Some(removed) = removed {
            removed(collection, id);
        }
    }
}

impl std::fmt::Debug for Collection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Collection").field("name", &self.name).finish_non_exhaustive()
    }
}
