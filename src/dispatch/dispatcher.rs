//! Routes engine mutations to registered collection handlers.

use crate::collections::{CollectionHandler, CollectionRegistry};
use crate::types::{DocumentId, Fields, MutationEvent, MutationKind};
use std::sync::Arc;

use super::ui::UiContext;

/// Resolves a handler for each mutation and delivers it on the UI context.
///
/// Entry points are called from the engine's thread and return without
/// waiting for delivery.
#[derive(Clone)]
pub struct ChangeDispatcher {
    registry: CollectionRegistry,
    ui: UiContext,
}

impl ChangeDispatcher {
    /// Create a dispatcher that resolves handlers in `registry` and runs them on `ui`.
    pub fn new(registry: CollectionRegistry, ui: UiContext) -> Self {
        Self { registry, ui }
    }

    /// Get the registry handlers are resolved from.
    pub fn registry(&self) -> &CollectionRegistry {
        &self.registry
    }

    /// Get the UI context deliveries are posted to.
    pub fn ui(&self) -> &UiContext {
        &self.ui
    }

    /// Queue an added notification. See [`ChangeDispatcher::dispatch`].
    pub fn on_document_added(&self, collection: &str, id: &str, fields: Option<Fields>) -> bool {
        self.dispatch(MutationEvent::added(collection, id, fields))
    }

    /// Queue a changed notification. See [`ChangeDispatcher::dispatch`].
    pub fn on_document_changed(
        &self,
        collection: &str,
        id: &str,
        fields: Option<Fields>,
        cleared: Option<Vec<String>>,
    ) -> bool {
        self.dispatch(MutationEvent::changed(collection, id, fields, cleared))
    }

    /// Queue a removed notification. See [`ChangeDispatcher::dispatch`].
    pub fn on_document_removed(&self, collection: &str, id: &str) -> bool {
        self.dispatch(MutationEvent::removed(collection, id))
    }

    /// Queue `event` for its collection's handler.
    ///
    /// Returns false when the event was dropped: no live handler for the
    /// collection, or the UI context is gone.
    pub fn dispatch(&self, event: MutationEvent) -> bool {
        let Some(handler) = self.registry.lookup(&event.collection) else {
            tracing::trace!(
                collection = %event.collection,
                id = %event.id,
                kind = event.kind_name(),
                "dispatch.unknown_collection"
            );
            return false;
        };

        let collection = event.collection.clone();
        let id = event.id.clone();
        let kind = event.kind_name();

        match self.ui.post(move || deliver(handler, event)) {
            Ok(()) => true,
            Err(err) => {
                tracing::warn!(collection = %collection, id = %id, kind, error = %err, "dispatch.dropped");
                false
            }
        }
    }
}

/// Runs on the UI context.
fn deliver(handler: Arc<dyn CollectionHandler>, event: MutationEvent) {
    let MutationEvent { collection, id, kind } = event;
    let DocumentId(id) = id;

    match kind {
        MutationKind::Added { fields } => {
            handler.document_was_added(&collection, &id, fields.as_ref());
        }
        MutationKind::Changed { fields, cleared } => {
            handler.document_was_changed(&collection, &id, fields.as_ref(), cleared.as_deref());
        }
        MutationKind::Removed => {
            handler.document_was_removed(&collection, &id);
        }
    }
}
