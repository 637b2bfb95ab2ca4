//! Subscription manager: issues subscriptions and fires ready callbacks.

use crate::engine::ProtocolEngine;
use crate::types::Params;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;

use super::types::{ReadyCallback, SubscriptionId, SubscriptionInfo, SubscriptionState};

/// Internal subscription state.
struct Subscription {
    name: String,
    params: Option<Params>,
    /// Taken on the first ready signal.
    ready_callback: Option<ReadyCallback>,
    state: SubscriptionState,
}

impl Subscription {
    fn info(&self, id: &SubscriptionId) -> SubscriptionInfo {
        SubscriptionInfo {
            id: id.clone(),
            name: self.name.clone(),
            params: self.params.clone(),
            state: self.state,
        }
    }
}

/// Tracks subscriptions by id and their optional ready callbacks.
pub struct SubscriptionManager {
    engine: Arc<dyn ProtocolEngine>,
    /// Active subscriptions by ID.
    subscriptions: Mutex<HashMap<SubscriptionId, Subscription>>,
}

impl SubscriptionManager {
    /// Create a manager that issues subscriptions through `engine`.
    pub fn new(engine: Arc<dyn ProtocolEngine>) -> Self {
        Self {
            engine,
            subscriptions: Mutex::new(HashMap::new()),
        }
    }

    /// Issue a subscription and return its id immediately.
    ///
    /// `name` is not a key: repeated calls create independent subscriptions.
    pub fn subscribe(
        &self,
        name: impl Into<String>,
        params: Option<Params>,
        callback: Option<ReadyCallback>,
    ) -> SubscriptionId {
        let name = name.into();
        let id = SubscriptionId::generate();

        // Recorded before the engine sees the id, so an immediate ready
        // signal finds its callback.
        self.subscriptions.lock().insert(
            id.clone(),
            Subscription {
                name: name.clone(),
                params: params.clone(),
                ready_callback: callback,
                state: SubscriptionState::Pending,
            },
        );

        tracing::debug!(subscription = %id, name = %name, "subscription.subscribe");
        self.engine.subscribe(&id, &name, params.as_deref());

        id
    }

    /// Handle the engine's ready signal. Returns whether a callback ran.
    ///
    /// Repeated or unknown ids are no-ops.
    pub fn on_ready(&self, id: &SubscriptionId) -> bool {
        let callback = {
            let mut subs = self.subscriptions.lock();
            match subs.get_mut(id) {
                Some(sub) => {
                    sub.state = SubscriptionState::Ready;
                    sub.ready_callback.take()
                }
                None => None,
            }
        };

        match callback {
            Some(callback) => {
                tracing::debug!(subscription = %id, "subscription.ready");
                callback();
                true
            }
            None => {
                tracing::debug!(subscription = %id, "subscription.ready.ignored");
                false
            }
        }
    }

    /// Stop a subscription. Returns false if the id was unknown.
    pub fn unsubscribe(&self, id: &SubscriptionId) -> bool {
        let removed = self.subscriptions.lock().remove(id).is_some();
        if removed {
            tracing::debug!(subscription = %id, "subscription.unsubscribe");
            self.engine.unsubscribe(id);
        }
        removed
    }

    /// Whether the engine has signalled ready for `id`.
    pub fn is_ready(&self, id: &SubscriptionId) -> bool {
        self.subscriptions
            .lock()
            .get(id)
            .map(|sub| sub.state == SubscriptionState::Ready)
            .unwrap_or(false)
    }

    /// Snapshot of a subscription.
    pub fn info(&self, id: &SubscriptionId) -> Option<SubscriptionInfo> {
        self.subscriptions.lock().get(id).map(|sub| sub.info(id))
    }

    /// Get subscription count.
    pub fn subscription_count(&self) -> usize {
        self.subscriptions.lock().len()
    }

    /// Get the engine subscriptions are issued through.
    pub fn engine(&self) -> &Arc<dyn ProtocolEngine> {
        &self.engine
    }
}
