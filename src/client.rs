//! Client facade tying the registry, dispatcher and subscriptions together.

use crate::collections::{Collection, CollectionRegistry, Registration, RegistryConfig};
use crate::dispatch::{ChangeDispatcher, UiContext};
use crate::engine::{EngineListener, ProtocolEngine};
use crate::error::Result;
use crate::subscriptions::{ReadyCallback, SubscriptionId, SubscriptionManager};
use crate::types::{Fields, Params};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Client configuration.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Server endpoint passed to the engine on connect.
    pub url: String,

    /// Registry behaviour.
    pub registry: RegistryConfig,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            url: "ws://localhost:3000/websocket".to_string(),
            registry: RegistryConfig::default(),
        }
    }
}

/// Entry point for application code.
///
/// Owns one registry, one dispatcher and one subscription manager. Hand an
/// `Arc<Client>` to the engine as its [`EngineListener`].
pub struct Client {
    config: ClientConfig,
    engine: Arc<dyn ProtocolEngine>,
    registry: CollectionRegistry,
    dispatcher: ChangeDispatcher,
    subscriptions: SubscriptionManager,
}

impl Client {
    /// Create a client that talks to `engine` and delivers changes on `ui`.
    pub fn new(config: ClientConfig, engine: Arc<dyn ProtocolEngine>, ui: UiContext) -> Self {
        let registry = CollectionRegistry::with_config(config.registry.clone());
        let dispatcher = ChangeDispatcher::new(registry.clone(), ui);
        let subscriptions = SubscriptionManager::new(engine.clone());

        Self {
            config,
            engine,
            registry,
            dispatcher,
            subscriptions,
        }
    }

    /// Get the client configuration.
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Get the collection registry.
    pub fn registry(&self) -> &CollectionRegistry {
        &self.registry
    }

    /// Get the change dispatcher.
    pub fn dispatcher(&self) -> &ChangeDispatcher {
        &self.dispatcher
    }

    /// Get the subscription manager.
    pub fn subscriptions(&self) -> &SubscriptionManager {
        &self.subscriptions
    }

    // --- Subscriptions ---

    /// Subscribe by name with no params and no ready callback.
    pub fn subscribe(&self, name: &str) -> SubscriptionId {
        self.subscriptions.subscribe(name, None, None)
    }

    /// Subscribe by name with params.
    pub fn subscribe_with_params(&self, name: &str, params: Params) -> SubscriptionId {
        self.subscriptions.subscribe(name, Some(params), None)
    }

    /// Subscribe by name; `callback` runs once when the subscription is ready.
    pub fn subscribe_with_callback<F>(&self, name: &str, callback: F) -> SubscriptionId
    where
        F: FnOnce() + Send + 'static,
    {
        self.subscriptions.subscribe(name, None, Some(Box::new(callback)))
    }

    /// Subscribe with optional params and an optional ready callback.
    pub fn subscribe_with_params_and_callback(
        &self,
        name: &str,
        params: Option<Params>,
        callback: Option<ReadyCallback>,
    ) -> SubscriptionId {
        self.subscriptions.subscribe(name, params, callback)
    }

    /// Stop a subscription. Returns false if the id was unknown.
    pub fn unsubscribe(&self, id: &SubscriptionId) -> bool {
        self.subscriptions.unsubscribe(id)
    }

    // --- Collections ---

    /// Create a callback-backed collection and register it under `name`.
    ///
    /// The collection stays registered while both the returned `Arc` and the
    /// `Registration` are alive.
    pub fn collection(&self, name: &str) -> Result<(Arc<Collection>, Registration)> {
        let collection = Collection::new(name);
        let registration = self.registry.register(name, collection.clone())?;
        Ok((collection, registration))
    }

    // --- Connection ---

    /// Connect to the configured url, then log in with a password.
    pub fn connect_configured(&self, email: &str, password: &str) {
        let url = self.config.url.clone();
        self.connect(&url, email, password);
    }

    /// Connect to `url`, then log in with a password.
    ///
    /// Both steps complete asynchronously; a failed login is logged.
    pub fn connect(&self, url: &str, email: &str, password: &str) {
        let engine = self.engine.clone();
        let email = email.to_string();
        let password = password.to_string();

        tracing::info!(url = %url, "client.connect");
        self.engine.connect(
            url,
            Box::new(move |session: String| {
                tracing::debug!(session = %session, "client.connected");
                engine.login_with_password(
                    &email,
                    &password,
                    Box::new(|result: Result<serde_json::Value>| match result {
                        Ok(_) => tracing::info!("client.login"),
                        Err(err) => tracing::warn!(error = %err, "client.login.failed"),
                    }),
                );
            }),
        );
    }
}

impl EngineListener for Client {
    fn document_added(&self, collection: &str, id: &str, fields: Option<Fields>) {
        self.dispatcher.on_document_added(collection, id, fields);
    }

    fn document_changed(
        &self,
        collection: &str,
        id: &str,
        fields: Option<Fields>,
        cleared: Option<Vec<String>>,
    ) {
        self.dispatcher.on_document_changed(collection, id, fields, cleared);
    }

    fn document_removed(&self, collection: &str, id: &str) {
        self.dispatcher.on_document_removed(collection, id);
    }

    fn subscription_ready(&self, id: &SubscriptionId) {
        self.subscriptions.on_ready(id);
    }
}
