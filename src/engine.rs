//! Boundary with the protocol engine.
//!
//! The engine owns the connection, the wire format and reconnection. This
//! crate only calls [`ProtocolEngine`] and receives events through
//! [`EngineListener`].

use crate::error::Result;
use crate::subscriptions::SubscriptionId;
use crate::types::Fields;

/// Called once the transport is up, with the engine's session identifier.
pub type ConnectCallback = Box<dyn FnOnce(String) + Send + 'static>;

/// Called with the login outcome; `Ok` carries the engine's credentials payload.
pub type LoginCallback = Box<dyn FnOnce(Result<serde_json::Value>) + Send + 'static>;

/// Primitives consumed from the protocol engine.
pub trait ProtocolEngine: Send + Sync {
    fn connect(&self, url: &str, on_connected: ConnectCallback);

    /// Issue a subscription. Readiness arrives later via
    /// [`EngineListener::subscription_ready`].
    fn subscribe(&self, id: &SubscriptionId, name: &str, params: Option<&[serde_json::Value]>);

    fn unsubscribe(&self, id: &SubscriptionId);

    fn login_with_password(&self, email: &str, password: &str, on_result: LoginCallback);
}

/// Events the engine emits, on its own thread.
pub trait EngineListener: Send + Sync {
    fn document_added(&self, collection: &str, id: &str, fields: Option<Fields>);

    fn document_changed(
        &self,
        collection: &str,
        id: &str,
        fields: Option<Fields>,
        cleared: Option<Vec<String>>,
    );

    fn document_removed(&self, collection: &str, id: &str);

    fn subscription_ready(&self, id: &SubscriptionId);
}
