//! Shared test engine.

#![allow(dead_code)]

use collection_sync::{
    ConnectCallback, EngineListener, LoginCallback, ProtocolEngine, SubscriptionId, SyncError,
};
use parking_lot::Mutex;
use serde_json::{json, Value};
use std::sync::Weak;

/// Records every call and answers synchronously.
#[derive(Default)]
pub struct RecordingEngine {
    pub connects: Mutex<Vec<String>>,
    pub subscribes: Mutex<Vec<(SubscriptionId, String, Option<Vec<Value>>)>>,
    pub unsubscribes: Mutex<Vec<SubscriptionId>>,
    pub logins: Mutex<Vec<(String, String)>>,
    /// When set, logins fail with this message.
    pub reject_login: Mutex<Option<String>>,
    /// When set, every subscription is signalled ready before `subscribe` returns.
    pub ready_listener: Mutex<Option<Weak<dyn EngineListener>>>,
}

impl RecordingEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn last_subscription(&self) -> Option<SubscriptionId> {
        self.subscribes.lock().last().map(|(id, _, _)| id.clone())
    }
}

impl ProtocolEngine for RecordingEngine {
    fn connect(&self, url: &str, on_connected: ConnectCallback) {
        self.connects.lock().push(url.to_string());
        on_connected("session-1".to_string());
    }

    fn subscribe(&self, id: &SubscriptionId, name: &str, params: Option<&[Value]>) {
        self.subscribes
            .lock()
            .push((id.clone(), name.to_string(), params.map(|p| p.to_vec())));

        let listener = self.ready_listener.lock().as_ref().and_then(Weak::upgrade);
        if let Some(listener) = listener {
            listener.subscription_ready(id);
        }
    }

    fn unsubscribe(&self, id: &SubscriptionId) {
        self.unsubscribes.lock().push(id.clone());
    }

    fn login_with_password(&self, email: &str, password: &str, on_result: LoginCallback) {
        self.logins.lock().push((email.to_string(), password.to_string()));
        let rejection = self.reject_login.lock().clone();
        match rejection {
            Some(reason) => on_result(Err(SyncError::Login(reason))),
            None => on_result(Ok(json!({ "id": "user-1", "token": "t" }))),
        }
    }
}
