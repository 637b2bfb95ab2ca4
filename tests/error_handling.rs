//! Error handling and edge case tests.

mod common;

use collection_sync::{
    ui_context, ChangeDispatcher, Client, ClientConfig, Collection, CollectionRegistry,
    DuplicatePolicy, EngineListener, Fields, RegistryConfig, SubscriptionId, SyncError,
};
use common::RecordingEngine;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

// --- Unknown Collections ---

#[test]
fn test_changed_for_unknown_collection() {
    let registry = CollectionRegistry::new();
    let (ui, queue) = ui_context();
    let dispatcher = ChangeDispatcher::new(registry.clone(), ui);

    let posts = Collection::new("posts");
    let hits = Arc::new(AtomicUsize::new(0));
    let counter = hits.clone();
    posts.set_on_changed(move |_, _, _, _| {
        counter.fetch_add(1, Ordering::SeqCst);
    });
    let _reg = registry.register("posts", posts.clone()).unwrap();

    // Should be dropped, not error
    assert!(!dispatcher.on_document_changed("unknown", "1", Some(Fields::new()), None));

    assert_eq!(queue.run_pending(), 0);
    assert_eq!(hits.load(Ordering::SeqCst), 0);
}

#[test]
fn test_events_after_release_are_dropped() {
    let registry = CollectionRegistry::new();
    let (ui, queue) = ui_context();
    let dispatcher = ChangeDispatcher::new(registry.clone(), ui);

    let posts = Collection::new("posts");
    let reg = registry.register("posts", posts.clone()).unwrap();
    assert!(reg.release());

    assert!(registry.lookup("posts").is_none());
    assert!(!dispatcher.on_document_added("posts", "1", None));
    assert!(!dispatcher.on_document_removed("posts", "1"));
    assert_eq!(queue.run_pending(), 0);
}

// --- Readiness ---

#[test]
fn test_ready_for_unknown_subscription() {
    let engine = Arc::new(RecordingEngine::new());
    let (ui, _queue) = ui_context();
    let client = Client::new(ClientConfig::default(), engine, ui);

    // Should be a no-op
    client.subscription_ready(&SubscriptionId::from("never-issued"));
    assert_eq!(client.subscriptions().subscription_count(), 0);
}

// --- Callback Failures ---

#[test]
fn test_panicking_callback_is_isolated() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();

    let registry = CollectionRegistry::new();
    let (ui, queue) = ui_context();
    let dispatcher = ChangeDispatcher::new(registry.clone(), ui);

    let posts = Collection::new("posts");
    let hits = Arc::new(AtomicUsize::new(0));
    let counter = hits.clone();
    posts.set_on_added(move |_, id, _| {
        if id == "bad" {
            panic!("handler failed");
        }
        counter.fetch_add(1, Ordering::SeqCst);
    });
    let _reg = registry.register("posts", posts.clone()).unwrap();

    dispatcher.on_document_added("posts", "1", None);
    dispatcher.on_document_added("posts", "bad", None);
    dispatcher.on_document_added("posts", "2", None);

    assert_eq!(queue.run_pending(), 3);
    assert_eq!(queue.panic_count(), 1);
    assert_eq!(hits.load(Ordering::SeqCst), 2);

    // Registry and dispatcher remain usable.
    assert!(registry.contains("posts"));
    assert!(dispatcher.on_document_added("posts", "3", None));
    queue.run_pending();
    assert_eq!(hits.load(Ordering::SeqCst), 3);
}

// --- Duplicate Registration ---

#[test]
fn test_reject_duplicate_registration() {
    let engine = Arc::new(RecordingEngine::new());
    let (ui, _queue) = ui_context();
    let client = Client::new(
        ClientConfig {
            registry: RegistryConfig {
                duplicate_policy: DuplicatePolicy::Reject,
            },
            ..Default::default()
        },
        engine,
        ui,
    );

    let (_posts, _reg) = client.collection("posts").unwrap();
    let result = client.collection("posts");

    assert!(matches!(result, Err(SyncError::DuplicateRegistration(_))));
}

#[test]
fn test_replace_is_default_policy() {
    let registry = CollectionRegistry::new();
    assert_eq!(registry.config().duplicate_policy, DuplicatePolicy::Replace);

    let first = Collection::new("posts");
    let second = Collection::new("posts");
    let _a = registry.register("posts", first.clone()).unwrap();
    let _b = registry.register("posts", second.clone()).unwrap();

    assert_eq!(registry.len(), 1);
}

// --- UI Context ---

#[test]
fn test_dispatch_after_ui_queue_gone() {
    let registry = CollectionRegistry::new();
    let (ui, queue) = ui_context();
    let dispatcher = ChangeDispatcher::new(registry.clone(), ui);
    let posts = Collection::new("posts");
    let _reg = registry.register("posts", posts.clone()).unwrap();

    drop(queue);

    // Dropped quietly; the engine thread never sees an error.
    assert!(!dispatcher.on_document_added("posts", "1", None));
}

// --- Login ---

#[test]
fn test_rejected_login_does_not_panic() {
    let engine = Arc::new(RecordingEngine::new());
    *engine.reject_login.lock() = Some("bad password".to_string());
    let (ui, _queue) = ui_context();
    let client = Client::new(ClientConfig::default(), engine.clone(), ui);

    client.connect("ws://localhost:3000/websocket", "me@example.com", "wrong");

    assert_eq!(engine.logins.lock().len(), 1);
}
