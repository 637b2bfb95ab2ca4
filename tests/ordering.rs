//! Delivery ordering across the engine and UI threads.

use collection_sync::{
    ui_context, ChangeDispatcher, Collection, CollectionRegistry, MutationEvent, Registration,
};
use parking_lot::Mutex;
use proptest::prelude::*;
use std::sync::Arc;
use std::thread;

const COLLECTIONS: [&str; 3] = ["posts", "comments", "users"];

/// Registers a recording collection for each name; returns the shared log.
fn recording_collections(
    registry: &CollectionRegistry,
) -> (Arc<Mutex<Vec<(String, String, &'static str)>>>, Vec<Registration>, Vec<Arc<Collection>>) {
    let log = Arc::new(Mutex::new(Vec::new()));
    let mut registrations = Vec::new();
    let mut collections = Vec::new();

    for name in COLLECTIONS {
        let collection = Collection::new(name);

        let sink = log.clone();
        collection.set_on_added(move |c, id, _| sink.lock().push((c.to_string(), id.to_string(), "added")));
        let sink = log.clone();
        collection.set_on_changed(move |c, id, _, _| sink.lock().push((c.to_string(), id.to_string(), "changed")));
        let sink = log.clone();
        collection.set_on_removed(move |c, id| sink.lock().push((c.to_string(), id.to_string(), "removed")));

        registrations.push(registry.register(name, collection.clone()).unwrap());
        collections.push(collection);
    }

    (log, registrations, collections)
}

fn event_strategy() -> impl Strategy<Value = MutationEvent> {
    (0..COLLECTIONS.len(), 0..4u8, 0..3u8).prop_map(|(c, doc, kind)| {
        let collection = COLLECTIONS[c];
        let id = format!("doc-{}", doc);
        match kind {
            0 => MutationEvent::added(collection, id, None),
            1 => MutationEvent::changed(collection, id, None, None),
            _ => MutationEvent::removed(collection, id),
        }
    })
}

#[test]
fn test_same_document_order_across_threads() {
    let registry = CollectionRegistry::new();
    let (ui, queue) = ui_context();
    let dispatcher = ChangeDispatcher::new(registry.clone(), ui);
    let (log, _registrations, _collections) = recording_collections(&registry);

    let ui_thread = queue.spawn("ui").unwrap();

    let engine = thread::spawn(move || {
        for _ in 0..500 {
            dispatcher.on_document_added("posts", "42", None);
            dispatcher.on_document_changed("posts", "42", None, None);
            dispatcher.on_document_removed("posts", "42");
        }
        // Dropping the dispatcher drops the last UiContext.
    });

    engine.join().unwrap();
    ui_thread.join().unwrap();

    let log = log.lock();
    assert_eq!(log.len(), 1500);
    for (i, (_, _, kind)) in log.iter().enumerate() {
        let expected = ["added", "changed", "removed"][i % 3];
        assert_eq!(*kind, expected, "event {} out of order", i);
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_delivery_matches_dispatch_order(events in prop::collection::vec(event_strategy(), 0..200)) {
        let registry = CollectionRegistry::new();
        let (ui, queue) = ui_context();
        let dispatcher = ChangeDispatcher::new(registry.clone(), ui);
        let (log, _registrations, _collections) = recording_collections(&registry);

        let expected: Vec<_> = events
            .iter()
            .map(|e| (e.collection.clone(), e.id.to_string(), e.kind_name()))
            .collect();

        let engine = thread::spawn(move || {
            for event in events {
                assert!(dispatcher.dispatch(event));
            }
        });
        engine.join().unwrap();

        queue.run_pending();
        prop_assert_eq!(&*log.lock(), &expected);
    }
}
