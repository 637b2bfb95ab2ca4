//! # Collection Sync
//!
//! Client-side routing of remote document mutations into named local
//! collections, with ordered delivery on a single UI context.
//!
//! ## Core Concepts
//!
//! - **Collections**: Handlers registered by name; at most one live handler per name
//! - **Dispatch**: Engine mutations resolved by collection and queued FIFO onto the UI context
//! - **Subscriptions**: Requests issued to the engine, each with an optional once-only ready callback
//! - **Engine**: The external protocol engine, seen only through two traits
//!
//! ## Example
//!
//! ```ignore
//! use collection_sync::{ui_context, Client, ClientConfig};
//!
//! let (ui, queue) = ui_context();
//! let client = Arc::new(Client::new(ClientConfig::default(), engine, ui));
//!
//! // Register a collection; dropping `_reg` unregisters it.
//! let (posts, _reg) = client.collection("posts")?;
//! posts.set_on_added(|_, id, fields| println!("post {} {:?}", id, fields));
//!
//! client.subscribe_with_callback("posts.all", || println!("ready"));
//! client.connect("wss://example.com/websocket", "me@example.com", "secret");
//!
//! // On the UI thread:
//! queue.run_pending();
//! ```

pub mod client;
pub mod collections;
pub mod dispatch;
pub mod engine;
pub mod error;
pub mod subscriptions;
pub mod types;

// Re-exports
pub use client::{Client, ClientConfig};
pub use collections::{
    Collection, CollectionHandler, CollectionRegistry, DuplicatePolicy, Registration, RegistryConfig,
};
pub use dispatch::{ui_context, ChangeDispatcher, UiContext, UiQueue};
pub use engine::{ConnectCallback, EngineListener, LoginCallback, ProtocolEngine};
pub use error::{Result, SyncError};
pub use subscriptions::{
    ReadyCallback, SubscriptionId, SubscriptionInfo, SubscriptionManager, SubscriptionState,
};
pub use types::{DocumentId, Fields, MutationEvent, MutationKind, Params};
