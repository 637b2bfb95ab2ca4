//! Change dispatch onto the UI context.
//!
//! The engine calls into [`ChangeDispatcher`] from its own thread. Each event
//! is resolved against the [`CollectionRegistry`](crate::CollectionRegistry)
//! there, then posted to a single FIFO queue whose consumer is the UI context:
//!
//! ```text
//! engine thread ──► ChangeDispatcher::dispatch
//!                       ├─► registry.lookup(collection) ── None ──► drop
//!                       └─► UiContext::post ──► [FIFO] ──► UiQueue ──► handler.document_was_*()
//! ```
//!
//! # Example
//!
//! ```ignore
//! let registry = CollectionRegistry::new();
//! let (ui, queue) = ui_context();
//! let dispatcher = ChangeDispatcher::new(registry.clone(), ui);
//!
//! let posts = Collection::new("posts");
//! posts.set_on_added(|_, id, _| println!("added {}", id));
//! let _reg = registry.register("posts", posts.clone())?;
//!
//! dispatcher.on_document_added("posts", "42", None);
//! queue.run_pending();
//! ```

mod dispatcher;
mod ui;

pub use dispatcher::ChangeDispatcher;
pub use ui::{ui_context, UiContext, UiQueue};
