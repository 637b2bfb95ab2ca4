//! Collection handlers and the registry that names them.
//!
//! A handler is anything implementing [`CollectionHandler`]. [`Collection`]
//! is the closure-backed implementation; custom types can implement the
//! trait directly. Registering returns a [`Registration`] guard that owns the
//! name until it is released or dropped.

mod handler;
mod registry;

pub use handler::{AddedCallback, ChangedCallback, Collection, CollectionHandler, RemovedCallback};
pub use registry::{CollectionRegistry, DuplicatePolicy, Registration, RegistryConfig};
