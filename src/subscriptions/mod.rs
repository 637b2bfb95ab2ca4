//! Subscription bookkeeping.
//!
//! [`SubscriptionManager`] forwards subscribe requests to the protocol
//! engine and keeps one entry per subscription id:
//! - ids are generated locally and returned without waiting on the network
//! - an optional ready callback fires at most once, on the first ready signal
//! - duplicate or unknown ready signals are ignored
//!
//! # Example
//!
//! ```ignore
//! let manager = SubscriptionManager::new(engine);
//!
//! let id = manager.subscribe("posts.all", None, Some(Box::new(|| println!("ready"))));
//!
//! // Later, from the engine:
//! manager.on_ready(&id);
//! ```

mod manager;
mod types;

pub use manager::SubscriptionManager;
pub use types::{ReadyCallback, SubscriptionId, SubscriptionInfo, SubscriptionState};
