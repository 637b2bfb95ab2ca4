//! Name-to-handler registry.

use crate::error::{Result, SyncError};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};

use super::handler::CollectionHandler;

/// What to do when a name already has a live handler.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DuplicatePolicy {
    /// The newer handler takes over the name.
    #[default]
    Replace,
    /// Registration fails with `SyncError::DuplicateRegistration`.
    Reject,
}

/// Registry configuration.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RegistryConfig {
    /// Applies both to a name that already has a handler and to a handler
    /// already registered under another name.
    pub duplicate_policy: DuplicatePolicy,
}

/// One slot in the registry.
struct Entry {
    /// Identifies which registration owns the slot.
    token: u64,
    /// Address of the handler, keys `Slots::by_handler`.
    addr: usize,
    /// The registry never keeps a handler alive on its own.
    handler: Weak<dyn CollectionHandler>,
}

impl Entry {
    fn is_live(&self) -> bool {
        self.handler.strong_count() > 0
    }
}

#[derive(Default)]
struct Slots {
    by_name: HashMap<String, Entry>,
    /// Each handler lives under at most one name.
    by_handler: HashMap<usize, String>,
}

impl Slots {
    /// Name a live handler is currently registered under.
    fn name_of(&self, addr: usize) -> Option<&String> {
        self.by_handler
            .get(&addr)
            .filter(|name| self.by_name.get(name.as_str()).map(Entry::is_live).unwrap_or(false))
    }

    fn remove(&mut self, name: &str) -> Option<Entry> {
        let entry = self.by_name.remove(name)?;
        if self.by_handler.get(&entry.addr).map(|n| n == name).unwrap_or(false) {
            self.by_handler.remove(&entry.addr);
        }
        Some(entry)
    }
}

struct RegistryInner {
    slots: RwLock<Slots>,
    next_token: AtomicU64,
    config: RegistryConfig,
}

fn handler_addr(handler: &Arc<dyn CollectionHandler>) -> usize {
    Arc::as_ptr(handler) as *const () as usize
}

/// Maps collection names to at most one live handler each.
///
/// Cloning is cheap and every clone sees the same mapping. The lock guards
/// only the map itself and is never held while a handler runs.
#[derive(Clone)]
pub struct CollectionRegistry {
    inner: Arc<RegistryInner>,
}

impl CollectionRegistry {
    /// Create an empty registry with the default `Replace` policy.
    pub fn new() -> Self {
        Self::with_config(RegistryConfig::default())
    }

    /// Create an empty registry with the given policy.
    pub fn with_config(config: RegistryConfig) -> Self {
        Self {
            inner: Arc::new(RegistryInner {
                slots: RwLock::new(Slots::default()),
                next_token: AtomicU64::new(1),
                config,
            }),
        }
    }

    /// Get the registry configuration.
    pub fn config(&self) -> &RegistryConfig {
        &self.inner.config
    }

    /// Register `handler` under `name`.
    ///
    /// A handler lives under one name at a time: registering it under a new
    /// name moves it there. The returned guard removes the mapping when
    /// released or dropped. Under `DuplicatePolicy::Replace` this never fails.
    pub fn register(&self, name: impl Into<String>, handler: Arc<dyn CollectionHandler>) -> Result<Registration> {
        let name = name.into();
        let addr = handler_addr(&handler);
        let token = self.inner.next_token.fetch_add(1, Ordering::Relaxed);

        {
            let mut slots = self.inner.slots.write();
            let reject = self.inner.config.duplicate_policy == DuplicatePolicy::Reject;

            let previous = slots.name_of(addr).filter(|prev| **prev != name).cloned();
            if let Some(previous) = previous {
                if reject {
                    return Err(SyncError::HandlerRegistered(previous));
                }
                tracing::debug!(collection = %name, from = %previous, "registry.move");
                slots.remove(&previous);
            }

            let occupied = slots.by_name.get(&name).map(Entry::is_live).unwrap_or(false);
            if occupied {
                if reject {
                    return Err(SyncError::DuplicateRegistration(name));
                }
                tracing::debug!(collection = %name, "registry.replace");
            }

            slots.remove(&name);
            slots.by_name.insert(
                name.clone(),
                Entry {
                    token,
                    addr,
                    handler: Arc::downgrade(&handler),
                },
            );
            slots.by_handler.insert(addr, name.clone());
        }

        tracing::debug!(collection = %name, token, "registry.register");

        Ok(Registration {
            registry: Arc::downgrade(&self.inner),
            name,
            token,
            active: true,
        })
    }

    /// Current handler for `name`, if one is registered and still alive.
    pub fn lookup(&self, name: &str) -> Option<Arc<dyn CollectionHandler>> {
        self.inner.slots.read().by_name.get(name).and_then(|entry| entry.handler.upgrade())
    }

    /// Name `handler` is currently registered under.
    pub fn name_of(&self, handler: &Arc<dyn CollectionHandler>) -> Option<String> {
        self.inner.slots.read().name_of(handler_addr(handler)).cloned()
    }

    /// Whether `name` has a live handler.
    pub fn contains(&self, name: &str) -> bool {
        self.lookup(name).is_some()
    }

    /// Names with a live handler.
    pub fn names(&self) -> Vec<String> {
        self.inner
            .slots
            .read()
            .by_name
            .iter()
            .filter(|(_, entry)| entry.is_live())
            .map(|(name, _)| name.clone())
            .collect()
    }

    /// Number of names with a live handler.
    pub fn len(&self) -> usize {
        self.inner
            .slots
            .read()
            .by_name
            .values()
            .filter(|entry| entry.is_live())
            .count()
    }

    /// Whether no name has a live handler.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for CollectionRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl RegistryInner {
    /// Remove `name` only if the slot still belongs to `token`.
    fn unregister(&self, name: &str, token: u64) -> bool {
        let mut slots = self.slots.write();
        let ours = slots.by_name.get(name).map(|entry| entry.token == token).unwrap_or(false);
        ours && slots.remove(name).is_some()
    }

    /// Whether `token` holds `name` and its handler is still alive.
    fn owns(&self, name: &str, token: u64) -> bool {
        self.slots
            .read()
            .by_name
            .get(name)
            .map(|entry| entry.token == token && entry.is_live())
            .unwrap_or(false)
    }
}

/// Scoped ownership of a registry slot.
///
/// Dropping the guard unregisters the handler, unless another registration
/// has since replaced it under the same name.
#[must_use = "dropping a Registration unregisters the collection immediately"]
pub struct Registration {
    registry: Weak<RegistryInner>,
    name: String,
    token: u64,
    active: bool,
}

impl Registration {
    /// Name this registration was made under.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Whether this registration still owns its name with a live handler.
    pub fn is_active(&self) -> bool {
        self.active
            && self
                .registry
                .upgrade()
                .map(|inner| inner.owns(&self.name, self.token))
                .unwrap_or(false)
    }

    /// Unregister now. Returns whether the slot was still ours to remove.
    pub fn release(mut self) -> bool {
        self.unregister()
    }

    fn unregister(&mut self) -> bool {
        if !std::mem::replace(&mut self.active, false) {
            return false;
        }

        let Some(inner) = self.registry.upgrade() else {
            return false;
        };

        let removed = inner.unregister(&self.name, self.token);
        tracing::debug!(collection = %self.name, token = self.token, removed, "registry.unregister");
        removed
    }
}

impl Drop for Registration {
    fn drop(&mut self) {
        self.unregister();
    }
}

impl std::fmt::Debug for Registration {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Registration")
            .field("name", &self.name)
            .field("token", &self.token)
            .field("active", &self.active)
            .finish()
    }
}
