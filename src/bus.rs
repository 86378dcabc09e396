//! In-process message bus standing in for the host's IPC channel.
//!
//! Handlers register on a named channel and receive every message emitted
//! on it. Registration returns a [`Subscription`]; dropping it removes the
//! handler, so a listener never outlives the scope that owns the guard.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use serde::Deserialize;
use serde_json::Value;

/// Channel the overlay listens on.
pub const MSG_CHANNEL: &str = "msg";

/// One message from the host process.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct HostMessage {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub data: Value,
}

type Handler = Arc<dyn Fn(&HostMessage) + Send + Sync>;

#[derive(Default)]
struct Registry {
    listeners: HashMap<u64, (String, Handler)>,
}

#[derive(Clone, Default)]
pub struct MessageBus {
    registry: Arc<Mutex<Registry>>,
    next_id: Arc<AtomicU64>,
}

impl MessageBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `handler` on `channel` until the returned guard is dropped.
    #[must_use = "dropping the subscription unregisters the handler"]
    pub fn on<F>(&self, channel: &str, handler: F) -> Subscription
    where
        F: Fn(&HostMessage) + Send + Sync + 'static,
    {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        self.lock()
            .listeners
            .insert(id, (channel.to_string(), Arc::new(handler)));
        Subscription {
            id,
            registry: Arc::clone(&self.registry),
        }
    }

    /// Deliver `message` to every handler on `channel`. Returns how many
    /// handlers saw it.
    ///
    /// Handlers run with the registry unlocked, so one may subscribe or drop
    /// its own guard while handling. The set of receivers is fixed when the
    /// emit starts.
    pub fn emit(&self, channel: &str, message: &HostMessage) -> usize {
        let handlers: Vec<Handler> = self
            .lock()
            .listeners
            .values()
            .filter(|(c, _)| c == channel)
            .map(|(_, handler)| Arc::clone(handler))
            .collect();
        for handler in &handlers {
            handler(message);
        }
        handlers.len()
    }

    pub fn listener_count(&self, channel: &str) -> usize {
        self.lock()
            .listeners
            .values()
            .filter(|(c, _)| c == channel)
            .count()
    }

    fn lock(&self) -> MutexGuard<'_, Registry> {
        // A handler that panicked leaves the map itself intact.
        self.registry.lock().unwrap_or_else(|e| e.into_inner())
    }
}

/// Live registration on a [`MessageBus`]. Unregisters on drop.
pub struct Subscription {
    id: u64,
    registry: Arc<Mutex<Registry>>,
}

impl Drop for Subscription {
    fn drop(&mut self) {
        let mut registry = self.registry.lock().unwrap_or_else(|e| e.into_inner());
        registry.listeners.remove(&self.id);
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription").field("id", &self.id).finish()
    }
}
