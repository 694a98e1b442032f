use domains_types::{AccountId, Amount};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::broadcast;

/// Notification published after a state transition has been fully applied.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RegistryEvent {
    Registered {
        label: String,
        owner: AccountId,
        payment: Amount,
    },
    RecordUpdated {
        label: String,
    },
    Withdrawn {
        to: AccountId,
        amount: Amount,
    },
}

/// Receiver of registry events.
///
/// Called while the registry still holds its state lock, so implementations
/// must not call back into the registry.
pub trait EventSink: Send + Sync {
    fn emit(&self, event: &RegistryEvent);
}

/// Sink that drops every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopEventSink;

impl EventSink for NoopEventSink {
    fn emit(&self, _event: &RegistryEvent) {}
}

/// Keeps every event in memory, in emission order.
#[derive(Debug, Clone, Default)]
pub struct MemoryEventSink {
    events: Arc<RwLock<Vec<RegistryEvent>>>,
}

impl MemoryEventSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<RegistryEvent> {
        self.events.read().clone()
    }

    pub fn len(&self) -> usize {
        self.events.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.read().is_empty()
    }
}

impl EventSink for MemoryEventSink {
    fn emit(&self, event: &RegistryEvent) {
        self.events.write().push(event.clone());
    }
}

/// Fans events out to async subscribers.
#[derive(Debug, Clone)]
pub struct BroadcastEventSink {
    sender: broadcast::Sender<RegistryEvent>,
}

impl BroadcastEventSink {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self { sender }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<RegistryEvent> {
        self.sender.subscribe()
    }
}

impl EventSink for BroadcastEventSink {
    fn emit(&self, event: &RegistryEvent) {
        // No subscribers is not an error.
        let _ = self.sender.send(event.clone());
    }
}
