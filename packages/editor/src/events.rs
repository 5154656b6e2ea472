//! Scene change notifications.
//!
//! Delivery is synchronous and in subscription order. Each subscription
//! is a guard: dropping it (or calling [`Subscription::unsubscribe`])
//! detaches the listener. Listeners may subscribe or unsubscribe while an
//! event is being delivered; the change applies from the next `emit`.

use serde::Serialize;
use std::cell::RefCell;
use std::rc::{Rc, Weak};

/// Everything a UI binding can observe
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum SceneEvent {
    NodeSelected { ids: Vec<String> },
    NodeHovered { id: Option<String> },
    NodeChanged { id: String },
    SceneChanged,
    #[serde(rename_all = "camelCase")]
    HistoryChanged { can_undo: bool, can_redo: bool },
}

type Listener = Rc<RefCell<dyn FnMut(&SceneEvent)>>;

#[derive(Default)]
struct Registry {
    next_id: u64,
    listeners: Vec<(u64, Listener)>,
}

/// Publish/subscribe channel for [`SceneEvent`]s
#[derive(Default)]
pub struct EventBus {
    registry: Rc<RefCell<Registry>>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a listener; it stays attached while the guard lives
    pub fn subscribe(&self, listener: impl FnMut(&SceneEvent) + 'static) -> Subscription {
        let mut registry = self.registry.borrow_mut();
        let id = registry.next_id;
        registry.next_id += 1;
        registry
            .listeners
            .push((id, Rc::new(RefCell::new(listener)) as Listener));

        Subscription {
            id,
            registry: Rc::downgrade(&self.registry),
        }
    }

    pub fn emit(&self, event: &SceneEvent) {
        // Snapshot the list so listeners can (un)subscribe mid-delivery
        let listeners: Vec<Listener> = self
            .registry
            .borrow()
            .listeners
            .iter()
            .map(|(_, listener)| listener.clone())
            .collect();

        for listener in listeners {
            // A listener that re-enters emit is skipped for the nested event
            if let Ok(mut listener) = listener.try_borrow_mut() {
                listener(event);
            };
        }
    }

    pub fn listener_count(&self) -> usize {
        self.registry.borrow().listeners.len()
    }
}

impl std::fmt::Debug for EventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventBus")
            .field("listeners", &self.listener_count())
            .finish()
    }
}

/// Guard returned by [`EventBus::subscribe`]
#[must_use = "dropping a Subscription detaches its listener"]
pub struct Subscription {
    id: u64,
    registry: Weak<RefCell<Registry>>,
}

impl Subscription {
    pub fn unsubscribe(self) {
        // Drop does the work
    }

    fn detach(&self) {
        let Some(registry) = self.registry.upgrade() else {
            return;
        };
        if let Ok(mut registry) = registry.try_borrow_mut() {
            registry.listeners.retain(|(id, _)| *id != self.id);
        };
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.detach();
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription").field("id", &self.id).finish()
    }
}
