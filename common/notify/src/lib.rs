//! Synchronous change-notification between model entities.
//!
//! Entities that other entities need to observe own a [`Notifier`] and fire
//! typed events through it. Listeners are held weakly so that observation
//! never extends an entity's lifetime, and each listener is subscribed at
//! most once per notifier; re-subscribing replaces the previous
//! subscription.
//!
//! Notification is synchronous and runs on the caller's thread. Listener
//! callbacks are invoked after the notifier's internal lock is released, so
//! a listener may freely subscribe/unsubscribe or read the notifying entity.

use std::sync::Weak;

use parking_lot::Mutex;

/// Receives change events from a [`Notifier`].
pub trait Listener<E>: Send + Sync {
    fn notify(&self, event: &E);
}

pub struct Notifier<E> {
    listeners: Mutex<Vec<Weak<dyn Listener<E>>>>,
}

impl<E> Default for Notifier<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> Notifier<E> {
    pub fn new() -> Self {
        Self {
            listeners: Mutex::new(Vec::new()),
        }
    }

    /// Subscribes a listener, replacing any existing subscription for the
    /// same listener instance.
    pub fn subscribe(&self, listener: Weak<dyn Listener<E>>) {
        let mut listeners = self.listeners.lock();
        listeners.retain(|existing| !existing.ptr_eq(&listener) && existing.strong_count() > 0);
        listeners.push(listener);
    }

    pub fn unsubscribe(&self, listener: &Weak<dyn Listener<E>>) {
        let mut listeners = self.listeners.lock();
        listeners.retain(|existing| !existing.ptr_eq(listener) && existing.strong_count() > 0);
    }

    /// Delivers the event to every live listener, pruning dropped ones.
    pub fn notify(&self, event: &E) {
        let listeners = {
            let mut listeners = self.listeners.lock();
            listeners.retain(|listener| listener.strong_count() > 0);
            listeners.clone()
        };

        for listener in listeners {
            if let Some(listener) = listener.upgrade() {
                listener.notify(event);
            }
        }
    }

    pub fn listener_count(&self) -> usize {
        let mut listeners = self.listeners.lock();
        listeners.retain(|listener| listener.strong_count() > 0);
        listeners.len()
    }
}
