//! Shared pointer-event stream with scoped subscriptions.
//!
//! An open picker has to hear about presses anywhere in the host so it can
//! close when the user clicks away. Listeners are registered through
//! [`PointerEventStream::subscribe`] and stay registered exactly as long as
//! the returned [`PointerSubscription`] lives; dropping it unregisters the
//! listener.

use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};

use tracing::debug;

/// Identifies a node in the host's element tree
pub type NodeId = u64;

/// A press somewhere in the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PointerEvent {
    /// Target node first, then its ancestors up to the root
    pub path: Vec<NodeId>,
}

impl PointerEvent {
    pub fn new(path: Vec<NodeId>) -> Self {
        Self { path }
    }

    /// Whether the press landed on `node` or one of its descendants
    pub fn is_within(&self, node: NodeId) -> bool {
        self.path.contains(&node)
    }
}

type Listener = Box<dyn FnMut(&PointerEvent)>;

#[derive(Default)]
struct Registry {
    next_id: u64,
    listeners: Vec<(u64, Listener)>,
    dispatching: bool,
    /// Ids dropped while their listener was checked out for a dispatch
    removed_during_dispatch: Vec<u64>,
}

/// Single-threaded fan-out of pointer events. Clones share one registry.
#[derive(Clone, Default)]
pub struct PointerEventStream {
    registry: Rc<RefCell<Registry>>,
}

impl PointerEventStream {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `listener` until the returned subscription is dropped
    #[must_use = "dropping the subscription unregisters the listener"]
    pub fn subscribe(&self, listener: impl FnMut(&PointerEvent) + 'static) -> PointerSubscription {
        let mut registry = self.registry.borrow_mut();
        let id = registry.next_id;
        registry.next_id += 1;
        registry.listeners.push((id, Box::new(listener)));
        debug!("pointer listener {} registered", id);

        PointerSubscription {
            id,
            registry: Rc::downgrade(&self.registry),
        }
    }

    /// Delivers `event` to every registered listener.
    ///
    /// Listeners may subscribe or drop subscriptions while being called.
    pub fn dispatch(&self, event: &PointerEvent) {
        let mut listeners = {
            let mut registry = self.registry.borrow_mut();
            if registry.dispatching {
                debug!("nested pointer dispatch ignored");
                return;
            }
            registry.dispatching = true;
            std::mem::take(&mut registry.listeners)
        };

        for (_, listener) in listeners.iter_mut() {
            listener(event);
        }

        let mut registry = self.registry.borrow_mut();
        let removed = std::mem::take(&mut registry.removed_during_dispatch);
        listeners.retain(|(id, _)| !removed.contains(id));
        // keep listeners added during the dispatch, after the existing ones
        listeners.append(&mut registry.listeners);
        registry.listeners = listeners;
        registry.dispatching = false;
    }

    pub fn listener_count(&self) -> usize {
        self.registry.borrow().listeners.len()
    }
}

impl fmt::Debug for PointerEventStream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PointerEventStream")
            .field("listeners", &self.listener_count())
            .finish()
    }
}

/// Keeps a listener registered; unregisters it on drop.
pub struct PointerSubscription {
    id: u64,
    registry: Weak<RefCell<Registry>>,
}

impl Drop for PointerSubscription {
    fn drop(&mut self) {
        let Some(registry) = self.registry.upgrade() else {
            return;
        };
        let mut registry = registry.borrow_mut();
        let before = registry.listeners.len();
        registry.listeners.retain(|(id, _)| *id != self.id);
        if registry.listeners.len() == before && registry.dispatching {
            registry.removed_during_dispatch.push(self.id);
        }
        debug!("pointer listener {} released", self.id);
    }
}

impl fmt::Debug for PointerSubscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PointerSubscription")
            .field("id", &self.id)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn test_event_path_membership() {
        let event = PointerEvent::new(vec![7, 3, 1]);
        assert!(event.is_within(7));
        assert!(event.is_within(1));
        assert!(!event.is_within(2));
    }

    #[test]
    fn test_subscription_lives_until_dropped() {
        let stream = PointerEventStream::new();
        let hits = Rc::new(Cell::new(0));

        let subscription = {
            let hits = hits.clone();
            stream.subscribe(move |_| hits.set(hits.get() + 1))
        };
        assert_eq!(stream.listener_count(), 1);

        stream.dispatch(&PointerEvent::new(vec![1]));
        assert_eq!(hits.get(), 1);

        drop(subscription);
        assert_eq!(stream.listener_count(), 0);

        stream.dispatch(&PointerEvent::new(vec![1]));
        assert_eq!(hits.get(), 1);
    }

    #[test]
    fn test_clones_share_listeners() {
        let stream = PointerEventStream::new();
        let other = stream.clone();
        let _subscription = other.subscribe(|_| {});

        assert_eq!(stream.listener_count(), 1);
    }

    #[test]
    fn test_listener_can_drop_its_own_subscription() {
        let stream = PointerEventStream::new();
        let slot: Rc<RefCell<Option<PointerSubscription>>> = Rc::new(RefCell::new(None));

        let subscription = {
            let slot = slot.clone();
            stream.subscribe(move |_| {
                slot.borrow_mut().take();
            })
        };
        *slot.borrow_mut() = Some(subscription);

        stream.dispatch(&PointerEvent::new(vec![1]));
        assert_eq!(stream.listener_count(), 0);
    }

    #[test]
    fn test_subscription_outliving_stream_is_harmless() {
        let stream = PointerEventStream::new();
        let subscription = stream.subscribe(|_| {});
        drop(stream);
        drop(subscription);
    }
}
