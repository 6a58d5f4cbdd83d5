//! Structural and scene-level events.
//!
//! The graph does not know about physics bodies, render proxies or any other
//! external mirror of the hierarchy; it only announces what happened to it.
//! Events are closed enums dispatched synchronously, on the calling thread,
//! to subscribers in registration order — a subscriber sees the graph in the
//! state the mutation left it in, before the mutating call returns.
//!
//! Callbacks receive the node handle and the event by reference; they do not
//! get access to the graph itself, which keeps dispatch re-entrancy-free.

use rustc_hash::FxHashMap;

use crate::scene::NodeIndex;

/// Structural notification fired by [`SceneGraph`] mutations.
///
/// [`SceneGraph`]: crate::scene::SceneGraph
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeEvent {
    /// The node was spliced under a new parent.
    Inserted {
        /// The new parent.
        parent: NodeIndex,
    },
    /// An ancestor of the node was spliced under a new parent.
    InsertedHierarchy {
        /// The re-rooted ancestor's new parent.
        parent: NodeIndex,
    },
    /// The node was spliced out of its parent (but not destroyed).
    Removed {
        /// The former parent.
        parent: NodeIndex,
    },
    /// An ancestor of the node was spliced out of its parent.
    RemovedHierarchy {
        /// The re-rooted ancestor's former parent.
        parent: NodeIndex,
    },
    /// The node's cached world transform was recomputed.
    TransformChanged,
    /// The node is being destroyed. Fired after its children are destroyed
    /// and before its subscriptions are released.
    Destroyed,
}

/// Scene-level notification fired by [`SceneSettings`] mutations.
///
/// [`SceneSettings`]: crate::scene::SceneSettings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SceneEvent {
    /// The skybox texture set changed.
    SkyboxChanged,
    /// The layer composition changed.
    LayersChanged,
}

/// Identifies a subscription for later removal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObserverId(u64);

/// Callback invoked for node events.
pub type NodeObserverFn = Box<dyn FnMut(NodeIndex, &NodeEvent)>;

/// Callback invoked for scene events.
pub type SceneObserverFn = Box<dyn FnMut(&SceneEvent)>;

/// Per-node subscriber lists, kept outside the node arena so that dispatch
/// can borrow the registry while the graph holds node borrows.
#[derive(Default)]
pub(crate) struct NodeObservers {
    subscribers: FxHashMap<NodeIndex, Vec<(ObserverId, NodeObserverFn)>>,
    next_id: u64,
}

impl NodeObservers {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Registers a callback for events on `node`. Returns a handle usable
    /// with [`unsubscribe`](Self::unsubscribe).
    pub(crate) fn subscribe(&mut self, node: NodeIndex, callback: NodeObserverFn) -> ObserverId {
        let id = ObserverId(self.next_id);
        self.next_id += 1;
        self.subscribers.entry(node).or_default().push((id, callback));
        id
    }

    /// Removes a subscription; returns whether it existed.
    pub(crate) fn unsubscribe(&mut self, node: NodeIndex, id: ObserverId) -> bool {
        let Some(list) = self.subscribers.get_mut(&node) else {
            return false;
        };
        let Some(pos) = list.iter().position(|(existing, _)| *existing == id) else {
            return false;
        };
        list.remove(pos);
        if list.is_empty() {
            self.subscribers.remove(&node);
        }
        true
    }

    /// Synchronously invokes all subscribers of `node` in registration order.
    pub(crate) fn fire(&mut self, node: NodeIndex, event: &NodeEvent) {
        if let Some(list) = self.subscribers.get_mut(&node) {
            for (_, callback) in list.iter_mut() {
                callback(node, event);
            }
        }
    }

    /// Drops every subscription of `node` (called on destroy).
    pub(crate) fn release(&mut self, node: NodeIndex) {
        self.subscribers.remove(&node);
    }
}

/// Subscriber list for scene-level events.
#[derive(Default)]
pub(crate) struct SceneObservers {
    subscribers: Vec<(ObserverId, SceneObserverFn)>,
    next_id: u64,
}

impl SceneObservers {
    pub(crate) fn subscribe(&mut self, callback: SceneObserverFn) -> ObserverId {
        let id = ObserverId(self.next_id);
        self.next_id += 1;
        self.subscribers.push((id, callback));
        id
    }

    pub(crate) fn unsubscribe(&mut self, id: ObserverId) -> bool {
        let Some(pos) = self
            .subscribers
            .iter()
            .position(|(existing, _)| *existing == id)
        else {
            return false;
        };
        self.subscribers.remove(pos);
        true
    }

    pub(crate) fn fire(&mut self, event: &SceneEvent) {
        for (_, callback) in &mut self.subscribers {
            callback(event);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;
    use thunderdome::Arena;

    fn dummy_index() -> NodeIndex {
        let mut arena: Arena<()> = Arena::new();
        arena.insert(())
    }

    #[test]
    fn dispatch_in_registration_order() {
        let node = dummy_index();
        let order = Rc::new(RefCell::new(Vec::new()));
        let mut observers = NodeObservers::new();

        for tag in 0..3 {
            let order = Rc::clone(&order);
            observers.subscribe(
                node,
                Box::new(move |_, _| {
                    order.borrow_mut().push(tag);
                }),
            );
        }

        observers.fire(node, &NodeEvent::TransformChanged);
        assert_eq!(*order.borrow(), vec![0, 1, 2]);
    }

    #[test]
    fn unsubscribe_stops_delivery() {
        let node = dummy_index();
        let count = Rc::new(RefCell::new(0));
        let mut observers = NodeObservers::new();

        let handle = {
            let count = Rc::clone(&count);
            observers.subscribe(
                node,
                Box::new(move |_, _| {
                    *count.borrow_mut() += 1;
                }),
            )
        };

        observers.fire(node, &NodeEvent::Destroyed);
        assert!(observers.unsubscribe(node, handle));
        observers.fire(node, &NodeEvent::Destroyed);
        assert_eq!(*count.borrow(), 1);

        // Second unsubscribe is a no-op.
        assert!(!observers.unsubscribe(node, handle));
    }
}
