//! Named components attached to graph nodes.
//!
//! A component is a behavior module (animation playback, sound emitter,
//! physics binding…) hung off a node under a unique name. The graph does not
//! interpret components; it only guarantees their lifecycle hooks fire on
//! the right edges:
//!
//! - a component becomes *active* when it is individually enabled AND its
//!   node is enabled in the hierarchy;
//! - `on_enable` / `on_disable` fire exactly once per activity edge, never
//!   redundantly, regardless of which side (component flag or hierarchy
//!   state) flipped;
//! - `on_destroy` fires once when the component or its node is destroyed.
//!
//! Operating on a missing name is a logged no-op returning a `false`/`None`
//! sentinel — never a panic.

use std::any::Any;

use crate::scene::NodeIndex;
use crate::utils::interner::{self, Symbol};

/// A behavior module attachable to a [`GraphNode`] under a unique name.
///
/// [`GraphNode`]: crate::scene::GraphNode
pub trait Component: Any {
    /// The unique attachment name (e.g. `"sound"`, `"collision"`).
    fn type_name(&self) -> &'static str;

    /// Called when the component becomes active (see module docs).
    fn on_enable(&mut self, _node: NodeIndex) {}

    /// Called when the component stops being active.
    fn on_disable(&mut self, _node: NodeIndex) {}

    /// Called once when the component or its node is destroyed.
    fn on_destroy(&mut self, _node: NodeIndex) {}

    /// Upcast for downcasting to the concrete type.
    fn as_any(&self) -> &dyn Any;

    /// Mutable upcast for downcasting to the concrete type.
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

struct Entry {
    name: Symbol,
    component: Box<dyn Component>,
    /// The component's own enabled flag.
    enabled: bool,
    /// Whether `on_enable` has been delivered without a matching
    /// `on_disable` — the hook-state, not the desired state.
    active: bool,
}

/// The ordered set of components attached to one node.
///
/// Mutation entry points take the node handle and its current
/// hierarchy-enabled flag because hook delivery depends on both; they are
/// normally called through the [`SceneGraph`] component API rather than
/// directly.
///
/// [`SceneGraph`]: crate::scene::SceneGraph
#[derive(Default)]
pub struct ComponentSet {
    entries: Vec<Entry>,
}

impl ComponentSet {
    /// Creates an empty set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of attached components.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no components are attached.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Whether a component with this name is attached.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        interner::get(name).is_some_and(|sym| self.position(sym).is_some())
    }

    /// Attachment names, in attach order.
    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.entries.iter().map(|e| interner::resolve(e.name))
    }

    /// Borrows a component by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&dyn Component> {
        let sym = interner::get(name)?;
        self.position(sym)
            .map(|idx| self.entries[idx].component.as_ref())
    }

    /// Mutably borrows a component by name.
    pub fn get_mut(&mut self, name: &str) -> Option<&mut dyn Component> {
        let sym = interner::get(name)?;
        let idx = self.position(sym)?;
        Some(self.entries[idx].component.as_mut())
    }

    /// Borrows a component by name, downcast to its concrete type.
    #[must_use]
    pub fn get_as<T: Component>(&self, name: &str) -> Option<&T> {
        self.get(name).and_then(|c| c.as_any().downcast_ref())
    }

    /// Mutably borrows a component by name, downcast to its concrete type.
    pub fn get_as_mut<T: Component>(&mut self, name: &str) -> Option<&mut T> {
        self.get_mut(name).and_then(|c| c.as_any_mut().downcast_mut())
    }

    /// Whether the named component's own enabled flag is set.
    ///
    /// Missing names are logged and report `false`.
    #[must_use]
    pub fn is_enabled(&self, name: &str) -> bool {
        match interner::get(name).and_then(|sym| self.position(sym)) {
            Some(idx) => self.entries[idx].enabled,
            None => {
                log::warn!("No component named '{name}'");
                false
            }
        }
    }

    // ========================================================================
    // Lifecycle entry points (called via SceneGraph)
    // ========================================================================

    /// Attaches a component; duplicates by name are refused with a warning.
    ///
    /// New components start individually enabled, so `on_enable` fires
    /// immediately when the node is enabled in the hierarchy.
    pub(crate) fn add(
        &mut self,
        component: Box<dyn Component>,
        node: NodeIndex,
        hierarchy_enabled: bool,
    ) -> bool {
        let name = interner::intern(component.type_name());
        if self.position(name).is_some() {
            log::warn!(
                "Component '{}' is already attached to this node",
                interner::resolve(name)
            );
            return false;
        }

        self.entries.push(Entry {
            name,
            component,
            enabled: true,
            active: false,
        });
        let idx = self.entries.len() - 1;
        self.apply_state(idx, node, hierarchy_enabled);
        true
    }

    /// Detaches a component by name, running its disable/destroy hooks.
    pub(crate) fn remove(&mut self, name: &str, node: NodeIndex) -> bool {
        let Some(idx) = interner::get(name).and_then(|sym| self.position(sym)) else {
            log::warn!("No component named '{name}' to remove");
            return false;
        };

        let mut entry = self.entries.remove(idx);
        if entry.active {
            entry.component.on_disable(node);
        }
        entry.component.on_destroy(node);
        true
    }

    /// Flips the named component's own enabled flag.
    pub(crate) fn set_enabled(
        &mut self,
        name: &str,
        enabled: bool,
        node: NodeIndex,
        hierarchy_enabled: bool,
    ) -> bool {
        let Some(idx) = interner::get(name).and_then(|sym| self.position(sym)) else {
            log::warn!("No component named '{name}' to enable/disable");
            return false;
        };

        self.entries[idx].enabled = enabled;
        self.apply_state(idx, node, hierarchy_enabled);
        true
    }

    /// Re-evaluates every entry against a new hierarchy-enabled flag.
    pub(crate) fn sync_hierarchy_enabled(&mut self, node: NodeIndex, hierarchy_enabled: bool) {
        for idx in 0..self.entries.len() {
            self.apply_state(idx, node, hierarchy_enabled);
        }
    }

    /// Runs disable (where active) and destroy hooks on every entry and
    /// clears the set. Called when the owning node is destroyed.
    pub(crate) fn destroy_all(&mut self, node: NodeIndex) {
        for entry in &mut self.entries {
            if entry.active {
                entry.component.on_disable(node);
            }
            entry.component.on_destroy(node);
        }
        self.entries.clear();
    }

    // ========================================================================
    // Internal
    // ========================================================================

    fn position(&self, name: Symbol) -> Option<usize> {
        self.entries.iter().position(|e| e.name == name)
    }

    /// Fires the enable/disable hook if the desired activity differs from
    /// the delivered hook-state.
    fn apply_state(&mut self, idx: usize, node: NodeIndex, hierarchy_enabled: bool) {
        let entry = &mut self.entries[idx];
        let desired = entry.enabled && hierarchy_enabled;
        if desired == entry.active {
            return;
        }
        entry.active = desired;
        if desired {
            entry.component.on_enable(node);
        } else {
            entry.component.on_disable(node);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;
    use thunderdome::Arena;

    #[derive(Default)]
    struct Log {
        enables: u32,
        disables: u32,
        destroys: u32,
    }

    struct Probe {
        log: Rc<RefCell<Log>>,
    }

    impl Component for Probe {
        fn type_name(&self) -> &'static str {
            "probe"
        }
        fn on_enable(&mut self, _node: NodeIndex) {
            self.log.borrow_mut().enables += 1;
        }
        fn on_disable(&mut self, _node: NodeIndex) {
            self.log.borrow_mut().disables += 1;
        }
        fn on_destroy(&mut self, _node: NodeIndex) {
            self.log.borrow_mut().destroys += 1;
        }
        fn as_any(&self) -> &dyn Any {
            self
        }
        fn as_any_mut(&mut self) -> &mut dyn Any {
            self
        }
    }

    fn dummy_index() -> NodeIndex {
        let mut arena: Arena<()> = Arena::new();
        arena.insert(())
    }

    #[test]
    fn hooks_fire_on_edges_only() {
        let node = dummy_index();
        let log = Rc::new(RefCell::new(Log::default()));
        let mut set = ComponentSet::new();

        assert!(set.add(Box::new(Probe { log: Rc::clone(&log) }), node, true));
        assert_eq!(log.borrow().enables, 1);

        // Redundant re-sync: no extra hook.
        set.sync_hierarchy_enabled(node, true);
        assert_eq!(log.borrow().enables, 1);

        // Hierarchy disable, then component flag flip while inactive.
        set.sync_hierarchy_enabled(node, false);
        assert_eq!(log.borrow().disables, 1);
        assert!(set.set_enabled("probe", false, node, false));
        assert_eq!(log.borrow().disables, 1);

        // Re-enabling hierarchy alone must not activate a self-disabled entry.
        set.sync_hierarchy_enabled(node, true);
        assert_eq!(log.borrow().enables, 1);
        assert!(set.set_enabled("probe", true, node, true));
        assert_eq!(log.borrow().enables, 2);
    }

    #[test]
    fn remove_runs_disable_then_destroy() {
        let node = dummy_index();
        let log = Rc::new(RefCell::new(Log::default()));
        let mut set = ComponentSet::new();
        set.add(Box::new(Probe { log: Rc::clone(&log) }), node, true);

        assert!(set.remove("probe", node));
        assert_eq!(log.borrow().disables, 1);
        assert_eq!(log.borrow().destroys, 1);
        assert!(!set.contains("probe"));

        // Missing name is a logged no-op.
        assert!(!set.remove("probe", node));
    }

    #[test]
    fn duplicate_names_are_refused() {
        let node = dummy_index();
        let log = Rc::new(RefCell::new(Log::default()));
        let mut set = ComponentSet::new();
        assert!(set.add(Box::new(Probe { log: Rc::clone(&log) }), node, true));
        assert!(!set.add(Box::new(Probe { log: Rc::clone(&log) }), node, true));
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn typed_downcast() {
        let node = dummy_index();
        let log = Rc::new(RefCell::new(Log::default()));
        let mut set = ComponentSet::new();
        set.add(Box::new(Probe { log }), node, true);

        assert!(set.get_as::<Probe>("probe").is_some());
        assert!(set.get("missing").is_none());
    }
}
