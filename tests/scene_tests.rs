//! Scene-level behavior tests
//!
//! Tests for:
//! - Enabled-state propagation through the hierarchy (and its deliberate
//!   staleness on detached subtrees)
//! - Component lifecycle hooks driven through the graph
//! - Structural event dispatch
//! - SceneSettings equality gating, sky cache and the clustered switch

use std::any::Any;
use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;

use glam::Vec3;
use prism::scene::settings::{Texture, TextureHandle, TextureKind};
use prism::scene::{
    Component, FogMode, LayerId, NodeEvent, NodeIndex, SceneEvent, SceneGraph, SceneSettings,
};

// ============================================================================
// Helpers
// ============================================================================

#[derive(Default)]
struct HookLog {
    enables: u32,
    disables: u32,
    destroys: u32,
}

struct Probe {
    log: Rc<RefCell<HookLog>>,
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

fn cube(name: &str) -> TextureHandle {
    Arc::new(Texture::new(name, TextureKind::Cube, 1))
}

fn enabled_in_hierarchy(graph: &SceneGraph, idx: NodeIndex) -> bool {
    graph.node(idx).unwrap().enabled_in_hierarchy()
}

// ============================================================================
// Enabled-state propagation
// ============================================================================

#[test]
fn disabling_an_ancestor_disables_the_subtree() {
    let mut graph = SceneGraph::new();
    let root = graph.create("root");
    let mid = graph.create_child(root, "mid");
    let leaf = graph.create_child(mid, "leaf");

    graph.set_enabled(root, false);
    assert!(!enabled_in_hierarchy(&graph, root));
    assert!(!enabled_in_hierarchy(&graph, mid));
    assert!(!enabled_in_hierarchy(&graph, leaf));

    // Own flags are untouched.
    assert!(graph.node(mid).unwrap().enabled());
    assert!(graph.node(leaf).unwrap().enabled());
}

#[test]
fn self_disabled_child_pins_its_subtree() {
    let mut graph = SceneGraph::new();
    let root = graph.create("root");
    let mid = graph.create_child(root, "mid");
    let leaf = graph.create_child(mid, "leaf");

    graph.set_enabled(mid, false);
    assert!(!enabled_in_hierarchy(&graph, leaf));

    // Toggling the root around it changes nothing below mid.
    graph.set_enabled(root, false);
    graph.set_enabled(root, true);
    assert!(enabled_in_hierarchy(&graph, root));
    assert!(!enabled_in_hierarchy(&graph, mid));
    assert!(!enabled_in_hierarchy(&graph, leaf));

    graph.set_enabled(mid, true);
    assert!(enabled_in_hierarchy(&graph, leaf));
}

#[test]
fn enabling_under_a_disabled_parent_is_deferred() {
    let mut graph = SceneGraph::new();
    let root = graph.create("root");
    let child = graph.create_child(root, "child");

    graph.set_enabled(root, false);
    graph.set_enabled(child, false);
    graph.set_enabled(child, true);
    // The child's own flag is set but the derived state stays off until the
    // parent chain comes back.
    assert!(graph.node(child).unwrap().enabled());
    assert!(!enabled_in_hierarchy(&graph, child));

    graph.set_enabled(root, true);
    assert!(enabled_in_hierarchy(&graph, child));
}

#[test]
fn detached_subtree_keeps_its_last_derived_state() {
    let mut graph = SceneGraph::new();
    let disabled_root = graph.create("disabled-root");
    graph.set_enabled(disabled_root, false);
    let child = graph.create_child(disabled_root, "child");
    assert!(!enabled_in_hierarchy(&graph, child));

    // Detaching does not re-derive: the node reads as disabled although it
    // now has no parent at all.
    graph.remove_child(disabled_root, child);
    assert!(graph.node(child).unwrap().parent().is_none());
    assert!(graph.node(child).unwrap().enabled());
    assert!(!enabled_in_hierarchy(&graph, child));

    // Re-attaching under an enabled parent refreshes it.
    let enabled_root = graph.create("enabled-root");
    graph.add_child(enabled_root, child);
    assert!(enabled_in_hierarchy(&graph, child));
}

// ============================================================================
// Component lifecycle through the graph
// ============================================================================

#[test]
fn hierarchy_toggles_drive_component_hooks() {
    let mut graph = SceneGraph::new();
    let root = graph.create("root");
    let child = graph.create_child(root, "child");
    let log = Rc::new(RefCell::new(HookLog::default()));

    assert!(graph.add_component(child, Box::new(Probe { log: Rc::clone(&log) })));
    assert_eq!(log.borrow().enables, 1);

    graph.set_enabled(root, false);
    assert_eq!(log.borrow().disables, 1);

    // Redundant disable of an already-off branch: no extra hook.
    graph.set_enabled(child, false);
    assert_eq!(log.borrow().disables, 1);

    graph.set_enabled(root, true);
    assert_eq!(log.borrow().enables, 1); // child still self-disabled

    graph.set_enabled(child, true);
    assert_eq!(log.borrow().enables, 2);
}

#[test]
fn component_flag_and_destroy_hooks() {
    let mut graph = SceneGraph::new();
    let node = graph.create("node");
    let log = Rc::new(RefCell::new(HookLog::default()));

    graph.add_component(node, Box::new(Probe { log: Rc::clone(&log) }));
    assert!(graph.set_component_enabled(node, "probe", false));
    assert_eq!(log.borrow().disables, 1);

    // Missing name: logged no-op sentinel.
    assert!(!graph.set_component_enabled(node, "ghost", true));
    assert!(!graph.remove_component(node, "ghost"));

    graph.destroy(node);
    assert_eq!(log.borrow().destroys, 1);
    // Was already inactive, so no second disable.
    assert_eq!(log.borrow().disables, 1);
}

#[test]
fn destroying_a_parent_destroys_child_components() {
    let mut graph = SceneGraph::new();
    let root = graph.create("root");
    let child = graph.create_child(root, "child");
    let log = Rc::new(RefCell::new(HookLog::default()));

    graph.add_component(child, Box::new(Probe { log: Rc::clone(&log) }));
    graph.destroy(root);
    assert_eq!(log.borrow().disables, 1);
    assert_eq!(log.borrow().destroys, 1);
}

// ============================================================================
// Structural events
// ============================================================================

#[test]
fn reparent_fires_remove_then_insert() {
    let mut graph = SceneGraph::new();
    let a = graph.create("a");
    let b = graph.create("b");
    let child = graph.create_child(a, "child");

    let events = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&events);
    graph
        .subscribe(child, Box::new(move |_, event| sink.borrow_mut().push(*event)))
        .unwrap();

    graph.reparent(child, b, None);
    assert_eq!(
        *events.borrow(),
        vec![
            NodeEvent::Removed { parent: a },
            NodeEvent::Inserted { parent: b }
        ]
    );
}

#[test]
fn descendants_see_hierarchy_events() {
    let mut graph = SceneGraph::new();
    let root = graph.create("root");
    let mid = graph.create_child(root, "mid");
    let leaf = graph.create_child(mid, "leaf");
    let other = graph.create("other");

    let events = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&events);
    graph
        .subscribe(leaf, Box::new(move |_, event| sink.borrow_mut().push(*event)))
        .unwrap();

    graph.reparent(mid, other, None);
    assert_eq!(
        *events.borrow(),
        vec![
            NodeEvent::RemovedHierarchy { parent: root },
            NodeEvent::InsertedHierarchy { parent: other }
        ]
    );
}

#[test]
fn transform_sync_and_destroy_notify_subscribers() {
    let mut graph = SceneGraph::new();
    let node = graph.create("node");

    let events = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&events);
    let id = graph
        .subscribe(node, Box::new(move |_, event| sink.borrow_mut().push(*event)))
        .unwrap();

    graph.set_local_position(node, Vec3::X);
    let _ = graph.world_transform(node);
    assert_eq!(*events.borrow(), vec![NodeEvent::TransformChanged]);

    // Unsubscribing stops delivery; re-destroying checks release.
    assert!(graph.unsubscribe(node, id));
    graph.destroy(node);
    assert_eq!(*events.borrow(), vec![NodeEvent::TransformChanged]);
}

// ============================================================================
// SceneSettings
// ============================================================================

#[test]
fn fog_mode_invalidation_is_equality_gated() {
    let mut settings = SceneSettings::default();
    settings.take_update_shaders(); // drop the initial flag

    settings.set_fog_mode(FogMode::Linear);
    assert!(settings.take_update_shaders());

    // Same value again: zero invalidations.
    settings.set_fog_mode(FogMode::Linear);
    assert!(!settings.needs_shader_update());

    // Uniform-only fog parameters never invalidate.
    settings.set_fog_color(Vec3::splat(0.5));
    settings.set_fog_density(0.02);
    settings.set_fog_start(5.0);
    settings.set_fog_end(50.0);
    assert!(!settings.needs_shader_update());
}

#[test]
fn skybox_change_fires_event_and_drops_sky() {
    let mut settings = SceneSettings::default();
    let events = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&events);
    settings.subscribe(Box::new(move |event| sink.borrow_mut().push(*event)));

    let _ = settings.sky();
    assert!(settings.has_sky());

    let base = cube("base");
    settings.set_skybox(Some(std::slice::from_ref(&base)));
    assert_eq!(*events.borrow(), vec![SceneEvent::SkyboxChanged]);
    assert!(!settings.has_sky());
    assert!(settings.needs_shader_update());

    // Installing the identical handle again is a no-op.
    settings.take_update_shaders();
    settings.set_skybox(Some(std::slice::from_ref(&base)));
    assert_eq!(events.borrow().len(), 1);
    assert!(!settings.needs_shader_update());

    settings.set_skybox(None);
    assert_eq!(
        *events.borrow(),
        vec![SceneEvent::SkyboxChanged, SceneEvent::SkyboxChanged]
    );
}

#[test]
fn layer_changes_fire_their_own_event() {
    let mut settings = SceneSettings::default();
    let count = Rc::new(RefCell::new(0));
    let sink = Rc::clone(&count);
    settings.subscribe(Box::new(move |event| {
        if *event == SceneEvent::LayersChanged {
            *sink.borrow_mut() += 1;
        }
    }));

    settings.set_layers(vec![LayerId(0), LayerId(5)]);
    settings.set_layers(vec![LayerId(0), LayerId(5)]); // unchanged
    settings.set_layers(vec![LayerId(5)]);
    assert_eq!(*count.borrow(), 2);
}
