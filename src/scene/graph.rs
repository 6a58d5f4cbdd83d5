//! The scene hierarchy and its transform propagation.
//!
//! [`SceneGraph`] owns every [`GraphNode`] in a [`thunderdome::Arena`];
//! parent links are plain handles back into the arena (non-owning), child
//! lists own their subtrees up to explicit reparenting. All structural edits
//! and all transform reads go through the graph so that the dirty-flag
//! invariants cannot be broken from outside.
//!
//! # Dirty tracking
//!
//! Mutating a local transform marks the node local-dirty and propagates
//! world-dirty down the subtree. The down-walk short-circuits at children
//! that are already world-dirty: once a path is dirty it stays dirty until
//! synced, so an already-dirty child implies an already-marked subtree.
//! Before a clean node turns dirty, the `frozen` flag is cleared on every
//! ancestor up to the root so a frozen ancestor cannot skip the re-sync of
//! a newly dirtied descendant.
//!
//! # Resolution paths
//!
//! - [`world_transform`](SceneGraph::world_transform) is the lazy per-query
//!   path: it resolves the ancestor chain first (top-down correctness), then
//!   syncs the node itself. Clean nodes return the cache untouched.
//! - [`sync_hierarchy`](SceneGraph::sync_hierarchy) is the per-frame driver:
//!   one pre-order sweep that syncs everything and freezes the subtree so
//!   the next frame can skip it wholesale.
//!
//! # Failure semantics
//!
//! Structural misuse (self-parenting, inserting a node under its own
//! descendant) is a programming error checked by `debug_assert!` — fatal in
//! debug builds, unchecked in release. Stale handles are logged and ignored.
//! Numeric input is never validated; a zero scale silently produces a
//! degenerate world matrix.

use glam::{Affine3A, EulerRot, Quat, Vec3};
use smallvec::SmallVec;
use thunderdome::Arena;

use crate::scene::NodeIndex;
use crate::scene::component::Component;
use crate::scene::events::{NodeEvent, NodeObserverFn, NodeObservers, ObserverId};
use crate::scene::node::GraphNode;

/// The node hierarchy of a scene.
#[derive(Default)]
pub struct SceneGraph {
    nodes: Arena<GraphNode>,
    /// Nodes without a parent, in creation/detach order.
    roots: Vec<NodeIndex>,
    observers: NodeObservers,
}

impl SceneGraph {
    /// Creates an empty graph.
    #[must_use]
    pub fn new() -> Self {
        Self {
            nodes: Arena::new(),
            roots: Vec::new(),
            observers: NodeObservers::new(),
        }
    }

    // ========================================================================
    // Storage
    // ========================================================================

    /// Inserts a detached node and returns its handle.
    pub fn add_node(&mut self, node: GraphNode) -> NodeIndex {
        let idx = self.nodes.insert(node);
        self.roots.push(idx);
        idx
    }

    /// Convenience: inserts a fresh node with the given name.
    pub fn create(&mut self, name: impl Into<String>) -> NodeIndex {
        self.add_node(GraphNode::new(name))
    }

    /// Convenience: inserts a fresh node and attaches it under `parent`.
    pub fn create_child(&mut self, parent: NodeIndex, name: impl Into<String>) -> NodeIndex {
        let idx = self.create(name);
        self.add_child(parent, idx);
        idx
    }

    /// Borrows a node.
    #[must_use]
    pub fn node(&self, idx: NodeIndex) -> Option<&GraphNode> {
        self.nodes.get(idx)
    }

    /// Mutably borrows a node (name, tags, labels — transform and structure
    /// edits go through the graph methods).
    pub fn node_mut(&mut self, idx: NodeIndex) -> Option<&mut GraphNode> {
        self.nodes.get_mut(idx)
    }

    /// Number of live nodes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the graph is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Handles of all parentless nodes.
    #[must_use]
    pub fn roots(&self) -> &[NodeIndex] {
        &self.roots
    }

    /// Iterates all live nodes in arena order.
    pub fn iter(&self) -> impl Iterator<Item = (NodeIndex, &GraphNode)> {
        self.nodes.iter()
    }

    // ========================================================================
    // Local transform setters
    // ========================================================================

    /// Overwrites the local position and dirtifies the subtree.
    pub fn set_local_position(&mut self, idx: NodeIndex, position: Vec3) {
        if let Some(node) = self.nodes.get_mut(idx) {
            node.local_position = position;
            self.dirtify_local(idx);
        } else {
            log::warn!("set_local_position on a stale node handle");
        }
    }

    /// Overwrites the local rotation and dirtifies the subtree.
    pub fn set_local_rotation(&mut self, idx: NodeIndex, rotation: Quat) {
        if let Some(node) = self.nodes.get_mut(idx) {
            node.local_rotation = rotation;
            self.dirtify_local(idx);
        } else {
            log::warn!("set_local_rotation on a stale node handle");
        }
    }

    /// Overwrites the local rotation from XYZ Euler angles (radians).
    pub fn set_local_euler(&mut self, idx: NodeIndex, x: f32, y: f32, z: f32) {
        self.set_local_rotation(idx, Quat::from_euler(EulerRot::XYZ, x, y, z));
    }

    /// Overwrites the local scale and dirtifies the subtree.
    ///
    /// No validation: a zero component is accepted and yields a degenerate,
    /// non-invertible world matrix downstream.
    pub fn set_local_scale(&mut self, idx: NodeIndex, scale: Vec3) {
        if let Some(node) = self.nodes.get_mut(idx) {
            node.local_scale = scale;
            self.dirtify_local(idx);
        } else {
            log::warn!("set_local_scale on a stale node handle");
        }
    }

    /// Toggles scale compensation: when set, this node's world scale tracks
    /// its own local scale (times the scale inherited from above the first
    /// non-compensating ancestor) instead of compounding every ancestor's
    /// scale. Used to keep attachment/UI subtrees stable under scaled
    /// skeletons.
    pub fn set_scale_compensation(&mut self, idx: NodeIndex, enabled: bool) {
        if let Some(node) = self.nodes.get_mut(idx) {
            if node.scale_compensation != enabled {
                node.scale_compensation = enabled;
                self.dirtify_world(idx);
            }
        }
    }

    // ========================================================================
    // Transform reads
    // ========================================================================

    /// The node's local matrix, recomposed from TRS if stale.
    pub fn local_transform(&mut self, idx: NodeIndex) -> Affine3A {
        let Some(node) = self.nodes.get_mut(idx) else {
            log::warn!("local_transform on a stale node handle");
            return Affine3A::IDENTITY;
        };
        if node.dirty_local {
            node.local_transform = Affine3A::from_scale_rotation_translation(
                node.local_scale,
                node.local_rotation,
                node.local_position,
            );
            node.dirty_local = false;
        }
        node.local_transform
    }

    /// The node's world matrix, resolved lazily.
    ///
    /// Fast path: a fully clean node returns the cache immediately. A dirty
    /// node first forces the *parent* to resolve (recursively up the chain),
    /// then syncs itself — ancestors are always current before composition.
    pub fn world_transform(&mut self, idx: NodeIndex) -> Affine3A {
        let (dirty, parent) = match self.nodes.get(idx) {
            Some(n) => (n.dirty_local || n.dirty_world, n.parent),
            None => {
                log::warn!("world_transform on a stale node handle");
                return Affine3A::IDENTITY;
            }
        };

        if dirty {
            if let Some(p) = parent {
                let _ = self.world_transform(p);
            }
            self.sync_node(idx);
        }

        self.nodes[idx].world_transform
    }

    /// World-space position of the node.
    pub fn world_position(&mut self, idx: NodeIndex) -> Vec3 {
        Vec3::from(self.world_transform(idx).translation)
    }

    /// World-space rotation of the node.
    pub fn world_rotation(&mut self, idx: NodeIndex) -> Quat {
        let (_, rotation, _) = self.world_transform(idx).to_scale_rotation_translation();
        rotation
    }

    /// World-space scale of the node.
    pub fn world_scale(&mut self, idx: NodeIndex) -> Vec3 {
        let (scale, _, _) = self.world_transform(idx).to_scale_rotation_translation();
        scale
    }

    // ========================================================================
    // Per-frame driver
    // ========================================================================

    /// Prepares a whole subtree for rendering: one pre-order sweep that
    /// syncs every dirty node and freezes the subtree so the next sweep can
    /// skip it entirely. No-op when the node is self-disabled or already
    /// frozen.
    pub fn sync_hierarchy(&mut self, idx: NodeIndex) {
        // 显式栈遍历，深层级场景不会栈溢出
        let mut stack: SmallVec<[NodeIndex; 32]> = SmallVec::new();
        stack.push(idx);

        while let Some(i) = stack.pop() {
            let dirty = match self.nodes.get_mut(i) {
                Some(n) => {
                    if !n.enabled_self || n.frozen {
                        continue;
                    }
                    // Mark before recursing: a mutation mid-sweep unfreezes
                    // the chain again.
                    n.frozen = true;
                    n.dirty_local || n.dirty_world
                }
                None => continue,
            };

            if dirty {
                self.sync_node(i);
            }

            if let Some(n) = self.nodes.get(i) {
                stack.extend(n.children.iter().copied());
            }
        }
    }

    /// Runs [`sync_hierarchy`](Self::sync_hierarchy) on every root.
    pub fn sync_all(&mut self) {
        let roots = self.roots.clone();
        for root in roots {
            self.sync_hierarchy(root);
        }
    }

    // ========================================================================
    // Structure edits
    // ========================================================================

    /// Appends `child` to `parent`'s children (detaching it first).
    pub fn add_child(&mut self, parent: NodeIndex, child: NodeIndex) {
        self.attach_child(parent, child, None);
    }

    /// Inserts `child` at `index` in `parent`'s children (clamped).
    pub fn insert_child(&mut self, parent: NodeIndex, child: NodeIndex, index: usize) {
        self.attach_child(parent, child, Some(index));
    }

    /// Moves `child` under `new_parent`, optionally at a specific index.
    pub fn reparent(&mut self, child: NodeIndex, new_parent: NodeIndex, index: Option<usize>) {
        self.attach_child(new_parent, child, index);
    }

    fn attach_child(&mut self, parent: NodeIndex, child: NodeIndex, index: Option<usize>) {
        if self.nodes.get(parent).is_none() || self.nodes.get(child).is_none() {
            log::warn!("attach with a stale node handle");
            return;
        }
        debug_assert!(parent != child, "cannot parent a node to itself");
        debug_assert!(
            !self.is_descendant_of(parent, child),
            "cannot insert a node under its own descendant"
        );

        // 1. Detach first — removal is idempotent.
        self.detach(child);
        self.remove_root(child);

        // 2. Splice.
        {
            let p = &mut self.nodes[parent];
            match index {
                Some(i) => {
                    let i = i.min(p.children.len());
                    p.children.insert(i, child);
                }
                None => p.children.push(child),
            }
        }
        self.nodes[child].parent = Some(parent);

        // 3. Re-derive the enabled state of the inserted subtree if the new
        //    context differs from what it last saw.
        let ctx = self.nodes[parent].enabled_in_hierarchy;
        let desired = self.nodes[child].enabled_self && ctx;
        if self.nodes[child].enabled_in_hierarchy != desired {
            self.propagate_enabled_state(child, desired);
        }

        // 4. Depth is recomputed on reparent only.
        let depth = self.nodes[parent].graph_depth + 1;
        self.update_graph_depth(child, depth);

        // 5. The inserted subtree composes against a new parent.
        self.dirtify_world(child);
        if self.nodes[parent].frozen {
            self.unfreeze_parent_chain(child);
        }

        // 6. Notify.
        self.observers.fire(child, &NodeEvent::Inserted { parent });
        self.fire_hierarchy(child, &NodeEvent::InsertedHierarchy { parent });
    }

    /// Splices `child` out of `parent`. No-op when `child` is not actually a
    /// child of `parent`.
    ///
    /// The removed subtree keeps the `enabled_in_hierarchy` value it had
    /// while attached; it is re-derived on the next attach. Dependent code
    /// relies on reading the last attached state from a detached node, so
    /// this is deliberate.
    pub fn remove_child(&mut self, parent: NodeIndex, child: NodeIndex) {
        let Some(pos) = self
            .nodes
            .get(parent)
            .and_then(|p| p.children.iter().position(|&c| c == child))
        else {
            return;
        };

        self.nodes[parent].children.remove(pos);
        if let Some(c) = self.nodes.get_mut(child) {
            c.parent = None;
        }
        self.roots.push(child);

        self.observers.fire(child, &NodeEvent::Removed { parent });
        self.fire_hierarchy(child, &NodeEvent::RemovedHierarchy { parent });
    }

    /// Destroys the node and its whole subtree: detaches it, recursively
    /// destroys all children, fires [`NodeEvent::Destroyed`] per node, runs
    /// component destroy hooks and releases event subscriptions.
    pub fn destroy(&mut self, idx: NodeIndex) {
        if self.nodes.get(idx).is_none() {
            log::warn!("destroy on a stale node handle");
            return;
        }
        self.detach(idx);
        self.remove_root(idx);
        self.destroy_subtree(idx);
    }

    fn destroy_subtree(&mut self, idx: NodeIndex) {
        // Children go first. Their parent back-reference is cleared directly
        // — the parent is being destroyed anyway, no need for a full detach.
        loop {
            let child = match self.nodes.get_mut(idx) {
                Some(n) => n.children.pop(),
                None => None,
            };
            let Some(child) = child else { break };
            if let Some(c) = self.nodes.get_mut(child) {
                c.parent = None;
            }
            self.destroy_subtree(child);
        }

        if let Some(node) = self.nodes.get_mut(idx) {
            let mut components = std::mem::take(&mut node.components);
            components.destroy_all(idx);
        }
        self.observers.fire(idx, &NodeEvent::Destroyed);
        self.observers.release(idx);
        self.nodes.remove(idx);
    }

    /// Detaches a node from its parent if it has one (idempotent).
    fn detach(&mut self, child: NodeIndex) {
        if let Some(parent) = self.nodes.get(child).and_then(|c| c.parent) {
            self.remove_child(parent, child);
        }
    }

    fn remove_root(&mut self, idx: NodeIndex) {
        if let Some(pos) = self.roots.iter().position(|&r| r == idx) {
            self.roots.remove(pos);
        }
    }

    // ========================================================================
    // Enabled state
    // ========================================================================

    /// Sets the node's own enabled flag and propagates the derived
    /// hierarchy state.
    ///
    /// Disabling always propagates into the subtree; enabling only takes
    /// effect when the parent chain is itself enabled. Propagation descends
    /// only through children whose own flag is true — a self-disabled child
    /// pins its subtree regardless of what happens above it.
    pub fn set_enabled(&mut self, idx: NodeIndex, enabled: bool) {
        let parent = {
            let Some(node) = self.nodes.get_mut(idx) else {
                log::warn!("set_enabled on a stale node handle");
                return;
            };
            if node.enabled_self == enabled {
                return;
            }
            node.enabled_self = enabled;
            node.parent
        };

        let parent_enabled = parent.is_none_or(|p| self.nodes[p].enabled_in_hierarchy);
        if !enabled || parent_enabled {
            self.propagate_enabled_state(idx, enabled);
        }
    }

    fn propagate_enabled_state(&mut self, idx: NodeIndex, enabled: bool) {
        let mut stack: SmallVec<[NodeIndex; 16]> = SmallVec::new();
        stack.push(idx);

        while let Some(i) = stack.pop() {
            // 先更新自身状态并触发组件钩子，再克隆 children 避免借用冲突
            let children = match self.nodes.get_mut(i) {
                Some(n) => {
                    n.enabled_in_hierarchy = enabled;
                    n.components.sync_hierarchy_enabled(i, enabled);
                    n.children.clone()
                }
                None => continue,
            };

            for child in children {
                if self.nodes.get(child).is_some_and(|c| c.enabled_self) {
                    stack.push(child);
                }
            }
        }
    }

    // ========================================================================
    // Components
    // ========================================================================

    /// Attaches a named component; `on_enable` fires immediately when the
    /// node is enabled in the hierarchy. Refuses duplicates by name.
    pub fn add_component(&mut self, idx: NodeIndex, component: Box<dyn Component>) -> bool {
        let Some(node) = self.nodes.get_mut(idx) else {
            log::warn!("add_component on a stale node handle");
            return false;
        };
        let hierarchy_enabled = node.enabled_in_hierarchy;
        node.components.add(component, idx, hierarchy_enabled)
    }

    /// Detaches a named component, running its lifecycle hooks. Missing
    /// names are a logged no-op returning `false`.
    pub fn remove_component(&mut self, idx: NodeIndex, name: &str) -> bool {
        let Some(node) = self.nodes.get_mut(idx) else {
            log::warn!("remove_component on a stale node handle");
            return false;
        };
        node.components.remove(name, idx)
    }

    /// Flips a named component's own enabled flag.
    pub fn set_component_enabled(&mut self, idx: NodeIndex, name: &str, enabled: bool) -> bool {
        let Some(node) = self.nodes.get_mut(idx) else {
            log::warn!("set_component_enabled on a stale node handle");
            return false;
        };
        let hierarchy_enabled = node.enabled_in_hierarchy;
        node.components
            .set_enabled(name, enabled, idx, hierarchy_enabled)
    }

    // ========================================================================
    // Events
    // ========================================================================

    /// Registers a structural-event callback on a node.
    pub fn subscribe(&mut self, idx: NodeIndex, callback: NodeObserverFn) -> Option<ObserverId> {
        if self.nodes.get(idx).is_none() {
            log::warn!("subscribe on a stale node handle");
            return None;
        }
        Some(self.observers.subscribe(idx, callback))
    }

    /// Removes a subscription; returns whether it existed.
    pub fn unsubscribe(&mut self, idx: NodeIndex, id: ObserverId) -> bool {
        self.observers.unsubscribe(idx, id)
    }

    /// Fires `event` on every strict descendant of `root`, pre-order.
    fn fire_hierarchy(&mut self, root: NodeIndex, event: &NodeEvent) {
        let mut stack: SmallVec<[NodeIndex; 16]> = match self.nodes.get(root) {
            Some(n) => n.children.iter().copied().collect(),
            None => return,
        };
        while let Some(i) = stack.pop() {
            self.observers.fire(i, event);
            if let Some(n) = self.nodes.get(i) {
                stack.extend(n.children.iter().copied());
            }
        }
    }

    // ========================================================================
    // Queries
    // ========================================================================

    /// Whether `node` sits somewhere below `ancestor`.
    #[must_use]
    pub fn is_descendant_of(&self, node: NodeIndex, ancestor: NodeIndex) -> bool {
        let mut cur = self.nodes.get(node).and_then(|n| n.parent);
        while let Some(i) = cur {
            if i == ancestor {
                return true;
            }
            cur = self.nodes.get(i).and_then(|n| n.parent);
        }
        false
    }

    /// The topmost ancestor of `node` (itself when detached).
    #[must_use]
    pub fn root_of(&self, node: NodeIndex) -> NodeIndex {
        let mut cur = node;
        while let Some(parent) = self.nodes.get(cur).and_then(|n| n.parent) {
            cur = parent;
        }
        cur
    }

    /// Depth-first search for the first node with this name.
    #[must_use]
    pub fn find_by_name(&self, name: &str) -> Option<NodeIndex> {
        let mut stack: Vec<NodeIndex> = self.roots.iter().rev().copied().collect();
        while let Some(i) = stack.pop() {
            let node = self.nodes.get(i)?;
            if node.name == name {
                return Some(i);
            }
            stack.extend(node.children.iter().rev().copied());
        }
        None
    }

    /// All nodes carrying the tag, in depth-first order.
    #[must_use]
    pub fn find_by_tag(&self, tag: &str) -> Vec<NodeIndex> {
        let mut out = Vec::new();
        let mut stack: Vec<NodeIndex> = self.roots.iter().rev().copied().collect();
        while let Some(i) = stack.pop() {
            if let Some(node) = self.nodes.get(i) {
                if node.has_tag(tag) {
                    out.push(i);
                }
                stack.extend(node.children.iter().rev().copied());
            }
        }
        out
    }

    // ========================================================================
    // Dirty propagation (internal)
    // ========================================================================

    fn dirtify_local(&mut self, idx: NodeIndex) {
        let Some(node) = self.nodes.get_mut(idx) else {
            return;
        };
        if !node.dirty_local {
            node.dirty_local = true;
            if !node.dirty_world {
                self.dirtify_world(idx);
                return;
            }
        }
        // Local dirty implies world dirty already — nothing more to mark.
    }

    fn dirtify_world(&mut self, idx: NodeIndex) {
        // On the clean→dirty edge, unfreeze the ancestor chain so a frozen
        // ancestor cannot skip re-syncing this subtree.
        if self.nodes.get(idx).is_some_and(|n| !n.dirty_world) {
            self.unfreeze_parent_chain(idx);
        }
        self.dirtify_world_down(idx);
    }

    fn dirtify_world_down(&mut self, idx: NodeIndex) {
        let mut stack: SmallVec<[NodeIndex; 16]> = SmallVec::new();
        stack.push(idx);

        while let Some(i) = stack.pop() {
            let Some(node) = self.nodes.get_mut(i) else {
                continue;
            };
            // Short-circuit: an already world-dirty child means its subtree
            // is already fully marked.
            if node.dirty_world {
                continue;
            }
            node.frozen = false;
            node.dirty_world = true;
            stack.extend(node.children.iter().copied());
        }
    }

    fn unfreeze_parent_chain(&mut self, idx: NodeIndex) {
        let mut cur = self.nodes.get(idx).and_then(|n| n.parent);
        while let Some(i) = cur {
            let node = &mut self.nodes[i];
            node.frozen = false;
            cur = node.parent;
        }
    }

    fn update_graph_depth(&mut self, idx: NodeIndex, depth: u32) {
        let mut stack: SmallVec<[(NodeIndex, u32); 16]> = SmallVec::new();
        stack.push((idx, depth));

        while let Some((i, d)) = stack.pop() {
            let Some(node) = self.nodes.get_mut(i) else {
                continue;
            };
            node.graph_depth = d;
            for &child in &node.children {
                stack.push((child, d + 1));
            }
        }
    }

    // ========================================================================
    // Sync (internal)
    // ========================================================================

    /// Recomputes the node's matrices. The parent chain must already be
    /// resolved (guaranteed by both resolution paths).
    fn sync_node(&mut self, idx: NodeIndex) {
        {
            let Some(node) = self.nodes.get_mut(idx) else {
                return;
            };
            if node.dirty_local {
                node.local_transform = Affine3A::from_scale_rotation_translation(
                    node.local_scale,
                    node.local_rotation,
                    node.local_position,
                );
                node.dirty_local = false;
            }
            if !node.dirty_world {
                return;
            }
        }

        let world = {
            let node = &self.nodes[idx];
            match node.parent {
                None => node.local_transform,
                Some(parent) if !node.scale_compensation => {
                    self.nodes[parent].world_transform * node.local_transform
                }
                Some(parent) => self.compensated_world(idx, parent),
            }
        };

        {
            let node = &mut self.nodes[idx];
            node.world_transform = world;
            node.dirty_world = false;
            node.world_sync_count += 1;
        }
        self.observers.fire(idx, &NodeEvent::TransformChanged);
    }

    /// World matrix of a scale-compensating node.
    ///
    /// The effective scale skips the accumulated scale of the compensating
    /// ancestor chain: it is the world scale of the node *above* the first
    /// non-compensating ancestor (identity when there is none) times this
    /// node's local scale. Rotation still composes through the immediate
    /// parent's world rotation. Position is transformed through the parent's
    /// world matrix — rebuilt with the compensated scale when the parent is
    /// itself a compensating node, since its cached world matrix does not
    /// carry the scale it passes on.
    fn compensated_world(&self, idx: NodeIndex, parent: NodeIndex) -> Affine3A {
        let node = &self.nodes[idx];

        let mut ancestor = Some(parent);
        while let Some(a) = ancestor {
            if !self.nodes[a].scale_compensation {
                break;
            }
            ancestor = self.nodes[a].parent;
        }
        let scale_source = ancestor.and_then(|a| self.nodes[a].parent);
        let inherited_scale = scale_source.map_or(Vec3::ONE, |s| {
            let (scale, _, _) = self.nodes[s].world_transform.to_scale_rotation_translation();
            scale
        });

        let scale = inherited_scale * node.local_scale;

        let parent_node = &self.nodes[parent];
        let (_, parent_rot, parent_pos) =
            parent_node.world_transform.to_scale_rotation_translation();
        let rotation = parent_rot * node.local_rotation;

        let position = if parent_node.scale_compensation {
            let parent_pass_scale = inherited_scale * parent_node.local_scale;
            Affine3A::from_scale_rotation_translation(parent_pass_scale, parent_rot, parent_pos)
                .transform_point3(node.local_position)
        } else {
            parent_node.world_transform.transform_point3(node.local_position)
        };

        Affine3A::from_scale_rotation_translation(scale, rotation, position)
    }
}
