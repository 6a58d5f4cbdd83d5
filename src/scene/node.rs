//! Graph node data.
//!
//! [`GraphNode`] keeps only the data that hierarchy traversal touches every
//! frame: the local TRS, both cached matrices, the dirty/frozen flags and the
//! parent/child links. Everything structural (attach, detach, dirty
//! propagation, world-matrix resolution) lives on [`SceneGraph`], which owns
//! the arena the nodes live in — a node by itself is inert data.
//!
//! # Caching contract
//!
//! - `local_transform` is valid iff `dirty_local` is false.
//! - `world_transform` is valid iff `dirty_world` is false, and then equals
//!   the parent's world transform composed with the local transform (subject
//!   to scale compensation).
//! - `frozen` implies both dirty flags are clear; it is an optimization
//!   overlay that lets [`SceneGraph::sync_hierarchy`] skip a whole subtree.
//!
//! [`SceneGraph`]: crate::scene::SceneGraph
//! [`SceneGraph::sync_hierarchy`]: crate::scene::SceneGraph::sync_hierarchy

use glam::{Affine3A, Quat, Vec3};
use rustc_hash::FxHashMap;

use crate::scene::NodeIndex;
use crate::scene::component::ComponentSet;
use crate::utils::interner::{self, Symbol};

/// A node of the scene hierarchy.
pub struct GraphNode {
    // === Identity ===
    /// Display name; not required to be unique.
    pub name: String,
    tags: Vec<Symbol>,
    labels: FxHashMap<Symbol, Symbol>,

    // === Local transform ===
    pub(crate) local_position: Vec3,
    pub(crate) local_rotation: Quat,
    pub(crate) local_scale: Vec3,

    // === Matrix caches ===
    pub(crate) local_transform: Affine3A,
    pub(crate) world_transform: Affine3A,

    // === Dirty state ===
    pub(crate) dirty_local: bool,
    pub(crate) dirty_world: bool,
    pub(crate) frozen: bool,
    pub(crate) scale_compensation: bool,

    // === Hierarchy ===
    pub(crate) parent: Option<NodeIndex>,
    pub(crate) children: Vec<NodeIndex>,
    pub(crate) graph_depth: u32,

    // === Enabled state ===
    pub(crate) enabled_self: bool,
    pub(crate) enabled_in_hierarchy: bool,

    // === Components ===
    pub(crate) components: ComponentSet,

    // === Diagnostics ===
    /// Number of times the world matrix was actually recomputed.
    pub(crate) world_sync_count: u64,
}

impl GraphNode {
    /// Creates a detached node with an identity transform.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            tags: Vec::new(),
            labels: FxHashMap::default(),

            local_position: Vec3::ZERO,
            local_rotation: Quat::IDENTITY,
            local_scale: Vec3::ONE,

            local_transform: Affine3A::IDENTITY,
            world_transform: Affine3A::IDENTITY,

            // A fresh node has never been synced.
            dirty_local: true,
            dirty_world: true,
            frozen: false,
            scale_compensation: false,

            parent: None,
            children: Vec::new(),
            graph_depth: 0,

            enabled_self: true,
            enabled_in_hierarchy: true,

            components: ComponentSet::new(),

            world_sync_count: 0,
        }
    }

    // ========================================================================
    // Hierarchy (read-only — edits go through SceneGraph)
    // ========================================================================

    /// Parent handle, `None` for detached/root nodes.
    #[inline]
    #[must_use]
    pub fn parent(&self) -> Option<NodeIndex> {
        self.parent
    }

    /// Ordered child handles.
    #[inline]
    #[must_use]
    pub fn children(&self) -> &[NodeIndex] {
        &self.children
    }

    /// Cached distance from the root, recomputed on reparent only.
    #[inline]
    #[must_use]
    pub fn graph_depth(&self) -> u32 {
        self.graph_depth
    }

    // ========================================================================
    // Local transform (read-only — setters on SceneGraph drive dirty flags)
    // ========================================================================

    /// Local position relative to the parent.
    #[inline]
    #[must_use]
    pub fn local_position(&self) -> Vec3 {
        self.local_position
    }

    /// Local rotation relative to the parent.
    #[inline]
    #[must_use]
    pub fn local_rotation(&self) -> Quat {
        self.local_rotation
    }

    /// Local scale relative to the parent.
    #[inline]
    #[must_use]
    pub fn local_scale(&self) -> Vec3 {
        self.local_scale
    }

    /// Whether this node decouples its world scale from compensating
    /// ancestors (see [`SceneGraph::set_scale_compensation`]).
    ///
    /// [`SceneGraph::set_scale_compensation`]: crate::scene::SceneGraph::set_scale_compensation
    #[inline]
    #[must_use]
    pub fn scale_compensation(&self) -> bool {
        self.scale_compensation
    }

    // ========================================================================
    // Enabled state
    // ========================================================================

    /// This node's own enabled flag, ignoring ancestors.
    #[inline]
    #[must_use]
    pub fn enabled(&self) -> bool {
        self.enabled_self
    }

    /// Derived flag: true only if this node and every ancestor are enabled.
    #[inline]
    #[must_use]
    pub fn enabled_in_hierarchy(&self) -> bool {
        self.enabled_in_hierarchy
    }

    /// Whether the subtree below (and including) this node had no pending
    /// transform work at the last [`sync_hierarchy`] pass.
    ///
    /// [`sync_hierarchy`]: crate::scene::SceneGraph::sync_hierarchy
    #[inline]
    #[must_use]
    pub fn frozen(&self) -> bool {
        self.frozen
    }

    // ========================================================================
    // Tags & labels
    // ========================================================================

    /// Adds a tag. Duplicates are ignored.
    pub fn add_tag(&mut self, tag: &str) {
        let sym = interner::intern(tag);
        if !self.tags.contains(&sym) {
            self.tags.push(sym);
        }
    }

    /// Removes a tag; returns whether it was present.
    pub fn remove_tag(&mut self, tag: &str) -> bool {
        let Some(sym) = interner::get(tag) else {
            return false;
        };
        if let Some(pos) = self.tags.iter().position(|&t| t == sym) {
            self.tags.remove(pos);
            true
        } else {
            false
        }
    }

    /// Whether the tag is present.
    #[must_use]
    pub fn has_tag(&self, tag: &str) -> bool {
        interner::get(tag).is_some_and(|sym| self.tags.contains(&sym))
    }

    /// All tags, in insertion order.
    pub fn tags(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.tags.iter().map(|&t| interner::resolve(t))
    }

    /// Sets an arbitrary key/value label.
    pub fn set_label(&mut self, key: &str, value: &str) {
        self.labels
            .insert(interner::intern(key), interner::intern(value));
    }

    /// Looks up a label value.
    #[must_use]
    pub fn label(&self, key: &str) -> Option<&'static str> {
        let sym = interner::get(key)?;
        self.labels.get(&sym).map(|&v| interner::resolve(v))
    }

    /// Removes a label; returns whether it was present.
    pub fn remove_label(&mut self, key: &str) -> bool {
        interner::get(key).is_some_and(|sym| self.labels.remove(&sym).is_some())
    }

    // ========================================================================
    // Components
    // ========================================================================

    /// The attached component set.
    #[inline]
    #[must_use]
    pub fn components(&self) -> &ComponentSet {
        &self.components
    }

    // ========================================================================
    // Diagnostics
    // ========================================================================

    /// How many times this node's world matrix has actually been recomputed.
    ///
    /// Stays constant across repeated reads of a clean node, which is what
    /// the lazy-evaluation tests key on.
    #[inline]
    #[must_use]
    pub fn world_sync_count(&self) -> u64 {
        self.world_sync_count
    }
}

impl Default for GraphNode {
    fn default() -> Self {
        Self::new("")
    }
}

impl std::fmt::Debug for GraphNode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GraphNode")
            .field("name", &self.name)
            .field("parent", &self.parent)
            .field("children", &self.children.len())
            .field("dirty_local", &self.dirty_local)
            .field("dirty_world", &self.dirty_world)
            .field("frozen", &self.frozen)
            .field("enabled", &self.enabled_self)
            .field("enabled_in_hierarchy", &self.enabled_in_hierarchy)
            .finish_non_exhaustive()
    }
}
