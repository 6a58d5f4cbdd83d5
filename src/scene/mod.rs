//! Scene graph subsystem.
//!
//! - [`GraphNode`]: per-node hot data (TRS, cached matrices, dirty flags,
//!   hierarchy links, enabled state, attached components)
//! - [`SceneGraph`]: the arena that owns the nodes and implements hierarchy
//!   edits, dirty propagation and lazy world-matrix resolution
//! - [`SceneSettings`]: scene-wide rendering parameters that feed the
//!   shader-variant system
//! - [`events`]: tagged structural/scene event enums + observer registries
//! - [`component`]: named behavior modules with enable/disable lifecycle

pub mod component;
pub mod events;
pub mod graph;
pub mod light;
pub mod node;
pub mod settings;

pub use component::{Component, ComponentSet};
pub use events::{NodeEvent, ObserverId, SceneEvent};
pub use graph::SceneGraph;
pub use light::{Light, LightKey, LightKind, LightPool, LightingShape};
pub use node::GraphNode;
pub use settings::{
    BackendCaps, FogMode, GammaMode, LayerId, SceneSettings, Sky, Texture, TextureHandle,
    TextureKind, ToneMapping,
};

use thunderdome::Index;

/// Handle to a node inside a [`SceneGraph`] arena.
pub type NodeIndex = Index;
