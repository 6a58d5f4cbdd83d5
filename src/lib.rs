#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::too_many_arguments)]

pub mod errors;
pub mod material;
pub mod scene;
pub mod utils;

pub use errors::{PrismError, Result};
pub use material::{
    LightingModel, ObjectDefs, PassKind, ProgramCompiler, ProgramHandle, ProgramLibrary,
    ShaderDefines, ShaderProcessorOptions, StandardMaterial, StandardMaterialFlags, VariantBuilder,
    VariantKey, refresh_programs,
};
pub use scene::{
    BackendCaps, Component, FogMode, GammaMode, GraphNode, Light, LightKind, LightPool,
    LightingShape, NodeEvent, NodeIndex, SceneEvent, SceneGraph, SceneSettings, Sky, Texture,
    TextureHandle, TextureKind, ToneMapping,
};
pub use utils::interner;
