//! Material and shader-variant subsystem.
//!
//! - [`defines`]: interned shader macro sets with stable hashing
//! - [`variant`]: the variant key and the shared folding scratch
//! - [`material`]: the standard surface material and its variant request
//! - [`library`]: the per-device template registry and program cache

pub mod defines;
pub mod library;
pub mod material;
pub mod variant;

pub use defines::ShaderDefines;
pub use library::{
    ProgramCompiler, ProgramHandle, ProgramLibrary, ShaderProcessorOptions, TemplateFn,
    refresh_programs,
};
pub use material::StandardMaterial;
pub use variant::{
    LightingModel, ObjectDefs, PassKind, StandardMaterialFlags, VariantBuilder, VariantKey,
    fx_hash_key,
};
