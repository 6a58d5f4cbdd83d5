//! Shader variant keys.
//!
//! A compiled program is identified by everything that can change its
//! source: material feature flags, per-object geometry defines, the pass
//! being rendered, the scene-wide snapshot (fog, gamma, tone mapping,
//! clustered flag, ambient source) and the shape of the light list. All of
//! that is folded into a [`VariantKey`] — a plain value type with structural
//! `Eq + Hash` so the program cache can use it directly.
//!
//! [`VariantBuilder`] is the mutable scratch the folding happens in. The
//! library owns one and reuses it across requests; [`finalize`] copies the
//! folded state out into a fresh immutable key, so reusing the scratch can
//! never alias a key already sitting in the cache.
//!
//! [`finalize`]: VariantBuilder::finalize

use std::hash::{BuildHasher, Hash};

use bitflags::bitflags;

use crate::material::defines::ShaderDefines;
use crate::scene::light::LightingShape;
use crate::scene::settings::{FogMode, GammaMode, SceneSettings, ToneMapping};

bitflags! {
    /// Feature bits of a standard material that select shader code paths.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct StandardMaterialFlags: u32 {
        const NORMAL_MAP    = 1 << 0;
        const METALNESS     = 1 << 1;
        const CLEARCOAT     = 1 << 2;
        const SHEEN         = 1 << 3;
        const REFRACTION    = 1 << 4;
        const IRIDESCENCE   = 1 << 5;
        const AO_MAP        = 1 << 6;
        const SPECULAR      = 1 << 7;
        const EMISSIVE      = 1 << 8;
        const OPACITY_MAP   = 1 << 9;
        const LIGHTMAP      = 1 << 10;
        const VERTEX_COLORS = 1 << 11;
    }
}

bitflags! {
    /// Per-object geometry defines (independent of the material).
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct ObjectDefs: u32 {
        const SKINNED        = 1 << 0;
        const INSTANCED      = 1 << 1;
        const MORPH_POSITION = 1 << 2;
        const MORPH_NORMAL   = 1 << 3;
    }
}

/// Shading model the generated program implements.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum LightingModel {
    /// No lighting, albedo passes through.
    Unlit,
    /// Diffuse-only.
    Lambert,
    /// Blinn-Phong specular.
    Phong,
    /// Physically based.
    #[default]
    Pbr,
}

/// Render pass a program is generated for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PassKind {
    /// Main forward shading pass.
    #[default]
    Forward,
    /// Shadow-map depth pass.
    Shadow,
    /// Depth prepass.
    Depth,
}

/// Stable hash of any key type, used by the program cache internals.
#[must_use]
pub fn fx_hash_key<K: Hash>(key: &K) -> u64 {
    rustc_hash::FxBuildHasher.hash_one(key)
}

/// Immutable, structurally comparable identity of one shader variant.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct VariantKey {
    material_flags: StandardMaterialFlags,
    lighting_model: LightingModel,
    object_defs: ObjectDefs,
    pass: PassKind,

    // Scene snapshot.
    fog: FogMode,
    gamma: GammaMode,
    tone_mapping: ToneMapping,
    clustered: bool,
    env_lighting: bool,

    lights: LightingShape,
    /// Bitmask of UV channels the material's textures read.
    uv_channels: u8,
    /// Chunk overrides and other free-form macros.
    defines: ShaderDefines,
}

impl VariantKey {
    #[must_use]
    pub fn material_flags(&self) -> StandardMaterialFlags {
        self.material_flags
    }

    #[must_use]
    pub fn lighting_model(&self) -> LightingModel {
        self.lighting_model
    }

    #[must_use]
    pub fn object_defs(&self) -> ObjectDefs {
        self.object_defs
    }

    #[must_use]
    pub fn pass(&self) -> PassKind {
        self.pass
    }

    #[must_use]
    pub fn fog(&self) -> FogMode {
        self.fog
    }

    #[must_use]
    pub fn lights(&self) -> LightingShape {
        self.lights
    }

    #[must_use]
    pub fn defines(&self) -> &ShaderDefines {
        &self.defines
    }

    /// Content hash, identical for structurally equal keys.
    #[must_use]
    pub fn compute_hash(&self) -> u64 {
        fx_hash_key(self)
    }
}

/// Reusable scratch state a variant is folded into.
///
/// Obtain it through the library, fold in every input, then
/// [`finalize`](Self::finalize). Field order of folding does not matter.
#[derive(Debug, Default)]
pub struct VariantBuilder {
    key: VariantKey,
}

impl VariantBuilder {
    /// Resets the scratch to the default (empty) variant.
    pub fn begin(&mut self) -> &mut Self {
        self.key = VariantKey::default();
        self
    }

    /// Folds in the material's feature flags and shading model.
    pub fn material(&mut self, flags: StandardMaterialFlags, model: LightingModel) -> &mut Self {
        self.key.material_flags = flags;
        self.key.lighting_model = model;
        self
    }

    /// Folds in per-object geometry defines.
    pub fn object(&mut self, defs: ObjectDefs) -> &mut Self {
        self.key.object_defs = defs;
        self
    }

    /// Folds in the render pass.
    pub fn pass(&mut self, pass: PassKind) -> &mut Self {
        self.key.pass = pass;
        self
    }

    /// Folds in the shader-affecting scene state.
    pub fn scene(&mut self, settings: &SceneSettings) -> &mut Self {
        self.key.fog = settings.fog_mode();
        self.key.gamma = settings.gamma();
        self.key.tone_mapping = settings.tone_mapping();
        self.key.clustered = settings.clustered_lighting_enabled();
        self.key.env_lighting = settings.has_env_lighting();
        self
    }

    /// Folds in the shape of the sorted light list.
    pub fn lights(&mut self, shape: LightingShape) -> &mut Self {
        self.key.lights = shape;
        self
    }

    /// Marks a UV channel as read by the variant.
    pub fn uv_channel(&mut self, channel: u8) -> &mut Self {
        self.key.uv_channels |= 1 << channel;
        self
    }

    /// Folds in free-form macros (chunk overrides).
    pub fn defines(&mut self, defines: &ShaderDefines) -> &mut Self {
        self.key.defines.merge(defines);
        self
    }

    /// Copies the folded state out into an immutable key. The scratch stays
    /// untouched and can be reused for the next request.
    #[must_use]
    pub fn finalize(&self) -> VariantKey {
        self.key.clone()
    }
}
