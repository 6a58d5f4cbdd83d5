//! Scene-wide rendering parameters.
//!
//! [`SceneSettings`] aggregates everything that is global to a scene rather
//! than per-node: ambient light, fog, output color handling (gamma + tone
//! mapping), the skybox texture set, clustered-lighting availability, layer
//! composition and lightmap baking parameters.
//!
//! # Invalidation contract
//!
//! Some of these values are baked into shader source (fog mode, gamma, tone
//! mapping, which sky texture gets sampled…), so changing them obsoletes
//! every compiled program variant. Any setter that changes such a value
//! raises the `update_shaders` flag; the flag is level-triggered and only
//! cleared by the recompilation pass through
//! [`take_update_shaders`](SceneSettings::take_update_shaders). Every setter
//! is equality-gated: writing the current value is a complete no-op — no
//! flag, no event, no sky rebuild.
//!
//! # Sky cache
//!
//! The renderable sky dome is built lazily on first access and cached until
//! a sky-affecting setter drops it. The skybox rotation is special-cased:
//! supporting a rotated sky needs extra shader code, so the rotation setter
//! invalidates programs only on the first transition away from identity —
//! after that the rotation is a plain uniform change.

use std::sync::Arc;

use glam::{Quat, Vec3};

use crate::errors::{PrismError, Result};
use crate::scene::events::{ObserverId, SceneEvent, SceneObserverFn, SceneObservers};

// ============================================================================
// Textures
// ============================================================================

/// Texture dimensionality, as far as the scene core cares.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextureKind {
    /// Plain 2D texture (used for prefiltered environment atlases).
    Tex2D,
    /// Six-face cube map.
    Cube,
}

impl TextureKind {
    fn as_str(self) -> &'static str {
        match self {
            Self::Tex2D => "2d",
            Self::Cube => "cube",
        }
    }
}

/// GPU texture description. The core never touches texel data; it only
/// routes handles and validates kinds during skybox assembly.
#[derive(Debug)]
pub struct Texture {
    pub name: String,
    pub kind: TextureKind,
    pub mip_level_count: u32,
}

impl Texture {
    #[must_use]
    pub fn new(name: impl Into<String>, kind: TextureKind, mip_level_count: u32) -> Self {
        Self {
            name: name.into(),
            kind,
            mip_level_count,
        }
    }
}

/// Shared texture handle. Identity (not content) equality is what the
/// equality-gated setters compare.
pub type TextureHandle = Arc<Texture>;

fn same_texture(a: Option<&TextureHandle>, b: Option<&TextureHandle>) -> bool {
    match (a, b) {
        (None, None) => true,
        (Some(a), Some(b)) => Arc::ptr_eq(a, b),
        _ => false,
    }
}

// ============================================================================
// Enums
// ============================================================================

/// Fog falloff applied in the forward passes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum FogMode {
    /// No fog.
    #[default]
    None,
    /// Linear fade between a start and end distance.
    Linear,
    /// Exponential falloff.
    Exp,
    /// Squared-exponential falloff.
    Exp2,
}

/// Output gamma handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum GammaMode {
    /// Write linear values as-is.
    None,
    /// Encode to sRGB on output.
    #[default]
    Srgb,
}

/// Tone mapping operator applied before gamma encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ToneMapping {
    /// Exposure only.
    #[default]
    Linear,
    /// Classic filmic curve.
    Filmic,
    /// Hejl-Dawson approximation.
    Hejl,
    /// ACES filmic.
    Aces,
    /// ACES filmic, square variant.
    Aces2,
    /// AgX-style neutral operator.
    Neutral,
}

/// Identifies a render layer in the scene's layer composition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LayerId(pub u32);

/// What the graphics backend supports; fixed for the lifetime of a scene.
#[derive(Debug, Clone, Copy, Default)]
pub struct BackendCaps {
    /// The backend has no non-clustered lighting path at all.
    pub clustered_only: bool,
}

// ============================================================================
// Sky
// ============================================================================

/// The renderable sky dome, derived lazily from the skybox settings.
#[derive(Debug, Default)]
pub struct Sky {
    texture: Option<TextureHandle>,
    mip: u32,
    rotation: Quat,
}

impl Sky {
    /// The texture the dome samples: the base cubemap at mip 0, the
    /// prefiltered atlas otherwise.
    #[must_use]
    pub fn texture(&self) -> Option<&TextureHandle> {
        self.texture.as_ref()
    }

    #[must_use]
    pub fn mip(&self) -> u32 {
        self.mip
    }

    #[must_use]
    pub fn rotation(&self) -> Quat {
        self.rotation
    }
}

// ============================================================================
// SceneSettings
// ============================================================================

/// Scene-wide rendering parameters with change tracking.
pub struct SceneSettings {
    // === Ambient ===
    ambient_color: Vec3,
    ambient_luminance: f32,

    // === Fog ===
    fog_mode: FogMode,
    fog_color: Vec3,
    fog_density: f32,
    fog_start: f32,
    fog_end: f32,

    // === Output color ===
    gamma: GammaMode,
    tone_mapping: ToneMapping,

    // === Skybox ===
    skybox_base: Option<TextureHandle>,
    env_atlas: Option<TextureHandle>,
    /// Whether `env_atlas` was baked here (and is ours to destroy) rather
    /// than supplied pre-baked by the caller.
    env_atlas_owned: bool,
    skybox_intensity: f32,
    skybox_luminance: f32,
    skybox_mip: u32,
    skybox_rotation: Quat,
    /// Once the rotation has left identity, the rotated-sky shader path is
    /// compiled in and stays in; later rotation edits are uniform-only.
    skybox_rotation_shader_include: bool,
    sky: Option<Sky>,

    // === Clustered lighting ===
    clustered_lighting: bool,
    caps: BackendCaps,

    // === Layers ===
    layers: Vec<LayerId>,

    // === Lightmapping ===
    lightmap_size_multiplier: f32,
    lightmap_max_resolution: u32,
    lightmap_hdr: bool,

    // === Change tracking ===
    update_shaders: bool,
    observers: SceneObservers,
}

impl SceneSettings {
    /// Creates default settings for a backend with the given capabilities.
    #[must_use]
    pub fn new(caps: BackendCaps) -> Self {
        Self {
            ambient_color: Vec3::ZERO,
            ambient_luminance: 0.0,

            fog_mode: FogMode::None,
            fog_color: Vec3::ZERO,
            fog_density: 0.0,
            fog_start: 1.0,
            fog_end: 1000.0,

            gamma: GammaMode::default(),
            tone_mapping: ToneMapping::default(),

            skybox_base: None,
            env_atlas: None,
            env_atlas_owned: false,
            skybox_intensity: 1.0,
            skybox_luminance: 0.0,
            skybox_mip: 0,
            skybox_rotation: Quat::IDENTITY,
            skybox_rotation_shader_include: false,
            sky: None,

            clustered_lighting: true,
            caps,

            layers: Vec::new(),

            lightmap_size_multiplier: 1.0,
            lightmap_max_resolution: 2048,
            lightmap_hdr: false,

            update_shaders: true,
            observers: SceneObservers::default(),
        }
    }

    // ========================================================================
    // Change tracking
    // ========================================================================

    /// Whether any compiled program variant is stale.
    #[must_use]
    pub fn needs_shader_update(&self) -> bool {
        self.update_shaders
    }

    /// Consumes the invalidation flag. Called by the recompilation pass and
    /// nothing else.
    pub fn take_update_shaders(&mut self) -> bool {
        std::mem::take(&mut self.update_shaders)
    }

    /// Registers a scene-event callback.
    pub fn subscribe(&mut self, callback: SceneObserverFn) -> ObserverId {
        self.observers.subscribe(callback)
    }

    /// Removes a scene-event subscription; returns whether it existed.
    pub fn unsubscribe(&mut self, id: ObserverId) -> bool {
        self.observers.unsubscribe(id)
    }

    // ========================================================================
    // Ambient
    // ========================================================================

    #[must_use]
    pub fn ambient_color(&self) -> Vec3 {
        self.ambient_color
    }

    /// Uniform-only: no program invalidation.
    pub fn set_ambient_color(&mut self, color: Vec3) {
        self.ambient_color = color;
    }

    #[must_use]
    pub fn ambient_luminance(&self) -> f32 {
        self.ambient_luminance
    }

    pub fn set_ambient_luminance(&mut self, luminance: f32) {
        self.ambient_luminance = luminance;
    }

    /// Whether image-based ambient lighting is available (a prefiltered
    /// environment atlas is present).
    #[must_use]
    pub fn has_env_lighting(&self) -> bool {
        self.env_atlas.is_some()
    }

    // ========================================================================
    // Fog
    // ========================================================================

    #[must_use]
    pub fn fog_mode(&self) -> FogMode {
        self.fog_mode
    }

    /// The falloff function is shader source, so changing it invalidates
    /// programs. Equality-gated.
    pub fn set_fog_mode(&mut self, mode: FogMode) {
        if self.fog_mode != mode {
            self.fog_mode = mode;
            self.update_shaders = true;
        }
    }

    #[must_use]
    pub fn fog_color(&self) -> Vec3 {
        self.fog_color
    }

    /// Uniform-only.
    pub fn set_fog_color(&mut self, color: Vec3) {
        self.fog_color = color;
    }

    #[must_use]
    pub fn fog_density(&self) -> f32 {
        self.fog_density
    }

    pub fn set_fog_density(&mut self, density: f32) {
        self.fog_density = density;
    }

    #[must_use]
    pub fn fog_start(&self) -> f32 {
        self.fog_start
    }

    pub fn set_fog_start(&mut self, start: f32) {
        self.fog_start = start;
    }

    #[must_use]
    pub fn fog_end(&self) -> f32 {
        self.fog_end
    }

    pub fn set_fog_end(&mut self, end: f32) {
        self.fog_end = end;
    }

    // ========================================================================
    // Output color
    // ========================================================================

    #[must_use]
    pub fn gamma(&self) -> GammaMode {
        self.gamma
    }

    pub fn set_gamma(&mut self, gamma: GammaMode) {
        if self.gamma != gamma {
            self.gamma = gamma;
            self.update_shaders = true;
        }
    }

    #[must_use]
    pub fn tone_mapping(&self) -> ToneMapping {
        self.tone_mapping
    }

    pub fn set_tone_mapping(&mut self, tone_mapping: ToneMapping) {
        if self.tone_mapping != tone_mapping {
            self.tone_mapping = tone_mapping;
            self.update_shaders = true;
        }
    }

    // ========================================================================
    // Skybox
    // ========================================================================

    #[must_use]
    pub fn skybox(&self) -> Option<&TextureHandle> {
        self.skybox_base.as_ref()
    }

    #[must_use]
    pub fn env_atlas(&self) -> Option<&TextureHandle> {
        self.env_atlas.as_ref()
    }

    /// Installs a skybox texture set.
    ///
    /// - `None` clears both the base cubemap and the environment atlas.
    /// - Element 0 is the base cubemap.
    /// - If element 1 is not a cube map, it is taken as a caller-owned,
    ///   pre-baked environment atlas.
    /// - Otherwise elements 1..=6 must be the six prefiltered mip-level
    ///   cubemaps; they are baked into an internally-owned atlas (the
    ///   previous internally-owned atlas is destroyed first).
    ///
    /// Invalid input is logged and leaves the current skybox untouched.
    pub fn set_skybox(&mut self, textures: Option<&[TextureHandle]>) {
        let changed = match textures {
            None => {
                if self.skybox_base.is_none() && self.env_atlas.is_none() {
                    return;
                }
                self.clear_env_atlas();
                self.skybox_base = None;
                true
            }
            Some(list) => match self.apply_skybox(list) {
                Ok(changed) => changed,
                Err(err) => {
                    log::error!("Ignoring invalid skybox texture set: {err}");
                    return;
                }
            },
        };

        if changed {
            self.sky = None;
            self.update_shaders = true;
            self.observers.fire(&SceneEvent::SkyboxChanged);
        }
    }

    fn apply_skybox(&mut self, list: &[TextureHandle]) -> Result<bool> {
        let base = list
            .first()
            .ok_or_else(|| PrismError::CubeMap("empty texture list".into()))?;
        if base.kind != TextureKind::Cube {
            return Err(PrismError::TextureKindMismatch {
                expected: TextureKind::Cube.as_str(),
                actual: base.kind.as_str(),
            });
        }

        // Pre-baked atlas supplied by the caller?
        if list.len() == 2 && list[1].kind != TextureKind::Cube {
            let atlas = &list[1];
            let changed = !same_texture(self.skybox_base.as_ref(), Some(base))
                || !same_texture(self.env_atlas.as_ref(), Some(atlas));
            if changed {
                self.clear_env_atlas();
                self.skybox_base = Some(Arc::clone(base));
                self.env_atlas = Some(Arc::clone(atlas));
            }
            return Ok(changed);
        }

        // Base only.
        if list.len() == 1 {
            let changed = !same_texture(self.skybox_base.as_ref(), Some(base))
                || self.env_atlas.is_some();
            if changed {
                self.clear_env_atlas();
                self.skybox_base = Some(Arc::clone(base));
            }
            return Ok(changed);
        }

        // Six prefiltered mip cubemaps to bake.
        let mips = &list[1..];
        if mips.len() != 6 {
            return Err(PrismError::CubeMap(format!(
                "expected 6 prefiltered mip cubemaps, got {}",
                mips.len()
            )));
        }
        for mip in mips {
            if mip.kind != TextureKind::Cube {
                return Err(PrismError::TextureKindMismatch {
                    expected: TextureKind::Cube.as_str(),
                    actual: mip.kind.as_str(),
                });
            }
        }

        self.clear_env_atlas();
        self.skybox_base = Some(Arc::clone(base));
        self.env_atlas = Some(Arc::new(Texture::new(
            "env-atlas",
            TextureKind::Tex2D,
            6,
        )));
        self.env_atlas_owned = true;
        Ok(true)
    }

    fn clear_env_atlas(&mut self) {
        if self.env_atlas_owned {
            if let Some(atlas) = self.env_atlas.take() {
                log::debug!("Destroying baked environment atlas '{}'", atlas.name);
            }
        }
        self.env_atlas = None;
        self.env_atlas_owned = false;
    }

    #[must_use]
    pub fn skybox_intensity(&self) -> f32 {
        self.skybox_intensity
    }

    pub fn set_skybox_intensity(&mut self, intensity: f32) {
        if (self.skybox_intensity - intensity).abs() > f32::EPSILON {
            self.skybox_intensity = intensity;
            self.sky = None;
            self.update_shaders = true;
        }
    }

    #[must_use]
    pub fn skybox_luminance(&self) -> f32 {
        self.skybox_luminance
    }

    pub fn set_skybox_luminance(&mut self, luminance: f32) {
        if (self.skybox_luminance - luminance).abs() > f32::EPSILON {
            self.skybox_luminance = luminance;
            self.sky = None;
            self.update_shaders = true;
        }
    }

    #[must_use]
    pub fn skybox_mip(&self) -> u32 {
        self.skybox_mip
    }

    /// Selects which texture the dome samples (base cubemap at 0, atlas
    /// otherwise), which is a shader-source decision.
    pub fn set_skybox_mip(&mut self, mip: u32) {
        if self.skybox_mip != mip {
            self.skybox_mip = mip;
            self.sky = None;
            self.update_shaders = true;
        }
    }

    #[must_use]
    pub fn skybox_rotation(&self) -> Quat {
        self.skybox_rotation
    }

    /// See the module docs: invalidates programs only on the first
    /// transition away from identity.
    pub fn set_skybox_rotation(&mut self, rotation: Quat) {
        if self.skybox_rotation == rotation {
            return;
        }
        if !self.skybox_rotation_shader_include && rotation != Quat::IDENTITY {
            self.skybox_rotation_shader_include = true;
            self.update_shaders = true;
        }
        self.skybox_rotation = rotation;
        self.sky = None;
    }

    /// The renderable sky dome, built lazily from the current settings.
    pub fn sky(&mut self) -> &Sky {
        let texture = if self.skybox_mip == 0 {
            self.skybox_base.as_ref().or(self.env_atlas.as_ref())
        } else {
            self.env_atlas.as_ref()
        }
        .map(Arc::clone);
        let mip = self.skybox_mip;
        let rotation = self.skybox_rotation;

        self.sky.get_or_insert_with(|| {
            log::debug!("Building sky render object (mip {mip})");
            Sky {
                texture,
                mip,
                rotation,
            }
        })
    }

    /// Whether the sky dome is currently built.
    #[must_use]
    pub fn has_sky(&self) -> bool {
        self.sky.is_some()
    }

    // ========================================================================
    // Clustered lighting
    // ========================================================================

    #[must_use]
    pub fn clustered_lighting_enabled(&self) -> bool {
        self.clustered_lighting
    }

    /// One-way, backend-conditional switch: disabling is refused when the
    /// backend has no other lighting path, and once disabled it cannot be
    /// turned back on (the per-light clustered state has been torn down).
    pub fn set_clustered_lighting_enabled(&mut self, enabled: bool) {
        if self.clustered_lighting == enabled {
            return;
        }
        if !enabled && self.caps.clustered_only {
            log::warn!("This graphics backend only supports clustered lighting");
            return;
        }
        if enabled {
            log::error!("Turning clustered lighting back on is not currently supported");
            return;
        }
        self.clustered_lighting = false;
        self.update_shaders = true;
    }

    // ========================================================================
    // Layers
    // ========================================================================

    #[must_use]
    pub fn layers(&self) -> &[LayerId] {
        &self.layers
    }

    pub fn set_layers(&mut self, layers: Vec<LayerId>) {
        if self.layers != layers {
            self.layers = layers;
            self.observers.fire(&SceneEvent::LayersChanged);
        }
    }

    // ========================================================================
    // Lightmapping
    // ========================================================================

    #[must_use]
    pub fn lightmap_size_multiplier(&self) -> f32 {
        self.lightmap_size_multiplier
    }

    pub fn set_lightmap_size_multiplier(&mut self, multiplier: f32) {
        self.lightmap_size_multiplier = multiplier;
    }

    #[must_use]
    pub fn lightmap_max_resolution(&self) -> u32 {
        self.lightmap_max_resolution
    }

    pub fn set_lightmap_max_resolution(&mut self, resolution: u32) {
        self.lightmap_max_resolution = resolution;
    }

    #[must_use]
    pub fn lightmap_hdr(&self) -> bool {
        self.lightmap_hdr
    }

    pub fn set_lightmap_hdr(&mut self, hdr: bool) {
        self.lightmap_hdr = hdr;
    }
}

impl Default for SceneSettings {
    fn default() -> Self {
        Self::new(BackendCaps::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cube(name: &str) -> TextureHandle {
        Arc::new(Texture::new(name, TextureKind::Cube, 1))
    }

    fn tex2d(name: &str) -> TextureHandle {
        Arc::new(Texture::new(name, TextureKind::Tex2D, 1))
    }

    #[test]
    fn skybox_rejects_non_cube_base() {
        let mut settings = SceneSettings::default();
        settings.take_update_shaders();

        settings.set_skybox(Some(&[tex2d("not-a-cube")]));
        assert!(settings.skybox().is_none());
        assert!(!settings.needs_shader_update());
    }

    #[test]
    fn skybox_bakes_six_mip_cubemaps_into_owned_atlas() {
        let mut settings = SceneSettings::default();
        let mut list = vec![cube("base")];
        for i in 0..6 {
            list.push(cube(&format!("mip{i}")));
        }

        settings.set_skybox(Some(&list));
        assert!(settings.skybox().is_some());
        assert!(settings.env_atlas().is_some());
        assert_eq!(settings.env_atlas().unwrap().kind, TextureKind::Tex2D);
    }

    #[test]
    fn skybox_wrong_mip_count_is_rejected() {
        let mut settings = SceneSettings::default();
        settings.take_update_shaders();

        let list = vec![cube("base"), cube("mip0"), cube("mip1")];
        settings.set_skybox(Some(&list));
        assert!(settings.skybox().is_none());
    }

    #[test]
    fn skybox_accepts_prebaked_atlas() {
        let mut settings = SceneSettings::default();
        let list = vec![cube("base"), tex2d("atlas")];

        settings.set_skybox(Some(&list));
        assert!(same_texture(settings.env_atlas(), Some(&list[1])));
        assert!(settings.has_env_lighting());
    }

    #[test]
    fn rotation_invalidates_once() {
        let mut settings = SceneSettings::default();
        settings.take_update_shaders();

        settings.set_skybox_rotation(Quat::from_rotation_y(0.5));
        assert!(settings.take_update_shaders());

        settings.set_skybox_rotation(Quat::from_rotation_y(1.0));
        assert!(!settings.needs_shader_update());

        // Equality-gated as well.
        settings.set_skybox_rotation(Quat::from_rotation_y(1.0));
        assert!(!settings.needs_shader_update());
    }

    #[test]
    fn clustered_switch_is_one_way() {
        let mut settings = SceneSettings::default();
        settings.set_clustered_lighting_enabled(false);
        assert!(!settings.clustered_lighting_enabled());

        settings.set_clustered_lighting_enabled(true);
        assert!(!settings.clustered_lighting_enabled());

        let mut clustered_only = SceneSettings::new(BackendCaps { clustered_only: true });
        clustered_only.set_clustered_lighting_enabled(false);
        assert!(clustered_only.clustered_lighting_enabled());
    }

    #[test]
    fn sky_affecting_setters_invalidate_programs() {
        let mut settings = SceneSettings::default();
        settings.take_update_shaders();

        // A changed value must both drop the sky cache and obsolete the
        // compiled programs.
        let _ = settings.sky();
        settings.set_skybox_intensity(2.0);
        assert!(!settings.has_sky());
        assert!(settings.take_update_shaders());

        let _ = settings.sky();
        settings.set_skybox_luminance(40.0);
        assert!(!settings.has_sky());
        assert!(settings.take_update_shaders());

        // Writing the current values back does neither.
        settings.set_skybox_intensity(2.0);
        settings.set_skybox_luminance(40.0);
        assert!(!settings.needs_shader_update());
    }

    #[test]
    fn sky_cache_drops_on_sky_affecting_setters() {
        let mut settings = SceneSettings::default();
        let _ = settings.sky();
        assert!(settings.has_sky());

        settings.set_skybox_intensity(2.0);
        assert!(!settings.has_sky());

        let _ = settings.sky();
        settings.set_skybox_intensity(2.0); // unchanged, cache survives
        assert!(settings.has_sky());
    }
}
