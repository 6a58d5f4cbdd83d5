//! The standard surface material.
//!
//! [`StandardMaterial`] carries the feature state (which maps are bound,
//! which shading model, which UV channels the maps read, chunk overrides)
//! and turns a render request into a compiled program through
//! [`shader_variant`](StandardMaterial::shader_variant). The material holds
//! no GPU state itself; programs live in the per-device [`ProgramLibrary`].
//!
//! [`ProgramLibrary`]: crate::material::ProgramLibrary

use crate::errors::Result;
use crate::material::defines::ShaderDefines;
use crate::material::library::{ProgramCompiler, ProgramHandle, ProgramLibrary};
use crate::material::variant::{LightingModel, ObjectDefs, PassKind, StandardMaterialFlags};
use crate::scene::light::{Light, LightingShape};
use crate::scene::settings::SceneSettings;

/// Surface material with feature flags and per-chunk shader overrides.
#[derive(Debug, Clone, Default)]
pub struct StandardMaterial {
    pub name: String,
    flags: StandardMaterialFlags,
    lighting_model: LightingModel,
    /// Bitmask of UV channels read by the bound maps.
    uv_channels: u8,
    chunk_overrides: ShaderDefines,
}

impl StandardMaterial {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn flags(&self) -> StandardMaterialFlags {
        self.flags
    }

    /// Sets or clears a feature flag.
    pub fn set_flag(&mut self, flag: StandardMaterialFlags, on: bool) {
        self.flags.set(flag, on);
    }

    #[must_use]
    pub fn lighting_model(&self) -> LightingModel {
        self.lighting_model
    }

    pub fn set_lighting_model(&mut self, model: LightingModel) {
        self.lighting_model = model;
    }

    /// Declares that a bound map reads the given UV channel.
    pub fn use_uv_channel(&mut self, channel: u8) {
        self.uv_channels |= 1 << channel;
    }

    /// Overrides a named shader chunk (free-form macro fed into generation).
    pub fn override_chunk(&mut self, key: &str, value: &str) {
        self.chunk_overrides.set(key, value);
    }

    /// Removes a chunk override; returns whether it was present.
    pub fn clear_chunk_override(&mut self, key: &str) -> bool {
        self.chunk_overrides.remove(key)
    }

    /// Resolves the compiled program for rendering this material in the
    /// given pass, against the given scene state, object defines and sorted
    /// light list.
    ///
    /// Deterministic: structurally equal inputs yield the same handle with
    /// no recompilation (see the library's determinism contract).
    pub fn shader_variant(
        &self,
        compiler: &mut dyn ProgramCompiler,
        library: &mut ProgramLibrary,
        settings: &SceneSettings,
        object: ObjectDefs,
        pass: PassKind,
        sorted_lights: &[&Light],
    ) -> Result<ProgramHandle> {
        let shape = LightingShape::from_lights(sorted_lights.iter().copied());

        let key = {
            let builder = library.builder();
            builder
                .material(self.flags, self.lighting_model)
                .object(object)
                .pass(pass)
                .scene(settings)
                .lights(shape)
                .defines(&self.chunk_overrides);
            for channel in 0..8 {
                if self.uv_channels & (1 << channel) != 0 {
                    builder.uv_channel(channel);
                }
            }
            builder.finalize()
        };

        library.get_program(compiler, Self::TEMPLATE, &key)
    }

    /// Template every standard material compiles from.
    pub const TEMPLATE: &'static str = "standard";
}
