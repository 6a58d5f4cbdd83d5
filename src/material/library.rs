//! Per-device program store.
//!
//! [`ProgramLibrary`] owns everything variant-related that is scoped to one
//! graphics device: the template registry (template name → source
//! generator), the variant cache and the shared [`VariantBuilder`] scratch.
//! The device itself stays opaque behind [`ProgramCompiler`].
//!
//! # Determinism contract
//!
//! `get_program` compiles at most once per distinct `(template, key)` pair;
//! a second request with a structurally equal key returns the cached handle
//! without touching the compiler. [`compile_count`](ProgramLibrary::compile_count)
//! exists so tests can observe that directly.

use rustc_hash::FxHashMap;

use crate::errors::{PrismError, Result};
use crate::material::variant::{VariantBuilder, VariantKey};
use crate::scene::settings::SceneSettings;
use crate::utils::interner::{self, Symbol};

/// Opaque handle to a compiled GPU program, issued by the device compiler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ProgramHandle(pub u32);

/// Uniform-buffer and bind-group layout contract a compiled program must
/// satisfy. Opaque to the core; the device compiler interprets it.
#[derive(Debug, Clone, Copy)]
pub struct ShaderProcessorOptions {
    pub max_bind_groups: u32,
    pub max_uniform_buffer_slots: u32,
}

impl Default for ShaderProcessorOptions {
    fn default() -> Self {
        Self {
            max_bind_groups: 4,
            max_uniform_buffer_slots: 8,
        }
    }
}

/// The device-side shader compiler. Synchronous; each call is assumed to
/// produce a live program for the handle it returns.
pub trait ProgramCompiler {
    /// Compiles generated source under the given layout contract.
    fn compile(&mut self, source: &str, options: &ShaderProcessorOptions) -> ProgramHandle;
}

/// Generates shader source for one template, specialized by a variant key.
pub type TemplateFn = Box<dyn Fn(&VariantKey) -> String>;

/// Per-device template registry, variant cache and builder scratch.
pub struct ProgramLibrary {
    templates: FxHashMap<Symbol, TemplateFn>,
    cache: FxHashMap<(Symbol, VariantKey), ProgramHandle>,
    builder: VariantBuilder,
    options: ShaderProcessorOptions,
    compile_count: u64,
}

impl ProgramLibrary {
    #[must_use]
    pub fn new(options: ShaderProcessorOptions) -> Self {
        interner::preload_common_symbols();
        Self {
            templates: FxHashMap::default(),
            cache: FxHashMap::default(),
            builder: VariantBuilder::default(),
            options,
            compile_count: 0,
        }
    }

    /// Registers (or replaces) a source generator under a template name.
    pub fn register_template(&mut self, name: &str, generator: TemplateFn) {
        self.templates.insert(interner::intern(name), generator);
    }

    /// Whether a template is registered under this name.
    #[must_use]
    pub fn has_template(&self, name: &str) -> bool {
        interner::get(name).is_some_and(|sym| self.templates.contains_key(&sym))
    }

    /// The shared scratch builder, reset and ready for folding.
    pub fn builder(&mut self) -> &mut VariantBuilder {
        self.builder.begin()
    }

    /// Returns the program for `(template, key)`, compiling it on first
    /// request and serving the cache afterwards.
    pub fn get_program(
        &mut self,
        compiler: &mut dyn ProgramCompiler,
        template: &str,
        key: &VariantKey,
    ) -> Result<ProgramHandle> {
        let name = interner::get(template)
            .filter(|sym| self.templates.contains_key(sym))
            .ok_or_else(|| PrismError::UnknownTemplate(template.to_string()))?;

        if let Some(&handle) = self.cache.get(&(name, key.clone())) {
            return Ok(handle);
        }

        let source = (self.templates[&name])(key);
        let handle = compiler.compile(&source, &self.options);
        self.compile_count += 1;
        log::debug!(
            "Compiled shader variant #{} for template '{template}' (hash {:016x})",
            self.compile_count,
            key.compute_hash()
        );
        self.cache.insert((name, key.clone()), handle);
        Ok(handle)
    }

    /// How many compilations the device has performed for this library.
    #[must_use]
    pub fn compile_count(&self) -> u64 {
        self.compile_count
    }

    /// Number of distinct cached variants.
    #[must_use]
    pub fn variant_count(&self) -> usize {
        self.cache.len()
    }

    /// Drops every cached variant; templates stay registered. Subsequent
    /// requests recompile.
    pub fn flush(&mut self) {
        if !self.cache.is_empty() {
            log::debug!("Flushing {} cached shader variants", self.cache.len());
        }
        self.cache.clear();
    }
}

/// The once-per-change-batch recompilation pass: consumes the scene's
/// shader-invalidation flag and flushes the variant cache when it was set.
/// Returns whether a flush happened.
pub fn refresh_programs(settings: &mut SceneSettings, library: &mut ProgramLibrary) -> bool {
    if settings.take_update_shaders() {
        library.flush();
        true
    } else {
        false
    }
}
