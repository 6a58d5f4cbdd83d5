//! Global string interner.
//!
//! Turns strings into compact integer [`Symbol`]s so that the hot paths
//! (shader define sets, component names, node tags) compare and hash
//! integers instead of strings. This is the foundation of the variant-key
//! system: two define sets built from the same strings always produce the
//! same symbols, and therefore the same hash.

use lasso::{Spur, ThreadedRodeo};
use once_cell::sync::Lazy;

static INTERNER: Lazy<ThreadedRodeo> = Lazy::new(ThreadedRodeo::new);

/// A compact integer identifier for an interned string.
pub type Symbol = Spur;

/// Interns a string, returning its [`Symbol`].
///
/// Returns the existing symbol if the string was interned before.
#[inline]
pub fn intern(s: &str) -> Symbol {
    INTERNER.get_or_intern(s)
}

/// Looks up the [`Symbol`] of an already-interned string without allocating.
#[inline]
#[must_use]
pub fn get(s: &str) -> Option<Symbol> {
    INTERNER.get(s)
}

/// Resolves a [`Symbol`] back to its string.
///
/// # Panics
/// Panics if the symbol did not come from this interner (should not happen).
#[inline]
#[must_use]
pub fn resolve(sym: Symbol) -> &'static str {
    INTERNER.resolve(&sym)
}

/// Pre-interns the macro names the variant builder emits every frame, so the
/// first frame does not pay interner writes on the hot path.
pub fn preload_common_symbols() {
    let common = [
        // Surface feature macros
        "HAS_NORMAL_MAP",
        "HAS_METALNESS",
        "HAS_CLEARCOAT",
        "HAS_SHEEN",
        "HAS_REFRACTION",
        "HAS_IRIDESCENCE",
        "HAS_AO_MAP",
        "HAS_SPECULAR",
        "HAS_EMISSIVE",
        "HAS_OPACITY_MAP",
        "HAS_LIGHTMAP",
        "HAS_VERTEX_COLORS",
        // Object macros
        "SKINNED",
        "INSTANCED",
        "MORPH_POSITION",
        "MORPH_NORMAL",
        // Scene macros
        "LIGHTING_MODEL",
        "FOG_MODE",
        "GAMMA_MODE",
        "TONE_MAPPING",
        "CLUSTERED_LIGHTING",
        "SKYBOX_ROTATION",
        "DIR_LIGHT_COUNT",
        "OMNI_LIGHT_COUNT",
        "SPOT_LIGHT_COUNT",
        // Common values
        "1",
        "0",
        "true",
    ];

    for name in common {
        intern(name);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn intern_is_stable() {
        let a = intern("prism_test_symbol");
        let b = intern("prism_test_symbol");
        let c = intern("prism_other_symbol");

        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_eq!(resolve(a), "prism_test_symbol");
    }

    #[test]
    fn get_does_not_intern() {
        let _ = intern("prism_existing");
        assert!(get("prism_existing").is_some());
        assert!(get("prism_never_interned_xyz").is_none());
    }
}
