//! Shader macro sets.
//!
//! Both keys and values are interned [`Symbol`]s, so a macro set is a sorted
//! `Vec` of integer pairs: comparison is a memcmp, hashing is stable across
//! insertion order, and duplicate strings share storage. Sort order is the
//! symbol's numeric id, not lexicographic — irrelevant for caching, which
//! only needs *equal sets ⇒ equal hash*.

use std::hash::{Hash, Hasher};

use crate::utils::interner::{self, Symbol};

/// A set of preprocessor macro definitions handed to shader generation.
#[derive(Debug, Clone, Default)]
pub struct ShaderDefines {
    defines: Vec<(Symbol, Symbol)>,
}

impl ShaderDefines {
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a macro, replacing any previous value for the key.
    pub fn set(&mut self, key: &str, value: &str) {
        self.set_symbol(interner::intern(key), interner::intern(value));
    }

    /// Sets a valueless flag macro (`KEY` = `1`).
    pub fn set_flag(&mut self, key: &str) {
        self.set(key, "1");
    }

    /// Symbol-level insert, keeps the vector sorted.
    #[inline]
    pub fn set_symbol(&mut self, key: Symbol, value: Symbol) {
        match self.defines.binary_search_by_key(&key, |&(k, _)| k) {
            Ok(idx) => self.defines[idx].1 = value,
            Err(idx) => self.defines.insert(idx, (key, value)),
        }
    }

    /// Removes a macro; returns whether it was present.
    pub fn remove(&mut self, key: &str) -> bool {
        let Some(sym) = interner::get(key) else {
            return false;
        };
        match self.defines.binary_search_by_key(&sym, |&(k, _)| k) {
            Ok(idx) => {
                self.defines.remove(idx);
                true
            }
            Err(_) => false,
        }
    }

    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        interner::get(key)
            .is_some_and(|sym| self.defines.binary_search_by_key(&sym, |&(k, _)| k).is_ok())
    }

    /// Looks up a macro value.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&'static str> {
        let sym = interner::get(key)?;
        self.defines
            .binary_search_by_key(&sym, |&(k, _)| k)
            .ok()
            .map(|idx| interner::resolve(self.defines[idx].1))
    }

    #[inline]
    pub fn clear(&mut self) {
        self.defines.clear();
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.defines.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.defines.is_empty()
    }

    /// Iterates `(key, value)` pairs in symbol order.
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &'static str)> + '_ {
        self.defines
            .iter()
            .map(|&(k, v)| (interner::resolve(k), interner::resolve(v)))
    }

    /// Folds another set into this one; `other` wins on conflicts.
    pub fn merge(&mut self, other: &ShaderDefines) {
        for &(key, value) in &other.defines {
            self.set_symbol(key, value);
        }
    }

    /// Stable content hash for cache keys.
    #[must_use]
    pub fn compute_hash(&self) -> u64 {
        use std::hash::BuildHasher;

        rustc_hash::FxBuildHasher.hash_one(self)
    }
}

impl Hash for ShaderDefines {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.defines.hash(state);
    }
}

impl PartialEq for ShaderDefines {
    fn eq(&self, other: &Self) -> bool {
        self.defines == other.defines
    }
}

impl Eq for ShaderDefines {}

impl From<&[(&str, &str)]> for ShaderDefines {
    fn from(pairs: &[(&str, &str)]) -> Self {
        let mut out = Self::new();
        for (k, v) in pairs {
            out.set(k, v);
        }
        out
    }
}
