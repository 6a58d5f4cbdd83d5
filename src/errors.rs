//! Error Types
//!
//! The core keeps its fallible surface deliberately small. Runtime-reachable
//! misuse (missing component names, redundant setting changes, unsupported
//! backend toggles) is a logged no-op, and structural misuse of the graph
//! (self-parenting, cycles) is a debug assertion — neither goes through
//! [`PrismError`]. What remains is resource validation that genuinely can
//! fail with data the caller handed us, chiefly skybox/environment-atlas
//! baking.

use thiserror::Error;

/// The error type for the prism core.
#[derive(Error, Debug)]
pub enum PrismError {
    // ========================================================================
    // Texture & Environment Errors
    // ========================================================================
    /// Cube map validation error (wrong face count, mismatched mip chain…).
    #[error("Cube map error: {0}")]
    CubeMap(String),

    /// A texture was used in a role its kind does not support.
    #[error("Texture kind mismatch: expected {expected}, got {actual}")]
    TextureKindMismatch {
        /// The kind the operation required.
        expected: &'static str,
        /// The kind that was supplied.
        actual: &'static str,
    },

    // ========================================================================
    // Material & Program Errors
    // ========================================================================
    /// A shader template name was not registered with the program library.
    #[error("Unknown shader template: {0}")]
    UnknownTemplate(String),
}

/// Alias for `Result<T, PrismError>`.
pub type Result<T> = std::result::Result<T, PrismError>;
