//! Error types for particle-field generation and rendering surfaces.

use thiserror::Error;

/// Errors produced while building outlines, point clouds and keyframe sequences.
#[derive(Debug, Clone, PartialEq, Error)]
#[non_exhaustive]
pub enum ParticleError {
    #[error("outline has no usable contour (needs at least 3 vertices)")]
    EmptyOutline,

    #[error("keyframe sequence needs at least 2 keyframes, got {count}")]
    TooFewKeyframes { count: usize },

    #[error("keyframe {index} has {found} particles, expected {expected}")]
    KeyframeLengthMismatch {
        index: usize,
        expected: usize,
        found: usize,
    },

    #[error("invalid config: {reason}")]
    InvalidConfig { reason: String },
}

/// Failures while acquiring or driving a rendering surface.
///
/// These never reach the host page: the animator logs them and keeps
/// rendering nothing.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SurfaceError {
    #[error("rendering capability unsupported: {0}")]
    Unsupported(String),

    #[error("surface container is not available")]
    MissingContainer,

    #[error("rendering context lost")]
    ContextLost,
}
