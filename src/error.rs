//! Error types for shape configuration.

use thiserror::Error;

/// Errors raised when a shape configuration is rejected at build entry.
///
/// These are fatal to the build that supplied the configuration, never to
/// the process. Recoverable refinement skips (degenerate triangles, empty
/// buffers) are reported as a `false` return instead.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ShapeError {
    /// Grid length too small to form a single quad.
    #[error("grid length must be at least 2, got {0}")]
    GridTooSmall(usize),

    /// A slope, radius, or spacing parameter was negative.
    #[error("{name} must be non-negative, got {value}")]
    NegativeParameter {
        /// Parameter name.
        name: &'static str,
        /// Rejected value.
        value: f32,
    },

    /// A range parameter pair had its bounds crossed.
    #[error("{name} range is inverted: min {min} exceeds max {max}")]
    InvertedRange {
        /// Parameter name.
        name: &'static str,
        /// Lower bound supplied.
        min: f32,
        /// Upper bound supplied.
        max: f32,
    },
}
