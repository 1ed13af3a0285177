//! Lighting engine error types

use thiserror::Error;

/// Errors from constructing lighting primitives.
///
/// All of these are raised eagerly at construction time, never deferred
/// to first use.
#[derive(Error, Debug)]
pub enum LightingError {
    /// A gradient needs at least two key points to interpolate between
    #[error("Gradient needs at least two key points, got {0}")]
    TooFewKeyPoints(usize),

    /// Gradient key points must cover a strictly positive span
    #[error("Gradient key points must span a positive range")]
    EmptySpan,

    /// A key name that is not part of the physical layout
    #[error("Unknown key name: {0}")]
    UnknownKey(String),

    /// Periodic functions need a positive period
    #[error("Period must be positive, got {0}")]
    InvalidPeriod(f64),

    /// Reactive envelopes need a positive decay time
    #[error("Decay must be positive, got {0}")]
    InvalidDecay(f64),
}
