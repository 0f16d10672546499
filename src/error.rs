//! Errors raised at the configuration boundary
//!
//! The simulation itself never fails: out-of-range values are clamped and an
//! empty crowd is a game state, not an error.

use thiserror::Error;

/// Level number outside the playable range
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("level {0} does not exist (expected 1-3)")]
pub struct LevelError(pub u8);

/// Invalid tuning table
#[derive(Debug, Error)]
pub enum TuningError {
    #[error("malformed tuning JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("{field}: range {min}..={max} is inverted")]
    InvertedRange {
        field: &'static str,
        min: u32,
        max: u32,
    },
    #[error("{field} must be greater than zero")]
    Zero { field: &'static str },
    #[error("scroll_speed must be positive and finite, got {0}")]
    ScrollSpeed(f32),
}
