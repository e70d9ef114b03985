//! Domain-level errors (no external dependencies)

use thiserror::Error;

/// Domain errors represent violated preconditions of the layout and view model.
/// These are independent of infrastructure concerns.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DomainError {
    #[error("invalid viewport: {width}x{height} (both dimensions must be positive)")]
    InvalidViewport { width: f64, height: f64 },

    #[error("invalid gesture: {0}")]
    InvalidGesture(String),

    #[error("invalid scale extent: [{min}, {max}]")]
    InvalidScaleExtent { min: f64, max: f64 },

    #[error("empty concept tree")]
    EmptyTree,
}
