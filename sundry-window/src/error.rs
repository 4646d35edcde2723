//! Error types for window configuration.

use thiserror::Error;

/// Errors raised when configuring a moving average or parsing a window length.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WindowError {
    /// The averaging window must cover some time.
    #[error("moving average window must be longer than zero")]
    ZeroWindow,

    /// Rounding precision beyond what an `f64` can represent.
    #[error("precision {precision} exceeds the maximum of {max} decimal places")]
    PrecisionTooLarge { precision: u32, max: u32 },

    /// A duration string that could not be parsed.
    #[error("invalid duration '{input}': {reason}")]
    InvalidDuration { input: String, reason: String },
}
