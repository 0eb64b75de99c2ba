/*!
Error types for share-code decoding.

Every error here describes malformed user input. Nothing is transient, so
nothing is retried.
*/

use thiserror::Error;

/// Common result type used throughout the crosshair core
pub type Result<T> = std::result::Result<T, CrosshairError>;

/// Errors raised while turning a share code into a configuration
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CrosshairError {
    /// The string does not look like `CSGO-XXXXX-XXXXX-XXXXX-XXXXX-XXXXX`
    #[error("Invalid share code format: {0:?} (expected CSGO-XXXXX-XXXXX-XXXXX-XXXXX-XXXXX)")]
    Format(String),

    /// A character outside the 57-symbol share-code alphabet
    #[error("Invalid character in share code: {0:?}")]
    InvalidCharacter(char),

    /// The decoded buffer is shorter than the bit-field layout requires
    #[error("Not enough bytes to decode crosshair: need at least {needed}, got {actual}")]
    InsufficientData { needed: usize, actual: usize },
}

impl CrosshairError {
    /// Create a new format error for the given input
    pub fn format(input: impl Into<String>) -> Self {
        Self::Format(input.into())
    }

    /// Create a new insufficient data error
    pub fn insufficient_data(needed: usize, actual: usize) -> Self {
        Self::InsufficientData { needed, actual }
    }

    /// Check if this error came from the textual share-code layer
    pub fn is_share_code_error(&self) -> bool {
        matches!(self, Self::Format(_) | Self::InvalidCharacter(_))
    }
}
