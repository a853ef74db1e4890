//! Error types for date normalization.

use thiserror::Error;

/// Errors that can occur while normalizing date-like values.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum NormalizeError {
    /// None of the interpretation rules produced a valid date.
    #[error("unrecognised date format: {input}")]
    UnrecognisedDateFormat {
        /// The original input, rendered for diagnostics.
        input: String,
    },

    /// A local zone setting could not be understood.
    #[error("invalid zone offset: {0}")]
    InvalidZone(String),
}

impl NormalizeError {
    /// Builds an [`NormalizeError::UnrecognisedDateFormat`] from any displayable input.
    pub fn unrecognised(input: impl ToString) -> Self {
        Self::UnrecognisedDateFormat {
            input: input.to_string(),
        }
    }

    /// Returns the rejected input when this is an unrecognised-format error.
    #[must_use]
    pub fn input(&self) -> Option<&str> {
        match self {
            Self::UnrecognisedDateFormat { input } => Some(input),
            Self::InvalidZone(_) => None,
        }
    }
}

/// Result type alias for normalization operations.
pub type Result<T> = std::result::Result<T, NormalizeError>;
