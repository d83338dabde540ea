//! Adapter error types.

use chrono::{DateTime, Utc};
use fortnight_core::ConfigError;
use thiserror::Error;

/// Errors that stop the adapter before or after a window evaluation.
#[derive(Debug, Error)]
pub enum AppError {
    /// The window configuration was rejected.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Only one half of the end boundary was given.
    #[error("end weekday and end hour must be set together")]
    IncompleteEnd,

    /// No window start is representable after the evaluated instant.
    #[error("no window start is representable after {0}")]
    OutOfRange(DateTime<Utc>),

    /// Report could not be rendered.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl AppError {
    /// Stable machine-readable code for the error envelope.
    pub fn code(&self) -> &'static str {
        match self {
            AppError::Config(err) => err.code(),
            AppError::IncompleteEnd => "incomplete_end",
            AppError::OutOfRange(_) => "out_of_range",
            AppError::Json(_) => "internal_error",
        }
    }

    /// Returns true for errors caused by the supplied configuration.
    pub fn is_config(&self) -> bool {
        matches!(self, AppError::Config(_) | AppError::IncompleteEnd)
    }

    /// Process exit status: 2 for rejected configuration, 1 otherwise.
    pub fn exit_code(&self) -> u8 {
        if self.is_config() {
            2
        } else {
            1
        }
    }
}

/// Result type for adapter operations.
pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_follow_the_config_error() {
        let err = AppError::from(ConfigError::InvalidParity(2));
        assert_eq!(err.code(), "invalid_parity");
        assert!(err.is_config());
        assert_eq!(
            err.to_string(),
            "parity must be 0 (even weeks) or 1 (odd weeks), got 2"
        );
    }

    #[test]
    fn incomplete_end_is_a_config_error() {
        assert_eq!(AppError::IncompleteEnd.code(), "incomplete_end");
        assert!(AppError::IncompleteEnd.is_config());
        assert_eq!(AppError::IncompleteEnd.exit_code(), 2);
    }

    #[test]
    fn out_of_range_is_not_a_config_error() {
        let err = AppError::OutOfRange(DateTime::<Utc>::MAX_UTC);
        assert_eq!(err.code(), "out_of_range");
        assert!(!err.is_config());
        assert_eq!(err.exit_code(), 1);
    }
}
