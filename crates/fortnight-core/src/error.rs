//! Configuration error types.

use thiserror::Error;

/// Errors raised while building a [`WindowConfig`](crate::WindowConfig).
///
/// The calculator itself never fails: every instant has a well-defined answer
/// once a configuration has been validated.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// Parity was not 0 (even weeks) or 1 (odd weeks).
    #[error("parity must be 0 (even weeks) or 1 (odd weeks), got {0}")]
    InvalidParity(i64),

    /// An hour field was outside 0-23.
    #[error("{field} must be 0-23, got {hour}")]
    InvalidHour { field: &'static str, hour: u32 },

    /// The configured end does not fall after the start.
    #[error("window must end after it starts")]
    EmptyWindow,

    /// Weekday name could not be parsed.
    #[error("unknown weekday: {0}")]
    UnknownWeekday(String),

    /// Cycle name could not be parsed.
    #[error("unknown cycle: {0} (expected weekly or biweekly)")]
    UnknownCycle(String),
}

impl ConfigError {
    /// Stable machine-readable code for the error.
    pub fn code(&self) -> &'static str {
        match self {
            ConfigError::InvalidParity(_) => "invalid_parity",
            ConfigError::InvalidHour { .. } => "invalid_hour",
            ConfigError::EmptyWindow => "empty_window",
            ConfigError::UnknownWeekday(_) => "unknown_weekday",
            ConfigError::UnknownCycle(_) => "unknown_cycle",
        }
    }
}

/// Result type for configuration operations.
pub type Result<T> = std::result::Result<T, ConfigError>;
