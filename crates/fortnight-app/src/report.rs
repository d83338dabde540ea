//! JSON envelopes written to stdout.

use chrono::{DateTime, Utc};
use fortnight_core::{WindowConfig, WindowStatus};
use serde::Serialize;

use crate::error::{AppError, Result};

/// Successful evaluation.
///
/// `nanos_to_window` is zero exactly when `in_window` is true.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WindowReport {
    pub in_window: bool,
    /// Configured week parity (0 or 1).
    pub parity: u32,
    pub nanos_to_window: i64,
    pub next_window_start: DateTime<Utc>,
    pub evaluated_at: DateTime<Utc>,
}

impl WindowReport {
    /// Builds the report, failing when the next window cannot be represented.
    pub fn new(
        evaluated_at: DateTime<Utc>,
        config: &WindowConfig,
        status: &WindowStatus,
    ) -> Result<Self> {
        let out_of_range = || AppError::OutOfRange(evaluated_at);
        let next_window_start = status.next_window_start.ok_or_else(out_of_range)?;
        let nanos_to_window = status
            .time_to_window
            .num_nanoseconds()
            .ok_or_else(out_of_range)?;

        Ok(Self {
            in_window: status.in_window,
            parity: config.parity().value(),
            nanos_to_window,
            next_window_start,
            evaluated_at,
        })
    }
}

/// Error response body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
}

impl From<&AppError> for ErrorResponse {
    fn from(err: &AppError) -> Self {
        Self {
            error: err.to_string(),
            code: err.code().to_string(),
        }
    }
}

/// Serializes an envelope, optionally pretty-printed.
pub fn to_json<T: Serialize>(value: &T, pretty: bool) -> Result<String> {
    let json = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    Ok(json)
}
