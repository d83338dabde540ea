//! Fortnight - command-line adapter for the window calculator.
//!
//! This crate provides the thin layer around `fortnight-core`:
//!
//! - Reading the window configuration from flags and `FORTNIGHT_*` variables
//! - Obtaining the current UTC instant
//! - Rendering the result (or a configuration error) as JSON
//!
//! # Usage
//!
//! ```
//! use clap::Parser;
//! use fortnight_app::{evaluate, Args, SystemClock};
//!
//! let args = Args::parse_from(["fortnight", "--at", "2020-11-20T16:00:00Z"]);
//! let report = evaluate(&args, &SystemClock).unwrap();
//! assert!(report.in_window);
//! assert_eq!(report.nanos_to_window, 0);
//! ```

pub mod cli;
pub mod clock;
pub mod error;
pub mod report;

use fortnight_core::WindowCalculator;
use tracing::{debug, info};

pub use cli::Args;
pub use clock::{Clock, FixedClock, SystemClock};
pub use error::{AppError, Result};
pub use report::{to_json, ErrorResponse, WindowReport};

/// Validates the configuration and evaluates the window at the requested instant.
///
/// Configuration errors are returned before any window computation happens.
/// Instants in the last weeks of the representable range, where no later
/// start exists, yield [`AppError::OutOfRange`].
pub fn evaluate(args: &Args, clock: &impl Clock) -> Result<WindowReport> {
    let config = args.window_config()?;
    debug!("Window configuration: {:?}", config);

    let instant = args.instant(clock);
    let status = WindowCalculator::new(config).status(instant);
    info!(
        "Evaluated {} (in_window={}, next_window_start={:?})",
        instant, status.in_window, status.next_window_start
    );

    WindowReport::new(instant, &config, &status)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, TimeZone, Utc};
    use clap::Parser;

    #[test]
    fn evaluates_at_the_clock_instant() {
        let clock = FixedClock(Utc.with_ymd_and_hms(2020, 11, 16, 11, 0, 0).unwrap());
        let args = Args::parse_from(["fortnight"]);

        let report = evaluate(&args, &clock).unwrap();
        assert!(!report.in_window);
        assert_eq!(report.parity, 1);
        assert_eq!(
            report.nanos_to_window,
            (4 * 24 + 4) * 3_600 * 1_000_000_000_i64
        );
        assert_eq!(report.evaluated_at, clock.0);
    }

    #[test]
    fn weekly_cycle_from_flags() {
        let clock = FixedClock(Utc.with_ymd_and_hms(2020, 11, 21, 15, 0, 0).unwrap());
        let args = Args::parse_from(["fortnight", "--cycle", "weekly"]);

        let report = evaluate(&args, &clock).unwrap();
        assert_eq!(report.nanos_to_window, 6 * 24 * 3_600 * 1_000_000_000_i64);
    }

    #[test]
    fn end_of_time_reports_out_of_range() {
        let clock = FixedClock(DateTime::<Utc>::MAX_UTC);
        let args = Args::parse_from(["fortnight"]);

        let err = evaluate(&args, &clock).unwrap_err();
        assert!(matches!(err, AppError::OutOfRange(_)));
        assert_eq!(err.exit_code(), 1);
    }

    #[test]
    fn invalid_parity_stops_before_evaluation() {
        let clock = FixedClock(Utc.with_ymd_and_hms(2020, 11, 20, 16, 0, 0).unwrap());
        let args = Args::parse_from(["fortnight", "--parity", "3"]);

        let err = evaluate(&args, &clock).unwrap_err();
        assert!(err.is_config());
        assert_eq!(ErrorResponse::from(&err).code, "invalid_parity");
    }
}
