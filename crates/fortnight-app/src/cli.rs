//! Command-line and environment configuration.
//!
//! Every window setting can come from a flag or from a `FORTNIGHT_*`
//! environment variable; flags win. Values are parsed loosely here and
//! validated by [`Args::window_config`], so an out-of-range parity is reported
//! as a configuration error rather than a usage error.

use chrono::{DateTime, Utc};
use clap::Parser;
use fortnight_core::{Cycle, Parity, Weekday, WindowConfig, WindowEnd};

use crate::clock::Clock;
use crate::error::{AppError, Result};

/// Fortnight - is it window time yet?
#[derive(Parser, Debug, Clone)]
#[command(name = "fortnight", version, about)]
pub struct Args {
    /// Week parity: 0 for even ISO weeks, 1 for odd ISO weeks
    #[arg(
        long,
        env = "FORTNIGHT_PARITY",
        default_value_t = 1,
        allow_negative_numbers = true
    )]
    pub parity: i64,

    /// Weekday the window opens on
    #[arg(long, env = "FORTNIGHT_START_WEEKDAY", default_value = "friday")]
    pub start_weekday: String,

    /// Hour (0-23, UTC) the window opens at
    #[arg(long, env = "FORTNIGHT_START_HOUR", default_value_t = 15)]
    pub start_hour: u32,

    /// Weekday the window closes on (requires --end-hour)
    #[arg(long, env = "FORTNIGHT_END_WEEKDAY")]
    pub end_weekday: Option<String>,

    /// Hour (0-23, UTC) the window closes at (requires --end-weekday)
    #[arg(long, env = "FORTNIGHT_END_HOUR")]
    pub end_hour: Option<u32>,

    /// Recurrence: weekly or biweekly
    #[arg(long, env = "FORTNIGHT_CYCLE", default_value = "biweekly")]
    pub cycle: String,

    /// Evaluate at this RFC 3339 instant instead of now
    #[arg(long)]
    pub at: Option<DateTime<Utc>>,

    /// Pretty-print the JSON output
    #[arg(long)]
    pub pretty: bool,

    /// Enable debug logging
    #[arg(long)]
    pub debug: bool,

    /// Set log level (error, warn, info, debug, trace)
    #[arg(long, default_value = "warn")]
    pub log_level: String,
}

impl Args {
    /// Validates the window settings into a core configuration.
    pub fn window_config(&self) -> Result<WindowConfig> {
        let end = match (&self.end_weekday, self.end_hour) {
            (None, None) => None,
            (Some(weekday), Some(hour)) => {
                Some(WindowEnd::new(weekday.parse::<Weekday>()?, hour))
            }
            _ => return Err(AppError::IncompleteEnd),
        };

        let config = WindowConfig::new(
            Parity::try_from(self.parity)?,
            self.start_weekday.parse::<Weekday>()?,
            self.start_hour,
            end,
            self.cycle.parse::<Cycle>()?,
        )?;
        Ok(config)
    }

    /// The instant to evaluate: `--at` if given, otherwise the clock.
    pub fn instant(&self, clock: &impl Clock) -> DateTime<Utc> {
        self.at.unwrap_or_else(|| clock.now())
    }

    /// Effective log level.
    pub fn log_level(&self) -> &str {
        if self.debug {
            "debug"
        } else {
            &self.log_level
        }
    }
}
