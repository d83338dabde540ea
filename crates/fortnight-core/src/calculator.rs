//! Recurring window evaluation.
//!
//! Answers two questions for an instant: is it inside the configured window,
//! and if not, how long until the window next opens. All arithmetic is done on
//! the UTC calendar: ISO week numbers pick the window weeks, weekday and hour
//! pick the start, and the configured end (or the following midnight) closes
//! each occurrence.
//!
//! ## Usage
//!
//! ```
//! use chrono::{Duration, TimeZone, Utc};
//! use fortnight_core::{WindowCalculator, WindowConfig};
//!
//! let calculator = WindowCalculator::new(WindowConfig::default());
//!
//! // Monday of ISO week 47; the window opens Friday at 15:00.
//! let monday = Utc.with_ymd_and_hms(2020, 11, 16, 11, 0, 0).unwrap();
//! assert!(!calculator.in_window(monday));
//! assert_eq!(
//!     calculator.time_to_window(monday),
//!     Duration::days(4) + Duration::hours(4)
//! );
//! ```

use chrono::{DateTime, Datelike, Duration, NaiveDate, Timelike, Utc};
use serde::Serialize;
use tracing::trace;

use crate::config::WindowConfig;
use crate::weekday::Weekday;

const NANOS_PER_SECOND: u32 = 1_000_000_000;

/// One concrete occurrence of the window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct WindowOccurrence {
    /// First instant inside the window.
    pub start: DateTime<Utc>,
    /// First instant after the window (exclusive). Clamped to the last
    /// representable instant when the occurrence runs past it.
    pub end: DateTime<Utc>,
}

impl WindowOccurrence {
    /// Returns true if the instant lies inside this occurrence.
    pub fn contains(&self, instant: DateTime<Utc>) -> bool {
        self.start <= instant && instant < self.end
    }
}

/// Both answers for one instant, computed together.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowStatus {
    /// Whether the instant is inside the window.
    pub in_window: bool,
    /// Zero while in the window, otherwise the time until it opens.
    pub time_to_window: Duration,
    /// The next start strictly after the instant, if it is representable.
    pub next_window_start: Option<DateTime<Utc>>,
    /// The occurrence containing the instant, if any.
    pub current_window: Option<WindowOccurrence>,
}

/// Evaluates a single window configuration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WindowCalculator {
    config: WindowConfig,
}

impl WindowCalculator {
    /// Creates a calculator for the given configuration.
    pub fn new(config: WindowConfig) -> Self {
        Self { config }
    }

    /// The configuration being evaluated.
    pub fn config(&self) -> &WindowConfig {
        &self.config
    }

    /// Returns true if the instant is inside the window.
    pub fn in_window(&self, instant: DateTime<Utc>) -> bool {
        in_window(instant, &self.config)
    }

    /// Returns the time until the window opens, or zero while it is open.
    pub fn time_to_window(&self, instant: DateTime<Utc>) -> Duration {
        time_to_window(instant, &self.config)
    }

    /// Returns the next start strictly after the instant, if representable.
    pub fn next_window_start(&self, instant: DateTime<Utc>) -> Option<DateTime<Utc>> {
        next_window_start(instant, &self.config)
    }

    /// Returns the occurrence containing the instant, if any.
    pub fn current_window(&self, instant: DateTime<Utc>) -> Option<WindowOccurrence> {
        current_window(instant, &self.config)
    }

    /// Evaluates everything at once.
    pub fn status(&self, instant: DateTime<Utc>) -> WindowStatus {
        status(instant, &self.config)
    }
}

/// Returns true if the instant is inside the configured window.
pub fn in_window(instant: DateTime<Utc>, config: &WindowConfig) -> bool {
    current_window(instant, config).is_some()
}

/// Returns the exact time until the window next opens, or zero while it is open.
///
/// Saturates to [`Duration::MAX`] when the next start lies beyond the last
/// representable instant, which only happens in the final weeks of chrono's
/// range.
pub fn time_to_window(instant: DateTime<Utc>, config: &WindowConfig) -> Duration {
    if in_window(instant, config) {
        return Duration::zero();
    }

    match days_until_start(instant, config) {
        Some(days) if start_relative_to(instant, days, config).is_some() => {
            // Whole days strictly between today and the start day, then the
            // start hour on top of what is left of today.
            config.start_offset() + Duration::days(days - 1) + remaining_of_day(instant)
        }
        _ => Duration::MAX,
    }
}

/// Returns the first window start strictly after the instant.
///
/// `None` when that start is not representable.
pub fn next_window_start(instant: DateTime<Utc>, config: &WindowConfig) -> Option<DateTime<Utc>> {
    start_relative_to(instant, days_until_start(instant, config)?, config)
}

/// Returns the occurrence containing the instant, if any.
///
/// Week parity is taken from the day the occurrence started on, so a window
/// running from Sunday into Monday is not cut short by the ISO week change.
pub fn current_window(instant: DateTime<Utc>, config: &WindowConfig) -> Option<WindowOccurrence> {
    let today = instant.date_naive();
    let mut days_back = config.start_weekday().days_until(weekday_of(today));
    if days_back == 0 && time_of_day(instant) < config.start_offset() {
        days_back = 7;
    }

    // Occurrences are shorter than a week, so only the latest start can
    // still be open. Before the first representable start nothing is.
    let start_date = shift_date(today, -days_back)?;
    if !is_window_day(start_date, config) {
        return None;
    }

    let start = start_relative_to(instant, -days_back, config)?;
    let (end, open) = match start.checked_add_signed(config.window_length()) {
        Some(end) => (end, instant < end),
        None => (DateTime::<Utc>::MAX_UTC, true),
    };
    (start <= instant && open).then_some(WindowOccurrence { start, end })
}

/// Evaluates in-window state, countdown and next start for the instant.
pub fn status(instant: DateTime<Utc>, config: &WindowConfig) -> WindowStatus {
    let current_window = current_window(instant, config);
    let time_to_window = match current_window {
        Some(_) => Duration::zero(),
        None => time_to_window(instant, config),
    };
    let status = WindowStatus {
        in_window: current_window.is_some(),
        time_to_window,
        next_window_start: next_window_start(instant, config),
        current_window,
    };
    trace!(
        %instant,
        in_window = status.in_window,
        time_to_window = ?status.time_to_window,
        "Evaluated window"
    );
    status
}

/// Days from today to the day the window next starts on.
///
/// Zero when the window starts later today. Weeks that are not window weeks
/// are skipped whole; at an ISO year with 53 weeks the next window week can
/// be three weeks out.
/// `None` past the last representable date.
fn days_until_start(instant: DateTime<Utc>, config: &WindowConfig) -> Option<i64> {
    let today = instant.date_naive();
    let mut days = weekday_of(today).days_until(config.start_weekday());
    if days == 0 && time_of_day(instant) >= config.start_offset() {
        days = 7;
    }
    while !is_window_day(shift_date(today, days)?, config) {
        days += 7;
    }
    Some(days)
}

/// Time elapsed since midnight, down to the nanosecond.
///
/// A leap second is read as the second before it, so the result stays below
/// 24 hours.
fn time_of_day(instant: DateTime<Utc>) -> Duration {
    Duration::hours(instant.hour() as i64)
        + Duration::minutes(instant.minute() as i64)
        + Duration::seconds(instant.second() as i64)
        + Duration::nanoseconds((instant.nanosecond() % NANOS_PER_SECOND) as i64)
}

/// Time left until the next midnight.
fn remaining_of_day(instant: DateTime<Utc>) -> Duration {
    Duration::days(1) - time_of_day(instant)
}

fn shift_date(date: NaiveDate, days: i64) -> Option<NaiveDate> {
    date.checked_add_signed(Duration::days(days))
}

fn is_window_day(date: NaiveDate, config: &WindowConfig) -> bool {
    config.is_window_week(date.iso_week().week())
}

fn weekday_of(date: NaiveDate) -> Weekday {
    Weekday::from_chrono(date.weekday())
}

/// The configured start time on the day `days` away from the instant's day.
fn start_relative_to(
    instant: DateTime<Utc>,
    days: i64,
    config: &WindowConfig,
) -> Option<DateTime<Utc>> {
    let midnight = shift_date(instant.date_naive(), days)?.and_hms_opt(0, 0, 0)?;
    midnight.and_utc().checked_add_signed(config.start_offset())
}
