//! Fortnight Core - recurring window calculation.
//!
//! This crate answers two questions for a UTC instant: whether it falls inside
//! a recurring weekly or biweekly window, and how long remains until that
//! window next opens.
//!
//! Window weeks are chosen by ISO week number parity. The window opens on a
//! configured weekday and hour and closes either at the following midnight or
//! at an explicit end boundary, which may lie on a later day.
//!
//! ## Conventions
//!
//! The default configuration opens the window on Fridays at 15:00 in odd ISO
//! weeks and closes it at midnight. Every constant is a field of
//! [`WindowConfig`], so other conventions are a configuration change.

pub mod calculator;
pub mod config;
pub mod error;
pub mod weekday;

pub use calculator::{
    current_window, in_window, next_window_start, status, time_to_window, WindowCalculator,
    WindowOccurrence, WindowStatus,
};
pub use config::{Cycle, Parity, WindowConfig, WindowConfigBuilder, WindowEnd};
pub use error::{ConfigError, Result};
pub use weekday::Weekday;
