//! Window configuration.
//!
//! A [`WindowConfig`] describes one recurring window: the weekday and hour it
//! opens, where it closes, and which ISO weeks it occurs in. Configurations
//! are validated on construction (including deserialization) and immutable
//! afterwards, so any number of windows can be evaluated side by side.

use std::fmt;
use std::str::FromStr;

use chrono::Duration;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{ConfigError, Result};
use crate::weekday::Weekday;

/// Default weekday the window opens on.
pub const DEFAULT_START_WEEKDAY: Weekday = Weekday::Friday;

/// Default hour the window opens at.
pub const DEFAULT_START_HOUR: u32 = 15;

/// Default week parity.
pub const DEFAULT_PARITY: Parity = Parity::Odd;

/// Which ISO weeks are window weeks when the cycle is biweekly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub enum Parity {
    /// Even-numbered ISO weeks.
    Even,
    /// Odd-numbered ISO weeks.
    Odd,
}

impl Parity {
    /// Numeric value, 0 for even and 1 for odd.
    pub fn value(self) -> u32 {
        match self {
            Parity::Even => 0,
            Parity::Odd => 1,
        }
    }

    /// Returns true if the ISO week number has this parity.
    pub fn matches(self, iso_week: u32) -> bool {
        iso_week % 2 == self.value()
    }
}

impl TryFrom<i64> for Parity {
    type Error = ConfigError;

    fn try_from(value: i64) -> Result<Self> {
        match value {
            0 => Ok(Parity::Even),
            1 => Ok(Parity::Odd),
            other => Err(ConfigError::InvalidParity(other)),
        }
    }
}

impl From<Parity> for i64 {
    fn from(parity: Parity) -> Self {
        parity.value() as i64
    }
}

impl fmt::Display for Parity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value())
    }
}

/// How often the window recurs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Cycle {
    /// Every ISO week; parity is ignored.
    Weekly,
    /// Only ISO weeks matching the configured parity.
    #[default]
    Biweekly,
}

impl Cycle {
    /// Nominal period between two occurrences.
    ///
    /// Across an ISO year with 53 weeks two consecutive weeks share a parity,
    /// so a biweekly window can occasionally be one week early or late
    /// relative to this period.
    pub fn period(self) -> Duration {
        match self {
            Cycle::Weekly => Duration::weeks(1),
            Cycle::Biweekly => Duration::weeks(2),
        }
    }
}

impl FromStr for Cycle {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "weekly" => Ok(Cycle::Weekly),
            "biweekly" | "fortnightly" => Ok(Cycle::Biweekly),
            _ => Err(ConfigError::UnknownCycle(s.to_string())),
        }
    }
}

impl fmt::Display for Cycle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cycle::Weekly => f.write_str("weekly"),
            Cycle::Biweekly => f.write_str("biweekly"),
        }
    }
}

/// Exclusive end boundary of a window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WindowEnd {
    /// Weekday the window closes on.
    pub weekday: Weekday,
    /// Hour (0-23) the window closes at.
    pub hour: u32,
}

impl WindowEnd {
    /// Creates a new end boundary.
    pub fn new(weekday: Weekday, hour: u32) -> Self {
        Self { weekday, hour }
    }
}

/// A validated, immutable window configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawWindowConfig")]
pub struct WindowConfig {
    parity: Parity,
    start_weekday: Weekday,
    start_hour: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    end: Option<WindowEnd>,
    cycle: Cycle,
}

impl WindowConfig {
    /// Creates a validated configuration.
    pub fn new(
        parity: Parity,
        start_weekday: Weekday,
        start_hour: u32,
        end: Option<WindowEnd>,
        cycle: Cycle,
    ) -> Result<Self> {
        let config = Self {
            parity,
            start_weekday,
            start_hour,
            end,
            cycle,
        };
        config.validate()?;
        Ok(config)
    }

    /// Starts building a configuration from the defaults.
    pub fn builder() -> WindowConfigBuilder {
        WindowConfigBuilder::default()
    }

    /// Friday 14:00 until Saturday 06:00, biweekly.
    pub fn overnight_utc(parity: Parity) -> Self {
        Self {
            parity,
            start_weekday: Weekday::Friday,
            start_hour: 14,
            end: Some(WindowEnd::new(Weekday::Saturday, 6)),
            cycle: Cycle::Biweekly,
        }
    }

    fn validate(&self) -> Result<()> {
        let result = self.check();
        if let Err(ref err) = result {
            debug!("Rejected window configuration {:?}: {}", self, err);
        }
        result
    }

    fn check(&self) -> Result<()> {
        if self.start_hour > 23 {
            return Err(ConfigError::InvalidHour {
                field: "start_hour",
                hour: self.start_hour,
            });
        }
        if let Some(end) = self.end {
            if end.hour > 23 {
                return Err(ConfigError::InvalidHour {
                    field: "end_hour",
                    hour: end.hour,
                });
            }
            if end.weekday == self.start_weekday && end.hour <= self.start_hour {
                return Err(ConfigError::EmptyWindow);
            }
        }
        Ok(())
    }

    pub fn parity(&self) -> Parity {
        self.parity
    }

    pub fn start_weekday(&self) -> Weekday {
        self.start_weekday
    }

    pub fn start_hour(&self) -> u32 {
        self.start_hour
    }

    pub fn end(&self) -> Option<WindowEnd> {
        self.end
    }

    pub fn cycle(&self) -> Cycle {
        self.cycle
    }

    /// Time of day the window opens, as an offset from midnight.
    pub fn start_offset(&self) -> Duration {
        Duration::hours(self.start_hour as i64)
    }

    /// How long one occurrence of the window lasts.
    ///
    /// Without an explicit end the window closes at the following midnight.
    pub fn window_length(&self) -> Duration {
        let hours = match self.end {
            None => 24 - self.start_hour as i64,
            Some(end) => {
                self.start_weekday.days_until(end.weekday) * 24 + end.hour as i64
                    - self.start_hour as i64
            }
        };
        Duration::hours(hours)
    }

    /// Returns true if the given ISO week number is a window week.
    pub fn is_window_week(&self, iso_week: u32) -> bool {
        match self.cycle {
            Cycle::Weekly => true,
            Cycle::Biweekly => self.parity.matches(iso_week),
        }
    }
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            parity: DEFAULT_PARITY,
            start_weekday: DEFAULT_START_WEEKDAY,
            start_hour: DEFAULT_START_HOUR,
            end: None,
            cycle: Cycle::Biweekly,
        }
    }
}

/// Builder for [`WindowConfig`]; unset fields keep their defaults.
#[derive(Debug, Clone, Default)]
pub struct WindowConfigBuilder {
    config: WindowConfig,
}

impl WindowConfigBuilder {
    pub fn parity(mut self, parity: Parity) -> Self {
        self.config.parity = parity;
        self
    }

    pub fn start_weekday(mut self, weekday: Weekday) -> Self {
        self.config.start_weekday = weekday;
        self
    }

    pub fn start_hour(mut self, hour: u32) -> Self {
        self.config.start_hour = hour;
        self
    }

    /// Closes the window at `hour` on `weekday` instead of at midnight.
    pub fn end(mut self, weekday: Weekday, hour: u32) -> Self {
        self.config.end = Some(WindowEnd::new(weekday, hour));
        self
    }

    pub fn cycle(mut self, cycle: Cycle) -> Self {
        self.config.cycle = cycle;
        self
    }

    /// Validates and returns the configuration.
    pub fn build(self) -> Result<WindowConfig> {
        self.config.validate()?;
        Ok(self.config)
    }
}

/// Unvalidated form used for deserialization.
#[derive(Debug, Deserialize)]
struct RawWindowConfig {
    #[serde(default = "default_parity")]
    parity: i64,
    #[serde(default = "default_start_weekday")]
    start_weekday: Weekday,
    #[serde(default = "default_start_hour")]
    start_hour: u32,
    #[serde(default)]
    end: Option<WindowEnd>,
    #[serde(default)]
    cycle: Cycle,
}

fn default_parity() -> i64 {
    DEFAULT_PARITY.into()
}

fn default_start_weekday() -> Weekday {
    DEFAULT_START_WEEKDAY
}

fn default_start_hour() -> u32 {
    DEFAULT_START_HOUR
}

impl TryFrom<RawWindowConfig> for WindowConfig {
    type Error = ConfigError;

    fn try_from(raw: RawWindowConfig) -> Result<Self> {
        WindowConfig::new(
            Parity::try_from(raw.parity)?,
            raw.start_weekday,
            raw.start_hour,
            raw.end,
            raw.cycle,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ==================== Parity Tests ====================

    #[test]
    fn parity_from_integer() {
        assert_eq!(Parity::try_from(0).unwrap(), Parity::Even);
        assert_eq!(Parity::try_from(1).unwrap(), Parity::Odd);
        assert_eq!(Parity::try_from(2), Err(ConfigError::InvalidParity(2)));
        assert_eq!(Parity::try_from(-1), Err(ConfigError::InvalidParity(-1)));
    }

    #[test]
    fn parity_matches_week_numbers() {
        assert!(Parity::Odd.matches(47));
        assert!(!Parity::Odd.matches(46));
        assert!(Parity::Even.matches(46));
        assert!(Parity::Even.matches(52));
        assert!(Parity::Odd.matches(53));
    }

    // ==================== Cycle Tests ====================

    #[test]
    fn cycle_parsing() {
        assert_eq!("weekly".parse::<Cycle>().unwrap(), Cycle::Weekly);
        assert_eq!("Biweekly".parse::<Cycle>().unwrap(), Cycle::Biweekly);
        assert_eq!("fortnightly".parse::<Cycle>().unwrap(), Cycle::Biweekly);
        assert_eq!(
            "monthly".parse::<Cycle>(),
            Err(ConfigError::UnknownCycle("monthly".to_string()))
        );
    }

    #[test]
    fn cycle_periods() {
        assert_eq!(Cycle::Weekly.period(), Duration::days(7));
        assert_eq!(Cycle::Biweekly.period(), Duration::days(14));
    }

    #[test]
    fn weekly_ignores_parity() {
        let config = WindowConfig::builder().cycle(Cycle::Weekly).build().unwrap();
        assert!(config.is_window_week(46));
        assert!(config.is_window_week(47));
    }

    // ==================== WindowConfig Tests ====================

    #[test]
    fn defaults() {
        let config = WindowConfig::default();
        assert_eq!(config.parity(), Parity::Odd);
        assert_eq!(config.start_weekday(), Weekday::Friday);
        assert_eq!(config.start_hour(), 15);
        assert_eq!(config.end(), None);
        assert_eq!(config.cycle(), Cycle::Biweekly);
        assert_eq!(config.window_length(), Duration::hours(9));
        assert_eq!(config.start_offset(), Duration::hours(15));
    }

    #[test]
    fn overnight_preset_spans_to_saturday_morning() {
        let config = WindowConfig::overnight_utc(Parity::Even);
        assert_eq!(config.start_hour(), 14);
        assert_eq!(config.end(), Some(WindowEnd::new(Weekday::Saturday, 6)));
        assert_eq!(config.window_length(), Duration::hours(16));
        assert!(config.is_window_week(2));
        assert!(!config.is_window_week(3));
    }

    #[test]
    fn builder_validates_hours() {
        assert_eq!(
            WindowConfig::builder().start_hour(24).build(),
            Err(ConfigError::InvalidHour {
                field: "start_hour",
                hour: 24
            })
        );
        assert_eq!(
            WindowConfig::builder().end(Weekday::Saturday, 30).build(),
            Err(ConfigError::InvalidHour {
                field: "end_hour",
                hour: 30
            })
        );
    }

    #[test]
    fn end_must_follow_start() {
        let same_hour = WindowConfig::builder()
            .start_hour(10)
            .end(Weekday::Friday, 10)
            .build();
        assert_eq!(same_hour, Err(ConfigError::EmptyWindow));

        let earlier = WindowConfig::builder()
            .start_hour(10)
            .end(Weekday::Friday, 9)
            .build();
        assert_eq!(earlier, Err(ConfigError::EmptyWindow));

        let same_day = WindowConfig::builder()
            .start_hour(10)
            .end(Weekday::Friday, 12)
            .build()
            .unwrap();
        assert_eq!(same_day.window_length(), Duration::hours(2));
    }

    #[test]
    fn end_across_the_week_boundary() {
        let config = WindowConfig::builder()
            .start_weekday(Weekday::Sunday)
            .start_hour(22)
            .end(Weekday::Monday, 2)
            .build()
            .unwrap();
        assert_eq!(config.window_length(), Duration::hours(4));
    }

    #[test]
    fn longest_window_stays_under_a_week() {
        let config = WindowConfig::builder()
            .start_hour(23)
            .end(Weekday::Thursday, 22)
            .build()
            .unwrap();
        assert_eq!(config.window_length(), Duration::hours(6 * 24 + 23));
    }

    // ==================== Serialization Tests ====================

    #[test]
    fn config_serialization() {
        let config = WindowConfig::overnight_utc(Parity::Odd);
        let json = serde_json::to_value(config).unwrap();
        assert_eq!(json["parity"], 1);
        assert_eq!(json["start_weekday"], "friday");
        assert_eq!(json["end"]["weekday"], "saturday");
        assert_eq!(json["cycle"], "biweekly");

        let deserialized: WindowConfig = serde_json::from_value(json).unwrap();
        assert_eq!(deserialized, config);
    }

    #[test]
    fn deserialization_fills_defaults() {
        let config: WindowConfig = serde_json::from_str(r#"{"parity": 0}"#).unwrap();
        assert_eq!(config, WindowConfig::builder().parity(Parity::Even).build().unwrap());
    }

    #[test]
    fn deserialization_validates() {
        assert!(serde_json::from_str::<WindowConfig>(r#"{"parity": 2}"#).is_err());
        assert!(serde_json::from_str::<WindowConfig>(r#"{"start_hour": 25}"#).is_err());
        assert!(serde_json::from_str::<Parity>("3").is_err());
    }
}
