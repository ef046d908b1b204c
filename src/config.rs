//! Configuration and CLI argument handling

use std::{fmt, str::FromStr, time::Duration};

use chrono::{DateTime, Datelike, Local, NaiveDate, NaiveDateTime, TimeZone, Timelike, Utc};
use clap::Parser;

/// Format accepted by `--target`
pub const TARGET_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// The date and time the countdown runs to, as wall-clock parts.
///
/// `month_index` is zero-based (0 = January).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TargetTime {
    pub year: i32,
    pub month_index: u32,
    pub day: u32,
    pub hour: u32,
    pub minute: u32,
    pub second: u32,
}

/// 2025-12-19 20:53:00 local time
pub const DEFAULT_TARGET: TargetTime = TargetTime::new(2025, 11, 19, 20, 53, 0);

impl TargetTime {
    pub const fn new(year: i32, month_index: u32, day: u32, hour: u32, minute: u32, second: u32) -> Self {
        Self { year, month_index, day, hour, minute, second }
    }

    /// Validate the parts as a calendar date and time
    pub fn to_naive(&self) -> Result<NaiveDateTime, String> {
        NaiveDate::from_ymd_opt(self.year, self.month_index + 1, self.day)
            .and_then(|date| date.and_hms_opt(self.hour, self.minute, self.second))
            .ok_or_else(|| format!("Invalid target date/time: {}", self))
    }

    /// Resolve as a wall-clock time in `tz`. An ambiguous time (clock set
    /// back) takes the earlier instant; a skipped one is an error.
    pub fn resolve_in<Tz: TimeZone>(&self, tz: &Tz) -> Result<DateTime<Utc>, String> {
        let naive = self.to_naive()?;
        tz.from_local_datetime(&naive)
            .earliest()
            .map(|dt| dt.with_timezone(&Utc))
            .ok_or_else(|| format!("Target {} does not exist in the local time zone", self))
    }

    /// Resolve in the host's local time zone
    pub fn resolve_local(&self) -> Result<DateTime<Utc>, String> {
        self.resolve_in(&Local)
    }
}

impl From<NaiveDateTime> for TargetTime {
    fn from(dt: NaiveDateTime) -> Self {
        Self::new(dt.year(), dt.month0(), dt.day(), dt.hour(), dt.minute(), dt.second())
    }
}

impl FromStr for TargetTime {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        NaiveDateTime::parse_from_str(s.trim(), TARGET_FORMAT)
            .map(TargetTime::from)
            .map_err(|e| format!("Expected target as YYYY-MM-DDTHH:MM:SS, got '{}': {}", s, e))
    }
}

impl fmt::Display for TargetTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:04}-{:02}-{:02}T{:02}:{:02}:{:02}",
            self.year,
            self.month_index + 1,
            self.day,
            self.hour,
            self.minute,
            self.second
        )
    }
}

/// CLI argument parsing structure
#[derive(Parser)]
#[command(name = "festive-countdown")]
#[command(about = "Countdown-to-celebration sequencer for a holiday promotional page")]
#[command(version = "1.0.0")]
pub struct Config {
    /// Port to bind the server to
    #[arg(short, long, default_value = "20553")]
    pub port: u16,

    /// Host address to bind to
    #[arg(long, default_value = "127.0.0.1")]
    pub host: String,

    /// Local date and time to count down to (YYYY-MM-DDTHH:MM:SS)
    #[arg(short, long, default_value = "2025-12-19T20:53:00")]
    pub target: TargetTime,

    /// Countdown tick period in milliseconds
    #[arg(long, default_value = "1000", value_parser = clap::value_parser!(u64).range(1..))]
    pub tick_ms: u64,

    /// Start the celebration as soon as the target is reached
    #[arg(long)]
    pub auto_start: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Config {
    /// Parse configuration from command line arguments
    pub fn parse() -> Self {
        Parser::parse()
    }

    /// Get the server address as a formatted string
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn tick_period(&self) -> Duration {
        Duration::from_millis(self.tick_ms)
    }

    /// Get the appropriate log level based on verbose flag
    pub fn log_level(&self) -> &'static str {
        if self.verbose { "debug" } else { "info" }
    }
}
