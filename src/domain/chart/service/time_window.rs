use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

pub const NANOS_PER_MINUTE: i64 = 60_000_000_000;
pub const NANOS_PER_HOUR: i64 = 60 * NANOS_PER_MINUTE;
pub const NANOS_PER_DAY: i64 = 24 * NANOS_PER_HOUR;

const MILLIS_PER_MINUTE: i64 = 60_000;
const MILLIS_PER_HOUR: i64 = 60 * MILLIS_PER_MINUTE;
const MILLIS_PER_DAY: i64 = 24 * MILLIS_PER_HOUR;

/// Coarse time selection offered by the status page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum TimePeriod {
    Minutes,
    #[default]
    Hour,
    Day,
    Week,
}

impl TimePeriod {
    /// Parses a period symbol. Anything unrecognized resolves to `Hour`.
    pub fn parse_or_default(raw: &str) -> Self {
        match raw {
            "minutes" => TimePeriod::Minutes,
            "hour" => TimePeriod::Hour,
            "day" => TimePeriod::Day,
            "week" => TimePeriod::Week,
            other => {
                debug!("Unrecognized time period {:?}, using hour", other);
                TimePeriod::Hour
            }
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TimePeriod::Minutes => "minutes",
            TimePeriod::Hour => "hour",
            TimePeriod::Day => "day",
            TimePeriod::Week => "week",
        }
    }

    /// Distance from "now" back to the window start, in milliseconds.
    pub fn window_millis(&self) -> i64 {
        match self {
            TimePeriod::Minutes => 10 * MILLIS_PER_MINUTE,
            TimePeriod::Hour => MILLIS_PER_HOUR,
            TimePeriod::Day => MILLIS_PER_DAY,
            TimePeriod::Week => 7 * MILLIS_PER_DAY,
        }
    }

    /// Bucket width in nanoseconds.
    pub fn period_nanos(&self) -> i64 {
        match self {
            TimePeriod::Minutes => NANOS_PER_MINUTE,
            TimePeriod::Hour => 5 * NANOS_PER_MINUTE,
            TimePeriod::Day => NANOS_PER_HOUR,
            TimePeriod::Week => NANOS_PER_DAY,
        }
    }
}

impl From<&str> for TimePeriod {
    fn from(raw: &str) -> Self {
        Self::parse_or_default(raw)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeWindow {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    /// Bucket width in nanoseconds.
    pub period: i64,
}

pub fn resolve_time_window(period: TimePeriod) -> TimeWindow {
    resolve_time_window_at(period, Utc::now())
}

pub fn resolve_time_window_at(period: TimePeriod, now: DateTime<Utc>) -> TimeWindow {
    TimeWindow {
        start: now - Duration::milliseconds(period.window_millis()),
        end: now,
        period: period.period_nanos(),
    }
}
