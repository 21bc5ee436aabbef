//! `DDD:HH:MM:SS.mmm` timestamp parsing and elapsed-time normalization
//!
//! Flight-test recorders stamp each sample with a day counter (day of year or
//! elapsed days), hour, minute, second and millisecond. Elapsed time is
//! computed in integer milliseconds and converted to seconds once, so
//! millisecond data converts exactly.

use crate::error::AnalyzerError;
use crate::Result;
use regex::Regex;
use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;
use thiserror::Error;

pub const TIMESTAMP_FORMAT: &str = "DDD:HH:MM:SS.mmm";

const MS_PER_SECOND: i64 = 1_000;
const MS_PER_MINUTE: i64 = 60 * MS_PER_SECOND;
const MS_PER_HOUR: i64 = 60 * MS_PER_MINUTE;
const MS_PER_DAY: i64 = 24 * MS_PER_HOUR;

static TIMESTAMP_PATTERN: OnceLock<Regex> = OnceLock::new();

fn timestamp_pattern() -> &'static Regex {
    TIMESTAMP_PATTERN.get_or_init(|| {
        Regex::new(r"^(\d{1,3}):(\d{2}):(\d{2}):(\d{2})\.(\d{3})$")
            .expect("timestamp pattern is a valid regex")
    })
}

/// Why a timestamp string was rejected
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TimestampError {
    #[error("expected {TIMESTAMP_FORMAT}")]
    Shape,
    #[error("hour {0} out of range 00-23")]
    Hour(u8),
    #[error("minute {0} out of range 00-59")]
    Minute(u8),
    #[error("second {0} out of range 00-59")]
    Second(u8),
}

/// One parsed `DDD:HH:MM:SS.mmm` stamp
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FlightTimestamp {
    pub day: u16,
    pub hour: u8,
    pub minute: u8,
    pub second: u8,
    pub millisecond: u16,
}

impl FlightTimestamp {
    /// Parse the exact shape; surrounding whitespace is ignored
    pub fn parse(text: &str) -> std::result::Result<Self, TimestampError> {
        let caps = timestamp_pattern()
            .captures(text.trim())
            .ok_or(TimestampError::Shape)?;
        // The pattern only admits ASCII digits of bounded width, so these
        // parses cannot overflow.
        let field = |i: usize| -> std::result::Result<u16, TimestampError> {
            caps.get(i)
                .and_then(|m| m.as_str().parse::<u16>().ok())
                .ok_or(TimestampError::Shape)
        };
        let day = field(1)?;
        let hour = field(2)? as u8;
        let minute = field(3)? as u8;
        let second = field(4)? as u8;
        let millisecond = field(5)?;

        if hour > 23 {
            return Err(TimestampError::Hour(hour));
        }
        if minute > 59 {
            return Err(TimestampError::Minute(minute));
        }
        if second > 59 {
            return Err(TimestampError::Second(second));
        }

        Ok(Self {
            day,
            hour,
            minute,
            second,
            millisecond,
        })
    }

    /// Milliseconds since day 0, 00:00:00.000
    pub fn total_millis(&self) -> i64 {
        self.day as i64 * MS_PER_DAY
            + self.hour as i64 * MS_PER_HOUR
            + self.minute as i64 * MS_PER_MINUTE
            + self.second as i64 * MS_PER_SECOND
            + self.millisecond as i64
    }

    pub fn total_seconds(&self) -> f64 {
        self.total_millis() as f64 / MS_PER_SECOND as f64
    }

    /// Seconds from `start` to `self`; negative when `self` is earlier
    pub fn seconds_since(&self, start: &FlightTimestamp) -> f64 {
        (self.total_millis() - start.total_millis()) as f64 / MS_PER_SECOND as f64
    }
}

impl FromStr for FlightTimestamp {
    type Err = TimestampError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        FlightTimestamp::parse(s)
    }
}

impl fmt::Display for FlightTimestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:03}:{:02}:{:02}:{:02}.{:03}",
            self.day, self.hour, self.minute, self.second, self.millisecond
        )
    }
}

/// Convert a timestamp column into seconds elapsed since its first row
///
/// Fails on the first malformed entry; the error carries the 1-based data
/// row so the caller can report it. Out-of-order stamps are not rejected.
pub fn normalize_timestamps<S: AsRef<str>>(raw: &[S]) -> Result<Vec<f64>> {
    let parsed = raw
        .iter()
        .enumerate()
        .map(|(i, text)| {
            FlightTimestamp::parse(text.as_ref()).map_err(|e| AnalyzerError::Timestamp {
                row: i + 1,
                value: text.as_ref().to_string(),
                reason: e.to_string(),
            })
        })
        .collect::<Result<Vec<_>>>()?;

    let Some(start) = parsed.first().copied() else {
        return Ok(Vec::new());
    };
    Ok(parsed.iter().map(|ts| ts.seconds_since(&start)).collect())
}
