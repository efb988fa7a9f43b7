//! Error types for configuration and working-time calculation.
//! 
//! MIT License
//! 
//! Copyright (c) 2026 66f94eae
//! 
//! Permission is hereby granted, free of charge, to any person obtaining a copy
//! of this software and associated documentation files (the "Software"), to deal
//! in the Software without restriction, including without limitation the rights
//! to use, copy, modify, merge, publish, distribute, sublicense, and/or sell
//! copies of the Software, and to permit persons to whom the Software is
//! furnished to do so, subject to the following conditions:
//! 
//! The above copyright notice and this permission notice shall be included in all
//! copies or substantial portions of the Software.
//! 
//! THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND, EXPRESS OR
//! IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY,
//! FITNESS FOR A PARTICULAR PURPOSE AND NONINFRINGEMENT. IN NO EVENT SHALL THE
//! AUTHORS OR COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM, DAMAGES OR OTHER
//! LIABILITY, WHETHER IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING FROM,
//! OUT OF OR IN CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE
//! SOFTWARE.

use std::path::PathBuf;

use chrono::{DateTime, NaiveTime, TimeDelta, Utc, Weekday};
use thiserror::Error;

/// Errors raised by a calculation call.
///
/// `NegativeDuration` and `ReversedRange` reject the input before any slot
/// is resolved; `OutOfRange` stops a calculation that walks past the dates
/// chrono can represent.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CalcError {
    /// A negative duration was passed to an add or subtract operation
    #[error("duration must not be negative, got {0}")]
    NegativeDuration(TimeDelta),

    /// The lower bound of a range lies after its upper bound
    #[error("range start {from} lies after range end {to}")]
    ReversedRange {
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    },

    /// The result would lie outside the representable calendar
    #[error("result lies outside the representable date range")]
    OutOfRange,
}

/// Errors raised while building a calculator from its configuration.
///
/// A calculator that was built successfully never fails because of its own
/// configuration afterwards.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A work interval with a missing bound or with begin after end
    #[error("invalid work interval: {reason}")]
    InvalidInterval { reason: String },

    /// Two work intervals of the same weekday share working time
    #[error("work intervals on {weekday} overlap: {first} and {second}")]
    OverlappingIntervals {
        weekday: Weekday,
        first: String,
        second: String,
    },

    /// No weekday from Monday to Friday has any working time, or every date
    /// of the year is a holiday
    #[error("configuration leaves no working time in any week")]
    NoWorkingDays,

    /// A custom holiday that does not name a calendar date
    #[error("custom holiday {day:02}.{month:02} is not a calendar date")]
    InvalidHoliday { day: u32, month: u32 },

    /// A custom holiday entry that is not written as `DD.MM`
    #[error("custom holiday '{value}' must be written as DD.MM")]
    MalformedHoliday { value: String },

    /// A time zone name unknown to the tz database
    #[error("unknown time zone '{0}'")]
    UnknownTimezone(String),

    /// A clock value that could not be parsed
    #[error("invalid time of day '{value}', expected HH:MM, HH:MM:SS or 24:00")]
    InvalidTime { value: String },

    /// The configuration file could not be read
    #[error("cannot read '{path}': {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The configuration file is not valid TOML for this layout
    #[error("invalid configuration: {0}")]
    Parse(#[from] toml::de::Error),

    /// An iCalendar holiday source could not be used
    #[error("holiday calendar '{path}': {reason}")]
    Calendar { path: PathBuf, reason: String },
}

impl ConfigError {
    pub(crate) fn missing_bound(begin: Option<NaiveTime>, end_present: bool) -> Self {
        let reason = match (begin, end_present) {
            (None, false) => "both begin and end are missing".to_string(),
            (None, true) => "begin is missing".to_string(),
            (Some(begin), _) => format!("interval starting at {begin} has no end"),
        };
        ConfigError::InvalidInterval { reason }
    }
}
