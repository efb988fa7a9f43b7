//! Command-line interface parser for the working-time calculator.
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

use std::path::Path;

use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeDelta, Utc};
use chrono_tz::Tz;
use clap::{Parser, Subcommand, builder::TypedValueParser};
use workcal::{CalcError, conf::Conf};

/// Help message for timestamp format specification
const TIMESTAMP_HELP: &str = "Timestamp as RFC 3339, \"YYYYmmDD\", \"YYYYmmDDHHMMss\" (local to the configured time zone), \
                              UNIX timestamp (millisecond) or \"now\"";
/// Help message for duration format specification
const DURATION_HELP: &str = "Duration such as \"8h\", \"1d4h30m\" or \"90s\" (d = 24 hours)";
/// Date format string (YYYYmmDD)
const DATE_FORMAT: &str = "%Y%m%d";
/// Date and time format string (YYYYmmDDHHMMSS)
const DATETIME_FORMAT: &str = "%Y%m%d%H%M%S";

const NOW: &str = "now";

/// Command-line interface structure
#[derive(Parser)]
#[command(
    version(env!("CARGO_PKG_VERSION")),
    author(env!("CARGO_PKG_AUTHORS")),
    about(env!("CARGO_PKG_DESCRIPTION")),
    long_about = "Working-time calculator that adds, subtracts and measures working time \
                 over a weekly work schedule and a holiday calendar."
)]
pub struct Cli {
    /// Configuration file path
    ///
    /// TOML configuration file containing time zone, holidays and the
    /// weekly schedule. Without it, whole days Monday to Friday in UTC
    /// count as working time.
    #[arg(
        long,
        short,
        global = true,
        value_parser = ConfParser,
        help = "Path to TOML configuration file"
    )]
    conf: Option<Conf>,

    #[command(subcommand)]
    command: Command,
}

/// Questions the calculator answers
#[derive(Subcommand)]
pub enum Command {
    /// Instant reached after adding working time
    Add {
        #[arg(value_parser = TimestampParser, help = TIMESTAMP_HELP)]
        timestamp: Timestamp,
        #[arg(value_parser = DurationParser, allow_hyphen_values = true, help = DURATION_HELP)]
        duration: TimeDelta,
    },
    /// Instant lying the given working time before the timestamp
    Subtract {
        #[arg(value_parser = TimestampParser, help = TIMESTAMP_HELP)]
        timestamp: Timestamp,
        #[arg(value_parser = DurationParser, allow_hyphen_values = true, help = DURATION_HELP)]
        duration: TimeDelta,
    },
    /// Working time elapsing between two timestamps
    Between {
        #[arg(value_parser = TimestampParser, help = TIMESTAMP_HELP)]
        from: Timestamp,
        #[arg(value_parser = TimestampParser, help = TIMESTAMP_HELP)]
        to: Timestamp,
    },
    /// Whether any working time lies between two timestamps, in either order
    HasWork {
        #[arg(value_parser = TimestampParser, help = TIMESTAMP_HELP)]
        a: Timestamp,
        #[arg(value_parser = TimestampParser, help = TIMESTAMP_HELP)]
        b: Timestamp,
    },
    /// Whether the timestamp falls on a working day
    IsWorkingDay {
        #[arg(value_parser = TimestampParser, default_value = NOW, help = TIMESTAMP_HELP)]
        timestamp: Timestamp,
    },
    /// Easter Sunday and the configured moving holidays of a year
    Easter { year: i32 },
}

impl Cli {
    /// Returns the parsed configuration, or the default one
    pub fn conf(&self) -> Conf {
        self.conf.clone().unwrap_or_default()
    }

    /// Returns the subcommand to run
    pub fn command(&self) -> &Command {
        &self.command
    }
}

/// A timestamp as typed: either an absolute instant or a wall-clock time
/// that needs the configured time zone
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Timestamp {
    Instant(DateTime<Utc>),
    Local(NaiveDateTime),
}

impl Timestamp {
    /// Resolves the timestamp against `zone`
    ///
    /// # Errors
    /// * `CalcError::OutOfRange` if the wall-clock time has no instant
    pub fn resolve(&self, zone: Tz) -> Result<DateTime<Utc>, CalcError> {
        match self {
            Timestamp::Instant(t) => Ok(*t),
            Timestamp::Local(local) => workcal::local_to_instant(zone, *local).ok_or(CalcError::OutOfRange),
        }
    }
}

/// Custom parser for timestamp values
#[derive(Clone)]
struct TimestampParser;

impl TypedValueParser for TimestampParser {
    type Value = Timestamp;

    /// Parses timestamp strings from command-line arguments
    ///
    /// # Supported Formats
    /// * "now": the current instant
    /// * RFC 3339 (e.g., 2024-12-24T14:30:00+01:00)
    /// * "YYYYmmDD": local midnight (e.g., 20241224)
    /// * "YYYYmmDDHHMMSS": local date and time (e.g., 20241224143000)
    /// * UNIX timestamp in millisecond
    fn parse_ref(
        &self,
        _cmd: &clap::Command,
        _arg: Option<&clap::Arg>,
        value: &std::ffi::OsStr,
    ) -> Result<Self::Value, clap::Error> {
        let Some(value_str) = value.to_str() else {
            return Err(clap::Error::new(clap::error::ErrorKind::InvalidUtf8));
        };
        parse_timestamp(value_str).ok_or_else(|| {
            clap::Error::raw(
                clap::error::ErrorKind::InvalidValue,
                format!("invalid timestamp '{value_str}'. {TIMESTAMP_HELP}\n"),
            )
        })
    }
}

fn parse_timestamp(value: &str) -> Option<Timestamp> {
    if value == NOW {
        return Some(Timestamp::Instant(Utc::now()));
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(Timestamp::Instant(dt.with_timezone(&Utc)));
    }

    // Date only first (YYYYmmDD), then full timestamp (YYYYmmDDHHMMSS)
    if let Ok(date) = NaiveDate::parse_from_str(value, DATE_FORMAT) {
        return Some(Timestamp::Local(date.and_time(chrono::NaiveTime::MIN)));
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(value, DATETIME_FORMAT) {
        return Some(Timestamp::Local(dt));
    }

    value
        .parse::<i64>()
        .ok()
        .and_then(DateTime::from_timestamp_millis)
        .map(Timestamp::Instant)
}

/// Custom parser for duration values
#[derive(Clone)]
struct DurationParser;

impl TypedValueParser for DurationParser {
    type Value = TimeDelta;

    /// Parses durations such as "8h", "1d4h30m" or "-2h"; negative values are
    /// passed on so the calculator can reject them
    fn parse_ref(
        &self,
        _cmd: &clap::Command,
        _arg: Option<&clap::Arg>,
        value: &std::ffi::OsStr,
    ) -> Result<Self::Value, clap::Error> {
        let Some(value_str) = value.to_str() else {
            return Err(clap::Error::new(clap::error::ErrorKind::InvalidUtf8));
        };
        parse_duration(value_str).ok_or_else(|| {
            clap::Error::raw(
                clap::error::ErrorKind::InvalidValue,
                format!("invalid duration '{value_str}'. {DURATION_HELP}\n"),
            )
        })
    }
}

fn parse_duration(value: &str) -> Option<TimeDelta> {
    let (negative, body) = match value.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, value),
    };
    if body.is_empty() {
        return None;
    }

    let mut total = TimeDelta::zero();
    let mut digits = String::new();
    for c in body.chars() {
        if c.is_ascii_digit() {
            digits.push(c);
            continue;
        }
        let amount = digits.parse::<i64>().ok()?;
        digits.clear();
        let part = match c {
            'd' => TimeDelta::try_days(amount)?,
            'h' => TimeDelta::try_hours(amount)?,
            'm' => TimeDelta::try_minutes(amount)?,
            's' => TimeDelta::try_seconds(amount)?,
            _ => return None,
        };
        total = total.checked_add(&part)?;
    }
    // A trailing number without unit
    if !digits.is_empty() {
        return None;
    }

    Some(if negative { -total } else { total })
}

/// Formats a duration the way durations are typed, e.g. "1d4h30m"
pub fn format_duration(duration: TimeDelta) -> String {
    if duration == TimeDelta::zero() {
        return "0s".to_string();
    }
    let sign = if duration < TimeDelta::zero() { "-" } else { "" };
    let duration = duration.abs();
    let parts = [
        (duration.num_days(), "d"),
        (duration.num_hours() % 24, "h"),
        (duration.num_minutes() % 60, "m"),
        (duration.num_seconds() % 60, "s"),
    ];
    let body: String = parts
        .iter()
        .filter(|(amount, _)| *amount > 0)
        .map(|(amount, unit)| format!("{amount}{unit}"))
        .collect();
    let millis = duration.subsec_nanos() / 1_000_000;
    match (body.is_empty(), millis) {
        (_, 0) => format!("{sign}{body}"),
        (true, millis) => format!("{sign}{millis}ms"),
        (false, millis) => format!("{sign}{body}{millis}ms"),
    }
}

/// Custom parser for configuration file loading
#[derive(Clone)]
struct ConfParser;

impl TypedValueParser for ConfParser {
    type Value = Conf;

    /// Parses configuration file path and loads the configuration
    ///
    /// # Errors
    /// * File not found or permission denied
    /// * Invalid TOML format
    fn parse_ref(
        &self,
        _cmd: &clap::Command,
        _arg: Option<&clap::Arg>,
        value: &std::ffi::OsStr,
    ) -> Result<Self::Value, clap::Error> {
        Conf::load(Path::new(value)).map_err(|e| {
            clap::Error::raw(clap::error::ErrorKind::InvalidValue, format!("{e}\n"))
        })
    }
}
