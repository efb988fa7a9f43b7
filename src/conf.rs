//! Configuration module for the working-time calculator.
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

use std::{
    fmt,
    path::{Path, PathBuf},
    str::FromStr,
};

use chrono::Weekday;
use chrono_tz::Tz;
use serde::{
    Deserialize,
    de::{Error, MapAccess, SeqAccess, Visitor},
};

use crate::{
    calculator::{Granularity, WorkingTimeCalculator},
    error::ConfigError,
    holiday::{FixedHoliday, HolidayCalendar},
    ical,
    schedule::{IntervalEnd, WeeklySchedule, WorkInterval, parse_clock},
};

/// Zone used when the configuration names none
const DEFAULT_TIMEZONE: &str = "UTC";

/// Main configuration structure for the application.
///
/// Parsing only checks the TOML shape; `build` validates every value and
/// turns the configuration into a calculator.
#[derive(Deserialize, Clone, Debug, Default)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct Conf {
    /// IANA time zone the schedule is written in
    timezone: Option<String>,
    /// Counting strategy
    #[serde(default)]
    granularity: Granularity,
    /// Holiday settings
    #[serde(default)]
    holidays: Holidays,
    /// Work intervals per weekday; whole days Monday to Friday when absent
    schedule: Option<Schedule>,
    /// Directory that relative holiday sources are resolved against
    #[serde(skip)]
    base_dir: Option<PathBuf>,
}

/// Holiday configuration.
#[derive(Deserialize, Clone, Debug, Default)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
struct Holidays {
    /// Built-in regional fixed and Easter-based holidays
    #[serde(default)]
    regional: bool,
    /// Corpus Christi; ignored unless `regional` is set
    #[serde(default)]
    corpus_christi: bool,
    /// Recurring holidays written as `DD.MM`
    #[serde(default, deserialize_with = "deserialize_holidays")]
    custom: Vec<FixedHoliday>,
    /// iCalendar files whose all-day events become recurring holidays
    #[serde(default)]
    sources: Vec<PathBuf>,
}

/// Work intervals per weekday, as written in the file.
#[derive(Deserialize, Clone, Debug, Default)]
#[serde(deny_unknown_fields)]
struct Schedule {
    #[serde(default)]
    monday: Vec<RawInterval>,
    #[serde(default)]
    tuesday: Vec<RawInterval>,
    #[serde(default)]
    wednesday: Vec<RawInterval>,
    #[serde(default)]
    thursday: Vec<RawInterval>,
    #[serde(default)]
    friday: Vec<RawInterval>,
    #[serde(default)]
    saturday: Vec<RawInterval>,
    #[serde(default)]
    sunday: Vec<RawInterval>,
}

impl Schedule {
    fn days(&self) -> [(Weekday, &[RawInterval]); 7] {
        [
            (Weekday::Mon, self.monday.as_slice()),
            (Weekday::Tue, self.tuesday.as_slice()),
            (Weekday::Wed, self.wednesday.as_slice()),
            (Weekday::Thu, self.thursday.as_slice()),
            (Weekday::Fri, self.friday.as_slice()),
            (Weekday::Sat, self.saturday.as_slice()),
            (Weekday::Sun, self.sunday.as_slice()),
        ]
    }
}

/// An interval whose bounds may be missing; rejected when the schedule is built
#[derive(Clone, Debug, Default, PartialEq, Eq)]
struct RawInterval {
    begin: Option<String>,
    end: Option<String>,
}

impl RawInterval {
    fn validate(&self) -> Result<WorkInterval, ConfigError> {
        let begin = self.begin.as_deref().map(parse_clock).transpose()?;
        let end = self.end.as_deref().map(IntervalEnd::from_str).transpose()?;
        WorkInterval::from_bounds(begin, end)
    }
}

impl Conf {
    /// Reads and parses a TOML configuration file.
    ///
    /// Relative holiday sources are resolved against the file's directory.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let mut conf: Conf = content.parse()?;
        conf.base_dir = path.parent().map(Path::to_path_buf);
        Ok(conf)
    }

    /// Returns the configured time zone
    pub fn zone(&self) -> Result<Tz, ConfigError> {
        let name = self.timezone.as_deref().unwrap_or(DEFAULT_TIMEZONE);
        name.parse::<Tz>()
            .map_err(|_| ConfigError::UnknownTimezone(name.to_string()))
    }

    /// Returns how working time is counted
    pub fn granularity(&self) -> Granularity {
        self.granularity
    }

    /// Builds the holiday calendar, reading every iCalendar source
    pub fn calendar(&self) -> Result<HolidayCalendar, ConfigError> {
        let mut custom = self.holidays.custom.clone();
        for source in &self.holidays.sources {
            let path = match &self.base_dir {
                Some(dir) if source.is_relative() => dir.join(source),
                _ => source.clone(),
            };
            custom.extend(ical::read_holidays(&path)?);
        }
        HolidayCalendar::new(self.holidays.regional, self.holidays.corpus_christi, custom)
    }

    /// Builds the weekly schedule
    pub fn schedule(&self) -> Result<WeeklySchedule, ConfigError> {
        let Some(schedule) = &self.schedule else {
            return Ok(WeeklySchedule::whole_days());
        };
        let mut entries = Vec::new();
        for (weekday, intervals) in schedule.days() {
            for raw in intervals {
                entries.push((weekday, raw.validate()?));
            }
        }
        WeeklySchedule::new(entries)
    }

    /// Validates the whole configuration and builds the calculator
    pub fn build(&self) -> Result<WorkingTimeCalculator, ConfigError> {
        let zone = self.zone()?;
        let calendar = self.calendar()?;
        let schedule = self.schedule()?;
        tracing::debug!(%zone, granularity = ?self.granularity, "configuration loaded");
        Ok(WorkingTimeCalculator::with_granularity(
            self.granularity,
            schedule,
            calendar,
            zone,
        ))
    }
}

impl FromStr for Conf {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(toml::from_str(s)?)
    }
}

/// Deserializes `DD.MM` strings into recurring holidays.
fn deserialize_holidays<'de, D>(deserializer: D) -> Result<Vec<FixedHoliday>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let raw: Vec<String> = Vec::deserialize(deserializer)?;
    raw.iter()
        .map(|value| value.parse::<FixedHoliday>().map_err(D::Error::custom))
        .collect()
}

/// Error message format for interval deserialization errors.
const INTERVAL_FMT: &str = "an interval like [\"08:00\", \"16:00\"] or { begin = \"08:00\", end = \"24:00\" }";

impl<'de> Deserialize<'de> for RawInterval {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        deserializer.deserialize_any(IntervalVisitor)
    }
}

/// Visitor accepting an interval as an array of at most two clock strings
/// or as a table with optional `begin` and `end` keys.
struct IntervalVisitor;

impl<'de> Visitor<'de> for IntervalVisitor {
    type Value = RawInterval;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        write!(formatter, "{}", INTERVAL_FMT)
    }

    fn visit_seq<A>(self, mut seq: A) -> Result<Self::Value, A::Error>
    where
        A: SeqAccess<'de>,
    {
        let begin = seq.next_element::<String>()?;
        let end = seq.next_element::<String>()?;
        if seq.next_element::<String>()?.is_some() {
            return Err(Error::invalid_length(3, &INTERVAL_FMT));
        }
        Ok(RawInterval { begin, end })
    }

    fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
    where
        A: MapAccess<'de>,
    {
        let mut interval = RawInterval::default();
        while let Some(key) = map.next_key::<String>()? {
            match key.as_str() {
                "begin" => interval.begin = Some(map.next_value()?),
                "end" => interval.end = Some(map.next_value()?),
                other => return Err(Error::unknown_field(other, &["begin", "end"])),
            }
        }
        Ok(interval)
    }
}
