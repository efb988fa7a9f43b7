//! Weekly work schedule: same-day work intervals per weekday.
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

use std::{fmt, str::FromStr};

use chrono::{NaiveTime, Weekday};

use crate::error::ConfigError;

/// Clock format accepted for interval bounds, with seconds
const CLOCK_FORMAT_SECONDS: &str = "%H:%M:%S";
/// Clock format accepted for interval bounds
const CLOCK_FORMAT: &str = "%H:%M";
/// Spelling of the end-of-day bound in configuration files
const END_OF_DAY: &str = "24:00";

/// Weekdays in ISO order, Monday first
pub const WEEKDAYS: [Weekday; 7] = [
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
    Weekday::Sun,
];

/// Upper bound of a work interval.
///
/// `EndOfDay` reaches midnight of the following calendar date; it orders
/// after every clock value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum IntervalEnd {
    At(NaiveTime),
    EndOfDay,
}

impl IntervalEnd {
    /// `true` if this bound lies strictly after `time` on the same day
    pub fn is_after(&self, time: NaiveTime) -> bool {
        match self {
            IntervalEnd::At(end) => *end > time,
            IntervalEnd::EndOfDay => true,
        }
    }
}

impl fmt::Display for IntervalEnd {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IntervalEnd::At(time) => write!(f, "{}", time.format(CLOCK_FORMAT)),
            IntervalEnd::EndOfDay => f.write_str(END_OF_DAY),
        }
    }
}

impl FromStr for IntervalEnd {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim() == END_OF_DAY {
            return Ok(IntervalEnd::EndOfDay);
        }
        parse_clock(s).map(IntervalEnd::At)
    }
}

/// Parses `HH:MM` or `HH:MM:SS`
pub fn parse_clock(value: &str) -> Result<NaiveTime, ConfigError> {
    let value = value.trim();
    NaiveTime::parse_from_str(value, CLOCK_FORMAT_SECONDS)
        .or_else(|_| NaiveTime::parse_from_str(value, CLOCK_FORMAT))
        .map_err(|_| ConfigError::InvalidTime { value: value.to_string() })
}

/// A same-day range of working time, `[begin, end)`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct WorkInterval {
    begin: NaiveTime,
    end: IntervalEnd,
}

impl WorkInterval {
    /// Creates an interval, rejecting a begin that lies after the end
    pub fn new(begin: NaiveTime, end: IntervalEnd) -> Result<Self, ConfigError> {
        if let IntervalEnd::At(end_time) = end {
            if begin > end_time {
                return Err(ConfigError::InvalidInterval {
                    reason: format!("begin {} lies after end {}", begin.format(CLOCK_FORMAT), end),
                });
            }
        }
        Ok(Self { begin, end })
    }

    /// Creates an interval from optional bounds as they arrive from
    /// configuration; both bounds are required
    pub fn from_bounds(begin: Option<NaiveTime>, end: Option<IntervalEnd>) -> Result<Self, ConfigError> {
        match (begin, end) {
            (Some(begin), Some(end)) => Self::new(begin, end),
            (begin, end) => Err(ConfigError::missing_bound(begin, end.is_some())),
        }
    }

    /// An interval running from `begin` to the end of the calendar day
    pub fn until_end_of_day(begin: NaiveTime) -> Self {
        Self { begin, end: IntervalEnd::EndOfDay }
    }

    /// The whole calendar day
    pub fn whole_day() -> Self {
        Self::until_end_of_day(NaiveTime::MIN)
    }

    /// Returns the first time of day the interval covers
    pub fn begin(&self) -> NaiveTime {
        self.begin
    }

    /// Returns the exclusive end bound
    pub fn end(&self) -> IntervalEnd {
        self.end
    }

    /// `true` for an interval that holds no working time
    pub fn is_empty(&self) -> bool {
        self.end == IntervalEnd::At(self.begin)
    }
}

impl fmt::Display for WorkInterval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.begin.format(CLOCK_FORMAT), self.end)
    }
}

/// Work intervals per weekday.
///
/// Intervals of one day are kept sorted ascending by begin and never overlap.
/// At least one weekday from Monday to Friday holds working time, so every
/// slot search over the calendar terminates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WeeklySchedule {
    /// Indexed by `Weekday::num_days_from_monday`
    days: [Vec<WorkInterval>; 7],
}

impl WeeklySchedule {
    /// Builds a schedule from (weekday, interval) pairs in any order.
    ///
    /// # Errors
    /// * `ConfigError::OverlappingIntervals` if two intervals of one weekday
    ///   share working time
    /// * `ConfigError::NoWorkingDays` if no weekday from Monday to Friday
    ///   holds working time (Saturday and Sunday never count)
    pub fn new(entries: impl IntoIterator<Item = (Weekday, WorkInterval)>) -> Result<Self, ConfigError> {
        let mut days: [Vec<WorkInterval>; 7] = Default::default();
        for (weekday, interval) in entries {
            days[weekday.num_days_from_monday() as usize].push(interval);
        }

        for (weekday, intervals) in WEEKDAYS.iter().zip(days.iter_mut()) {
            intervals.sort();
            check_overlaps(*weekday, intervals)?;
        }

        let schedule = Self { days };
        if schedule.working_weekdays().next().is_none() {
            return Err(ConfigError::NoWorkingDays);
        }
        tracing::debug!(
            working_weekdays = schedule.working_weekdays().count(),
            intervals = schedule.days.iter().map(Vec::len).sum::<usize>(),
            "weekly schedule built"
        );
        Ok(schedule)
    }

    /// Whole calendar days from Monday to Friday
    pub fn whole_days() -> Self {
        let mut days: [Vec<WorkInterval>; 7] = Default::default();
        for day in days.iter_mut().take(5) {
            day.push(WorkInterval::whole_day());
        }
        Self { days }
    }

    /// Intervals of `weekday`, ascending by begin
    pub fn slots_for(&self, weekday: Weekday) -> &[WorkInterval] {
        &self.days[weekday.num_days_from_monday() as usize]
    }

    /// Intervals of `weekday`, descending by begin
    pub fn slots_for_reversed(&self, weekday: Weekday) -> impl Iterator<Item = &WorkInterval> {
        self.slots_for(weekday).iter().rev()
    }

    /// Weekdays from Monday to Friday that hold working time
    pub fn working_weekdays(&self) -> impl Iterator<Item = Weekday> + '_ {
        WEEKDAYS
            .into_iter()
            .take(5)
            .filter(move |weekday| self.slots_for(*weekday).iter().any(|i| !i.is_empty()))
    }
}

fn check_overlaps(weekday: Weekday, sorted: &[WorkInterval]) -> Result<(), ConfigError> {
    let mut reach: Option<&WorkInterval> = None;
    for interval in sorted {
        if let Some(previous) = reach {
            if previous.end().is_after(interval.begin()) {
                return Err(ConfigError::OverlappingIntervals {
                    weekday,
                    first: previous.to_string(),
                    second: interval.to_string(),
                });
            }
        }
        if reach.is_none_or(|previous| interval.end() > previous.end()) {
            reach = Some(interval);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn time(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    fn interval(from: u32, to: u32) -> WorkInterval {
        WorkInterval::new(time(from, 0), IntervalEnd::At(time(to, 0))).unwrap()
    }

    #[test]
    fn interval_with_missing_bound_is_rejected() {
        assert!(matches!(
            WorkInterval::from_bounds(Some(time(8, 0)), None),
            Err(ConfigError::InvalidInterval { .. })
        ));
        assert!(matches!(
            WorkInterval::from_bounds(None, Some(IntervalEnd::EndOfDay)),
            Err(ConfigError::InvalidInterval { .. })
        ));
        assert!(WorkInterval::from_bounds(Some(time(8, 0)), Some(IntervalEnd::EndOfDay)).is_ok());
    }

    #[test]
    fn interval_with_begin_after_end_is_rejected() {
        assert!(matches!(
            WorkInterval::new(time(16, 0), IntervalEnd::At(time(8, 0))),
            Err(ConfigError::InvalidInterval { .. })
        ));
        assert!(WorkInterval::new(time(8, 0), IntervalEnd::At(time(8, 0))).unwrap().is_empty());
    }

    #[test]
    fn end_of_day_orders_after_every_clock_value() {
        let last = NaiveTime::from_hms_nano_opt(23, 59, 59, 999_999_999).unwrap();
        assert!(IntervalEnd::EndOfDay > IntervalEnd::At(last));
        assert!(IntervalEnd::EndOfDay.is_after(last));
        assert!(!IntervalEnd::At(time(16, 0)).is_after(time(16, 0)));
    }

    #[test]
    fn interval_bounds_parse() {
        assert_eq!("24:00".parse::<IntervalEnd>().unwrap(), IntervalEnd::EndOfDay);
        assert_eq!("16:30".parse::<IntervalEnd>().unwrap(), IntervalEnd::At(time(16, 30)));
        assert_eq!(parse_clock("07:15:30").unwrap(), NaiveTime::from_hms_opt(7, 15, 30).unwrap());
        assert!(matches!(parse_clock("25:00"), Err(ConfigError::InvalidTime { .. })));
    }

    #[test]
    fn intervals_are_exposed_sorted_both_ways() {
        let schedule = WeeklySchedule::new([
            (Weekday::Mon, interval(13, 17)),
            (Weekday::Mon, interval(8, 12)),
            (Weekday::Mon, WorkInterval::until_end_of_day(time(20, 0))),
        ])
        .unwrap();

        let ascending: Vec<_> = schedule.slots_for(Weekday::Mon).iter().map(|i| i.begin()).collect();
        assert_eq!(ascending, vec![time(8, 0), time(13, 0), time(20, 0)]);
        let descending: Vec<_> = schedule.slots_for_reversed(Weekday::Mon).map(|i| i.begin()).collect();
        assert_eq!(descending, vec![time(20, 0), time(13, 0), time(8, 0)]);
        assert!(schedule.slots_for(Weekday::Tue).is_empty());
    }

    #[test]
    fn overlapping_intervals_are_rejected() {
        let result = WeeklySchedule::new([
            (Weekday::Wed, interval(8, 12)),
            (Weekday::Wed, interval(11, 14)),
        ]);
        assert!(matches!(
            result,
            Err(ConfigError::OverlappingIntervals { weekday: Weekday::Wed, .. })
        ));

        let nested = WeeklySchedule::new([
            (Weekday::Wed, interval(8, 18)),
            (Weekday::Wed, interval(9, 10)),
            (Weekday::Wed, interval(12, 13)),
        ]);
        assert!(nested.is_err());
    }

    #[test]
    fn touching_intervals_are_accepted() {
        let schedule = WeeklySchedule::new([
            (Weekday::Thu, interval(8, 12)),
            (Weekday::Thu, interval(12, 16)),
        ]);
        assert!(schedule.is_ok());
    }

    #[test]
    fn schedule_without_weekday_work_is_rejected() {
        assert!(matches!(WeeklySchedule::new([]), Err(ConfigError::NoWorkingDays)));
        let weekend_only = WeeklySchedule::new([
            (Weekday::Sat, interval(8, 12)),
            (Weekday::Sun, interval(8, 12)),
        ]);
        assert!(matches!(weekend_only, Err(ConfigError::NoWorkingDays)));
        let empty_intervals = WeeklySchedule::new([(Weekday::Mon, interval(8, 8))]);
        assert!(matches!(empty_intervals, Err(ConfigError::NoWorkingDays)));
    }

    #[test]
    fn whole_days_cover_monday_to_friday() {
        let schedule = WeeklySchedule::whole_days();
        assert_eq!(schedule.working_weekdays().count(), 5);
        assert_eq!(schedule.slots_for(Weekday::Fri), &[WorkInterval::whole_day()]);
        assert!(schedule.slots_for(Weekday::Sat).is_empty());
    }
}
