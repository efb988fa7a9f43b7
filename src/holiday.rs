//! Weekend and holiday determination, including Easter-based moving holidays.
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

use std::{collections::BTreeSet, fmt, str::FromStr};

use chrono::{Datelike, Days, NaiveDate, Weekday};

use crate::error::ConfigError;

/// Leap year used to validate recurring (day, month) pairs, so that 29.02 is accepted
const VALIDATION_YEAR: i32 = 2000;
/// Common year scanned to detect a custom holiday set that leaves no day free
const COMMON_YEAR: i32 = 2001;

/// A holiday recurring on the same day and month every year
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FixedHoliday {
    month: u32,
    day: u32,
}

impl FixedHoliday {
    /// Creates a recurring holiday, rejecting pairs such as 31.04 that never
    /// name a calendar date
    pub fn new(day: u32, month: u32) -> Result<Self, ConfigError> {
        if NaiveDate::from_ymd_opt(VALIDATION_YEAR, month, day).is_none() {
            return Err(ConfigError::InvalidHoliday { day, month });
        }
        Ok(Self { month, day })
    }

    /// Returns the day of the month, starting at 1
    pub fn day(&self) -> u32 {
        self.day
    }

    /// Returns the month, starting at 1
    pub fn month(&self) -> u32 {
        self.month
    }

    /// Returns `true` if `date` falls on this day and month
    pub fn matches(&self, date: NaiveDate) -> bool {
        date.day() == self.day && date.month() == self.month
    }
}

impl fmt::Display for FixedHoliday {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}.{:02}", self.day, self.month)
    }
}

impl FromStr for FixedHoliday {
    type Err = ConfigError;

    /// Parses `DD.MM`, e.g. `24.12`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let malformed = || ConfigError::MalformedHoliday { value: s.to_string() };
        let (day, month) = s.trim().split_once('.').ok_or_else(malformed)?;
        let day = day.parse::<u32>().map_err(|_| malformed())?;
        let month = month.parse::<u32>().map_err(|_| malformed())?;
        FixedHoliday::new(day, month)
    }
}

/// A holiday placed at a fixed number of days from Easter Sunday
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MovingHoliday {
    name: &'static str,
    offset: i64,
}

impl MovingHoliday {
    pub const fn new(name: &'static str, offset: i64) -> Self {
        Self { name, offset }
    }

    /// Returns the display name, e.g. `Good Friday`
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Signed distance in days from Easter Sunday
    pub fn offset(&self) -> i64 {
        self.offset
    }

    /// The date of this holiday in `year`
    pub fn date_in(&self, year: i32) -> Option<NaiveDate> {
        let easter = easter_sunday(year)?;
        let days = Days::new(self.offset.unsigned_abs());
        if self.offset < 0 {
            easter.checked_sub_days(days)
        } else {
            easter.checked_add_days(days)
        }
    }
}

pub const GOOD_FRIDAY: MovingHoliday = MovingHoliday::new("Good Friday", -2);
pub const EASTER_MONDAY: MovingHoliday = MovingHoliday::new("Easter Monday", 1);
pub const ASCENSION_DAY: MovingHoliday = MovingHoliday::new("Ascension Day", 39);
pub const WHIT_MONDAY: MovingHoliday = MovingHoliday::new("Whit Monday", 50);
pub const CORPUS_CHRISTI: MovingHoliday = MovingHoliday::new("Corpus Christi", 60);

/// Built-in regional (German nationwide) fixed holidays
static REGIONAL_FIXED: [FixedHoliday; 5] = [
    FixedHoliday { month: 1, day: 1 },
    FixedHoliday { month: 5, day: 1 },
    FixedHoliday { month: 10, day: 3 },
    FixedHoliday { month: 12, day: 25 },
    FixedHoliday { month: 12, day: 26 },
];

/// Built-in regional moving holidays; Corpus Christi is toggled separately
static REGIONAL_MOVING: [MovingHoliday; 4] = [GOOD_FRIDAY, EASTER_MONDAY, ASCENSION_DAY, WHIT_MONDAY];

/// The rule that turned a date into a holiday
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Holiday {
    /// One of the built-in regional fixed holidays
    Regional(FixedHoliday),
    /// One of the built-in Easter-based holidays
    Moving(MovingHoliday),
    /// A caller-supplied recurring holiday
    Custom(FixedHoliday),
}

impl fmt::Display for Holiday {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Holiday::Regional(h) => write!(f, "regional holiday {h}"),
            Holiday::Moving(h) => write!(f, "{}", h.name()),
            Holiday::Custom(h) => write!(f, "custom holiday {h}"),
        }
    }
}

/// Decides for a calendar date whether it is a weekend day, a holiday or a
/// working day.
///
/// Immutable once built. Easter dates are recomputed on each lookup; the
/// formula is a handful of integer operations.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HolidayCalendar {
    /// Built-in regional fixed and moving holidays
    regional: bool,
    /// Corpus Christi, honoured only together with `regional`
    corpus_christi: bool,
    /// Caller-supplied recurring holidays
    custom: BTreeSet<FixedHoliday>,
}

impl HolidayCalendar {
    /// Builds a calendar.
    ///
    /// # Errors
    /// * `ConfigError::NoWorkingDays` if the fixed and custom holidays cover
    ///   every date of a common year
    pub fn new(
        regional: bool,
        corpus_christi: bool,
        custom: impl IntoIterator<Item = FixedHoliday>,
    ) -> Result<Self, ConfigError> {
        let calendar = Self {
            regional,
            corpus_christi,
            custom: custom.into_iter().collect(),
        };
        if calendar.covers_every_date() {
            return Err(ConfigError::NoWorkingDays);
        }
        tracing::debug!(
            regional,
            corpus_christi = calendar.corpus_christi_active(),
            custom = calendar.custom.len(),
            "holiday calendar built"
        );
        Ok(calendar)
    }

    /// Caller-supplied recurring holidays in (month, day) order
    pub fn custom_holidays(&self) -> impl Iterator<Item = &FixedHoliday> {
        self.custom.iter()
    }

    /// Returns `true` for Saturday and Sunday, whatever the configuration
    pub fn is_weekend(&self, date: NaiveDate) -> bool {
        matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
    }

    pub fn is_holiday(&self, date: NaiveDate) -> bool {
        self.holiday_on(date).is_some()
    }

    pub fn is_working_day(&self, date: NaiveDate) -> bool {
        !self.is_weekend(date) && !self.is_holiday(date)
    }

    /// Names the rule that makes `date` a holiday, if any.
    ///
    /// Regional fixed holidays take precedence over moving ones, which take
    /// precedence over custom ones.
    pub fn holiday_on(&self, date: NaiveDate) -> Option<Holiday> {
        if self.regional {
            if let Some(h) = REGIONAL_FIXED.iter().find(|h| h.matches(date)) {
                return Some(Holiday::Regional(*h));
            }
            if let Some(h) = self
                .moving_holidays()
                .find(|h| h.date_in(date.year()) == Some(date))
            {
                return Some(Holiday::Moving(h));
            }
        }
        self.custom
            .iter()
            .find(|h| h.matches(date))
            .map(|h| Holiday::Custom(*h))
    }

    /// The moving holidays in effect for this calendar
    pub fn moving_holidays(&self) -> impl Iterator<Item = MovingHoliday> + use<> {
        let regional = self.regional;
        let corpus_christi = self.corpus_christi_active().then_some(CORPUS_CHRISTI);
        REGIONAL_MOVING
            .iter()
            .copied()
            .filter(move |_| regional)
            .chain(corpus_christi)
    }

    /// Moves `days` working days forward from `date`.
    ///
    /// `date` itself is not counted; with `days == 0` it is returned unchanged.
    /// Returns `None` when the walk passes `NaiveDate::MAX`.
    pub fn add_working_days(&self, date: NaiveDate, days: u32) -> Option<NaiveDate> {
        let mut current = date;
        let mut left = days;
        while left > 0 {
            current = current.checked_add_days(Days::new(1))?;
            if self.is_working_day(current) {
                left -= 1;
            }
        }
        Some(current)
    }

    /// Moves `days` working days backward from `date`, or `None` when the
    /// walk passes `NaiveDate::MIN`
    pub fn subtract_working_days(&self, date: NaiveDate, days: u32) -> Option<NaiveDate> {
        let mut current = date;
        let mut left = days;
        while left > 0 {
            current = current.checked_sub_days(Days::new(1))?;
            if self.is_working_day(current) {
                left -= 1;
            }
        }
        Some(current)
    }

    /// Counts the working days in the half-open range `[min, max)` of the two
    /// dates
    pub fn working_days_between(&self, a: NaiveDate, b: NaiveDate) -> u32 {
        let (from, to) = if a <= b { (a, b) } else { (b, a) };
        from.iter_days()
            .take_while(|d| *d < to)
            .filter(|d| self.is_working_day(*d))
            .count() as u32
    }

    fn corpus_christi_active(&self) -> bool {
        self.regional && self.corpus_christi
    }

    /// `true` if no date of a common year escapes the fixed and custom
    /// holidays, leaving at most 29.02 as a working day
    fn covers_every_date(&self) -> bool {
        let Some(first) = NaiveDate::from_ymd_opt(COMMON_YEAR, 1, 1) else {
            return false;
        };
        first
            .iter_days()
            .take_while(|d| d.year() == COMMON_YEAR)
            .all(|d| {
                (self.regional && REGIONAL_FIXED.iter().any(|h| h.matches(d)))
                    || self.custom.iter().any(|h| h.matches(d))
            })
    }
}

/// Computes Easter Sunday of the Gregorian `year` with the Meeus/Jones/Butcher
/// algorithm.
///
/// Returns `None` only for years outside the range `NaiveDate` can represent.
pub fn easter_sunday(year: i32) -> Option<NaiveDate> {
    let a = year.rem_euclid(19);
    let b = year.div_euclid(100);
    let c = year.rem_euclid(100);
    let d = b.div_euclid(4);
    let e = b.rem_euclid(4);
    let f = (b + 8).div_euclid(25);
    let g = (b - f + 1).div_euclid(3);
    let h = (19 * a + b - d - g + 15).rem_euclid(30);
    let i = c / 4;
    let k = c % 4;
    let l = (32 + 2 * e + 2 * i - h - k).rem_euclid(7);
    let m = (a + 11 * h + 22 * l) / 451;
    let month = (h + l - 7 * m + 114) / 31;
    let day = (h + l - 7 * m + 114) % 31 + 1;
    NaiveDate::from_ymd_opt(year, month as u32, day as u32)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn regional(corpus_christi: bool) -> HolidayCalendar {
        HolidayCalendar::new(true, corpus_christi, []).unwrap()
    }

    #[test]
    fn easter_sunday_matches_reference_dates() {
        assert_eq!(easter_sunday(2000), Some(date(2000, 4, 23)));
        assert_eq!(easter_sunday(2008), Some(date(2008, 3, 23)));
        assert_eq!(easter_sunday(2019), Some(date(2019, 4, 21)));
        assert_eq!(easter_sunday(2023), Some(date(2023, 4, 9)));
        assert_eq!(easter_sunday(2024), Some(date(2024, 3, 31)));
        assert_eq!(easter_sunday(2025), Some(date(2025, 4, 20)));
        assert_eq!(easter_sunday(2038), Some(date(2038, 4, 25)));
        assert_eq!(easter_sunday(1818), Some(date(1818, 3, 22)));
    }

    #[test]
    fn easter_sunday_is_always_a_sunday_between_march_22_and_april_25() {
        for year in 1583..2600 {
            let easter = easter_sunday(year).unwrap();
            assert_eq!(easter.weekday(), Weekday::Sun, "{year}");
            assert!(easter >= date(year, 3, 22) && easter <= date(year, 4, 25), "{year}");
        }
    }

    #[test]
    fn weekends_never_work_whatever_the_configuration() {
        let calendars = [
            HolidayCalendar::default(),
            regional(true),
            HolidayCalendar::new(false, true, [FixedHoliday::new(6, 1).unwrap()]).unwrap(),
        ];
        let saturday = date(2024, 1, 6);
        for calendar in &calendars {
            for week in 0..60 {
                let sat = saturday + Days::new(7 * week);
                let sun = sat + Days::new(1);
                assert!(calendar.is_weekend(sat) && calendar.is_weekend(sun));
                assert!(!calendar.is_working_day(sat));
                assert!(!calendar.is_working_day(sun));
            }
        }
    }

    #[test]
    fn regional_moving_holidays_follow_easter_2024() {
        let calendar = regional(false);
        assert_eq!(calendar.holiday_on(date(2024, 3, 29)), Some(Holiday::Moving(GOOD_FRIDAY)));
        assert_eq!(calendar.holiday_on(date(2024, 4, 1)), Some(Holiday::Moving(EASTER_MONDAY)));
        assert_eq!(calendar.holiday_on(date(2024, 5, 9)), Some(Holiday::Moving(ASCENSION_DAY)));
        assert_eq!(calendar.holiday_on(date(2024, 5, 20)), Some(Holiday::Moving(WHIT_MONDAY)));
        // Corpus Christi 2024 is Thursday, May 30
        assert!(calendar.is_working_day(date(2024, 5, 30)));
        assert!(!regional(true).is_working_day(date(2024, 5, 30)));
    }

    #[test]
    fn corpus_christi_requires_the_regional_set() {
        let calendar = HolidayCalendar::new(false, true, []).unwrap();
        assert!(calendar.is_working_day(date(2024, 5, 30)));
        assert!(calendar.is_working_day(date(2024, 4, 1)));
        assert_eq!(calendar.moving_holidays().count(), 0);
        assert_eq!(regional(true).moving_holidays().count(), 5);
    }

    #[test]
    fn regional_fixed_holidays() {
        let calendar = regional(false);
        for d in [date(2024, 1, 1), date(2024, 5, 1), date(2024, 10, 3), date(2024, 12, 25), date(2024, 12, 26)] {
            assert!(calendar.is_holiday(d), "{d}");
        }
        assert!(HolidayCalendar::default().is_working_day(date(2024, 10, 3)));
    }

    #[test]
    fn custom_holiday_on_a_monday_is_not_a_working_day() {
        let calendar = HolidayCalendar::new(false, false, [FixedHoliday::new(1, 1).unwrap()]).unwrap();
        let new_year = date(2024, 1, 1);
        assert_eq!(new_year.weekday(), Weekday::Mon);
        assert!(!calendar.is_weekend(new_year));
        assert!(!calendar.is_working_day(new_year));
        assert_eq!(
            calendar.holiday_on(new_year),
            Some(Holiday::Custom(FixedHoliday::new(1, 1).unwrap()))
        );
    }

    #[test]
    fn fixed_holiday_parsing_and_validation() {
        assert_eq!("24.12".parse::<FixedHoliday>().unwrap(), FixedHoliday::new(24, 12).unwrap());
        assert_eq!("29.02".parse::<FixedHoliday>().unwrap().to_string(), "29.02");
        assert!(matches!("31.04".parse::<FixedHoliday>(), Err(ConfigError::InvalidHoliday { day: 31, month: 4 })));
        assert!(matches!("24/12".parse::<FixedHoliday>(), Err(ConfigError::MalformedHoliday { .. })));
        assert!(matches!("x.12".parse::<FixedHoliday>(), Err(ConfigError::MalformedHoliday { .. })));
    }

    #[test]
    fn calendar_covering_every_date_is_rejected() {
        let every_day = date(COMMON_YEAR, 1, 1)
            .iter_days()
            .take_while(|d| d.year() == COMMON_YEAR)
            .map(|d| FixedHoliday::new(d.day(), d.month()).unwrap());
        assert!(matches!(
            HolidayCalendar::new(false, false, every_day),
            Err(ConfigError::NoWorkingDays)
        ));
    }

    #[test]
    fn working_day_steps_skip_weekends_and_holidays() {
        let calendar = regional(false);
        // Thursday before Easter 2024
        let thursday = date(2024, 3, 28);
        assert_eq!(calendar.add_working_days(thursday, 1), Some(date(2024, 4, 2)));
        assert_eq!(calendar.subtract_working_days(date(2024, 4, 2), 1), Some(thursday));
        assert_eq!(calendar.add_working_days(thursday, 0), Some(thursday));
        assert_eq!(calendar.working_days_between(thursday, date(2024, 4, 3)), 2);
        assert_eq!(calendar.working_days_between(date(2024, 4, 3), thursday), 2);
        assert_eq!(calendar.working_days_between(thursday, thursday), 0);
    }

    #[test]
    fn working_day_steps_stop_at_the_calendar_bounds() {
        let calendar = regional(true);
        assert_eq!(calendar.add_working_days(NaiveDate::MAX, 0), Some(NaiveDate::MAX));
        assert_eq!(calendar.add_working_days(NaiveDate::MAX, 1), None);
        assert_eq!(calendar.subtract_working_days(NaiveDate::MIN, 1), None);
        let near_end = NaiveDate::MAX.checked_sub_days(Days::new(2)).unwrap();
        assert_eq!(calendar.add_working_days(near_end, 10), None);
    }
}
