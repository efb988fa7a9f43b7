//! Work slot resolution: locating concrete working time around an instant.
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

use chrono::{
    DateTime, Datelike, Days, LocalResult, NaiveDate, NaiveDateTime, NaiveTime, Offset, TimeDelta,
    TimeZone, Utc,
};
use chrono_tz::Tz;

use crate::{
    holiday::HolidayCalendar,
    schedule::{IntervalEnd, WeeklySchedule, WorkInterval},
};

/// One work interval placed on a concrete calendar date, as the absolute
/// range `[start, end)`.
///
/// Slots are derived on demand during a calculation and never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WorkSlot {
    start: DateTime<Utc>,
    end: DateTime<Utc>,
}

impl WorkSlot {
    /// Places `interval` on `date` in `zone`. An end-of-day bound becomes
    /// midnight of the following date.
    ///
    /// Returns `None` when the slot cannot be represented as an instant.
    pub fn materialize(date: NaiveDate, interval: &WorkInterval, zone: Tz) -> Option<Self> {
        let start = to_instant(zone, date.and_time(interval.begin()))?;
        let end = match interval.end() {
            IntervalEnd::At(time) => to_instant(zone, date.and_time(time))?,
            IntervalEnd::EndOfDay => {
                to_instant(zone, date.checked_add_days(Days::new(1))?.and_time(NaiveTime::MIN))?
            }
        };
        Some(Self { start, end })
    }

    /// Returns the first instant of the slot
    pub fn start(&self) -> DateTime<Utc> {
        self.start
    }

    /// Returns the instant the slot ends, exclusive
    pub fn end(&self) -> DateTime<Utc> {
        self.end
    }

    /// Returns the length of the slot
    pub fn duration(&self) -> TimeDelta {
        self.end - self.start
    }

    /// `true` if `t` lies within `[start, end)`
    pub fn contains(&self, t: DateTime<Utc>) -> bool {
        self.start <= t && t < self.end
    }
}

/// Finds work slots around an instant, skipping weekends and holidays.
///
/// Both searches walk whole calendar days in a loop; they terminate because
/// a validated schedule holds working time on some weekday and a validated
/// calendar leaves some date of the year free. A search that walks off the
/// representable dates yields `None`.
#[derive(Debug, Clone, Copy)]
pub struct WorkSlotResolver<'a> {
    schedule: &'a WeeklySchedule,
    calendar: &'a HolidayCalendar,
    zone: Tz,
}

impl<'a> WorkSlotResolver<'a> {
    /// Returns a resolver over `schedule` and `calendar`, read in `zone`
    pub fn new(schedule: &'a WeeklySchedule, calendar: &'a HolidayCalendar, zone: Tz) -> Self {
        Self { schedule, calendar, zone }
    }

    /// The slot containing `t`, or the first slot starting after it.
    ///
    /// The returned slot always ends after `t`.
    pub fn at_or_after(&self, t: DateTime<Utc>) -> Option<WorkSlot> {
        let mut date = t.with_timezone(&self.zone).date_naive();
        loop {
            if self.calendar.is_working_day(date) {
                // compared as instants: a bound inside a skipped hour moves past the gap
                for interval in self.schedule.slots_for(date.weekday()) {
                    let slot = WorkSlot::materialize(date, interval, self.zone)?;
                    if slot.end > t {
                        return Some(slot);
                    }
                }
            }
            tracing::trace!(%date, "no work slot left, moving forward");
            date = date.checked_add_days(Days::new(1))?;
        }
    }

    /// The slot containing `t`, or the last slot ending before it.
    ///
    /// The returned slot always starts at or before `t`.
    pub fn at_or_before(&self, t: DateTime<Utc>) -> Option<WorkSlot> {
        let mut date = t.with_timezone(&self.zone).date_naive();
        loop {
            if self.calendar.is_working_day(date) {
                for interval in self.schedule.slots_for_reversed(date.weekday()) {
                    let slot = WorkSlot::materialize(date, interval, self.zone)?;
                    if slot.start <= t {
                        return Some(slot);
                    }
                }
            }
            tracing::trace!(%date, "no work slot left, moving backward");
            date = date.checked_sub_days(Days::new(1))?;
        }
    }

    /// The slot following `slot`
    pub fn next(&self, slot: &WorkSlot) -> Option<WorkSlot> {
        self.at_or_after(slot.end)
    }

    /// The slot preceding `slot`
    pub fn previous(&self, slot: &WorkSlot) -> Option<WorkSlot> {
        self.at_or_before(slot.start.checked_sub_signed(TimeDelta::nanoseconds(1))?)
    }
}

/// Maps a wall-clock time in `zone` to an instant.
///
/// An ambiguous time resolves to the earlier instant. A time skipped by a
/// forward clock change keeps the offset in force before the change, landing
/// after the gap. Returns `None` outside the representable range.
pub(crate) fn to_instant(zone: Tz, local: NaiveDateTime) -> Option<DateTime<Utc>> {
    match zone.from_local_datetime(&local) {
        LocalResult::Single(dt) => Some(dt.with_timezone(&Utc)),
        LocalResult::Ambiguous(earliest, _) => Some(earliest.with_timezone(&Utc)),
        LocalResult::None => {
            let day_before = local.checked_sub_signed(TimeDelta::days(1))?;
            let before = zone.offset_from_utc_datetime(&day_before).fix();
            local
                .checked_sub_signed(TimeDelta::seconds(before.local_minus_utc().into()))
                .map(|utc| utc.and_utc())
        }
    }
}
