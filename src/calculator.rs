//! Working-time arithmetic over a weekly schedule and a holiday calendar.
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

use chrono::{DateTime, NaiveDate, SubsecRound, TimeDelta, Utc};
use chrono_tz::Tz;
use serde::Deserialize;

use crate::{
    error::CalcError,
    holiday::HolidayCalendar,
    schedule::WeeklySchedule,
    slot::{WorkSlotResolver, to_instant},
};

/// Digits of sub-second precision kept on returned timestamps (milliseconds)
const RESULT_SUBSEC_DIGITS: u16 = 3;

/// How finely working time is counted
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Granularity {
    /// Only the configured work intervals count
    #[default]
    WorkSlots,
    /// Every working day counts from midnight to midnight
    WorkingDays,
}

/// The public calculator: adds, subtracts and measures working time.
///
/// Holds immutable configuration only, so a single instance can serve any
/// number of threads.
#[derive(Debug, Clone)]
pub struct WorkingTimeCalculator {
    schedule: WeeklySchedule,
    calendar: HolidayCalendar,
    zone: Tz,
    granularity: Granularity,
}

impl WorkingTimeCalculator {
    /// A calculator counting the intervals of `schedule`
    pub fn new(schedule: WeeklySchedule, calendar: HolidayCalendar, zone: Tz) -> Self {
        Self {
            schedule,
            calendar,
            zone,
            granularity: Granularity::WorkSlots,
        }
    }

    /// A calculator counting whole working days
    pub fn working_days(calendar: HolidayCalendar, zone: Tz) -> Self {
        Self {
            schedule: WeeklySchedule::whole_days(),
            calendar,
            zone,
            granularity: Granularity::WorkingDays,
        }
    }

    /// Picks the strategy named by `granularity`; `schedule` is ignored for
    /// whole working days
    pub fn with_granularity(
        granularity: Granularity,
        schedule: WeeklySchedule,
        calendar: HolidayCalendar,
        zone: Tz,
    ) -> Self {
        match granularity {
            Granularity::WorkSlots => Self::new(schedule, calendar, zone),
            Granularity::WorkingDays => Self::working_days(calendar, zone),
        }
    }

    /// Returns the weekly schedule; whole days for `Granularity::WorkingDays`
    pub fn schedule(&self) -> &WeeklySchedule {
        &self.schedule
    }

    /// Returns the holiday calendar
    pub fn calendar(&self) -> &HolidayCalendar {
        &self.calendar
    }

    /// Returns the zone work intervals and calendar dates are read in
    pub fn zone(&self) -> Tz {
        self.zone
    }

    /// Returns how working time is counted
    pub fn granularity(&self) -> Granularity {
        self.granularity
    }

    fn resolver(&self) -> WorkSlotResolver<'_> {
        WorkSlotResolver::new(&self.schedule, &self.calendar, self.zone)
    }

    /// Returns the instant reached after `duration` of working time from `start`.
    ///
    /// If `start` lies outside working time, counting begins at the next slot;
    /// with a zero duration that slot's start is the result. `start` is
    /// truncated to milliseconds first, like every returned instant.
    ///
    /// # Errors
    /// * `CalcError::NegativeDuration` if `duration` is negative
    /// * `CalcError::OutOfRange` if the result lies beyond the representable dates
    pub fn add_working_time(&self, start: DateTime<Utc>, duration: TimeDelta) -> Result<DateTime<Utc>, CalcError> {
        if duration < TimeDelta::zero() {
            return Err(CalcError::NegativeDuration(duration));
        }

        let start = start.trunc_subsecs(RESULT_SUBSEC_DIGITS);
        let resolver = self.resolver();
        let mut slot = resolver.at_or_after(start).ok_or(CalcError::OutOfRange)?;
        let mut cursor = start.max(slot.start());
        let mut remaining = duration;
        loop {
            let capacity = slot.end() - cursor;
            if remaining <= capacity {
                let result = cursor
                    .checked_add_signed(remaining)
                    .ok_or(CalcError::OutOfRange)?
                    .trunc_subsecs(RESULT_SUBSEC_DIGITS);
                tracing::debug!(%start, %duration, %result, "added working time");
                return Ok(result);
            }
            remaining = remaining - capacity;
            let reached = slot.end();
            slot = resolver.next(&slot).ok_or(CalcError::OutOfRange)?;
            cursor = reached.max(slot.start());
            tracing::trace!(slot_start = %slot.start(), %remaining, "moved to next work slot");
        }
    }

    /// Returns the instant lying `duration` of working time before `start`.
    ///
    /// If `start` lies outside working time, counting begins at the end of the
    /// preceding slot; with a zero duration that slot's end is the result.
    /// `start` is truncated to milliseconds first.
    ///
    /// # Errors
    /// * `CalcError::NegativeDuration` if `duration` is negative
    /// * `CalcError::OutOfRange` if the result lies before the representable dates
    pub fn subtract_working_time(
        &self,
        start: DateTime<Utc>,
        duration: TimeDelta,
    ) -> Result<DateTime<Utc>, CalcError> {
        if duration < TimeDelta::zero() {
            return Err(CalcError::NegativeDuration(duration));
        }

        let start = start.trunc_subsecs(RESULT_SUBSEC_DIGITS);
        let resolver = self.resolver();
        let mut slot = resolver.at_or_before(start).ok_or(CalcError::OutOfRange)?;
        let mut cursor = start.min(slot.end());
        let mut remaining = duration;
        loop {
            let capacity = cursor - slot.start();
            if remaining <= capacity {
                let result = (cursor - remaining).trunc_subsecs(RESULT_SUBSEC_DIGITS);
                tracing::debug!(%start, %duration, %result, "subtracted working time");
                return Ok(result);
            }
            remaining = remaining - capacity;
            let reached = slot.start();
            slot = resolver.previous(&slot).ok_or(CalcError::OutOfRange)?;
            cursor = reached.min(slot.end());
            tracing::trace!(slot_end = %slot.end(), %remaining, "moved to previous work slot");
        }
    }

    /// Measures the working time elapsing from `from` to `to`, both truncated
    /// to milliseconds.
    ///
    /// # Errors
    /// * `CalcError::ReversedRange` if `from` lies after `to`
    /// * `CalcError::OutOfRange` if no slot can be placed after `from`
    pub fn working_time_between(&self, from: DateTime<Utc>, to: DateTime<Utc>) -> Result<TimeDelta, CalcError> {
        if from > to {
            return Err(CalcError::ReversedRange { from, to });
        }

        let from = from.trunc_subsecs(RESULT_SUBSEC_DIGITS);
        let to = to.trunc_subsecs(RESULT_SUBSEC_DIGITS);
        let resolver = self.resolver();
        let mut slot = resolver.at_or_after(from).ok_or(CalcError::OutOfRange)?;
        let mut cursor = from;
        let mut total = TimeDelta::zero();
        loop {
            let earliest_start = cursor.max(slot.start());
            if slot.end() >= to {
                // `to` may fall in the gap before this slot begins
                if slot.start() <= to {
                    total = total + (to - earliest_start);
                }
                tracing::debug!(%from, %to, %total, "measured working time");
                return Ok(total);
            }
            total = total + (slot.end() - earliest_start);
            cursor = slot.end();
            slot = resolver.next(&slot).ok_or(CalcError::OutOfRange)?;
        }
    }

    /// `true` if any working time lies between `a` and `b`, in either order
    pub fn is_working_time_between(&self, a: DateTime<Utc>, b: DateTime<Utc>) -> bool {
        self.working_time_between(a.min(b), a.max(b))
            .is_ok_and(|elapsed| elapsed > TimeDelta::zero())
    }

    /// `true` if the calendar date of `t` in the configured zone is a working day
    pub fn is_working_day(&self, t: DateTime<Utc>) -> bool {
        self.calendar.is_working_day(self.local_date(t))
    }

    /// Moves `t` forward by `days` working days, keeping its time of day.
    ///
    /// # Errors
    /// * `CalcError::OutOfRange` if the target date is not representable
    pub fn add_working_days(&self, t: DateTime<Utc>, days: u32) -> Result<DateTime<Utc>, CalcError> {
        self.shift_date(t, |date| self.calendar.add_working_days(date, days))
    }

    /// Moves `t` backward by `days` working days, keeping its time of day.
    ///
    /// # Errors
    /// * `CalcError::OutOfRange` if the target date is not representable
    pub fn subtract_working_days(&self, t: DateTime<Utc>, days: u32) -> Result<DateTime<Utc>, CalcError> {
        self.shift_date(t, |date| self.calendar.subtract_working_days(date, days))
    }

    /// `true` if a working day lies strictly between the dates of `a` and `b`
    pub fn has_working_days_between(&self, a: DateTime<Utc>, b: DateTime<Utc>) -> bool {
        let (first, last) = (self.local_date(a.min(b)), self.local_date(a.max(b)));
        first
            .iter_days()
            .skip(1)
            .take_while(|date| *date < last)
            .any(|date| self.calendar.is_working_day(date))
    }

    fn local_date(&self, t: DateTime<Utc>) -> NaiveDate {
        t.with_timezone(&self.zone).date_naive()
    }

    fn shift_date(
        &self,
        t: DateTime<Utc>,
        shift: impl FnOnce(NaiveDate) -> Option<NaiveDate>,
    ) -> Result<DateTime<Utc>, CalcError> {
        let local = t.with_timezone(&self.zone).naive_local();
        shift(local.date())
            .and_then(|date| to_instant(self.zone, date.and_time(local.time())))
            .map(|shifted| shifted.trunc_subsecs(RESULT_SUBSEC_DIGITS))
            .ok_or(CalcError::OutOfRange)
    }
}
