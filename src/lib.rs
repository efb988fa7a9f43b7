//! Working-time calculation over weekly work schedules and holiday calendars.
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

use chrono::{DateTime, NaiveDateTime, Utc};
use chrono_tz::Tz;

pub mod calculator;
pub mod conf;
pub mod error;
pub mod holiday;
pub mod ical;
pub mod schedule;
pub mod slot;

pub use calculator::{Granularity, WorkingTimeCalculator};
pub use conf::Conf;
pub use error::{CalcError, ConfigError};
pub use holiday::{FixedHoliday, Holiday, HolidayCalendar, MovingHoliday, easter_sunday};
pub use schedule::{IntervalEnd, WeeklySchedule, WorkInterval};
pub use slot::{WorkSlot, WorkSlotResolver};

/// Maps a wall-clock time in `zone` to an instant, using the same rules as
/// work slots: ambiguous times take the earlier instant, skipped times land
/// after the gap. Returns `None` outside the representable range.
pub fn local_to_instant(zone: Tz, local: NaiveDateTime) -> Option<DateTime<Utc>> {
    slot::to_instant(zone, local)
}
