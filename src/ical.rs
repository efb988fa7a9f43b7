//! iCalendar reader turning all-day events into recurring holidays.
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
    fs::File,
    io::{BufRead, BufReader},
    path::Path,
};

use chrono::{Datelike, NaiveDate};
use ical::property::Property;

use crate::{error::ConfigError, holiday::FixedHoliday};

/// iCalendar property key for event summary
const KEY_SUMMARY: &str = "SUMMARY";
/// iCalendar property key for event start time
const KEY_DTSTART: &str = "DTSTART";
/// iCalendar property key for event end time
const KEY_DTEND: &str = "DTEND";

/// iCalendar date format of all-day events: YYYYMMDD
const DATE_FMT: &str = "%Y%m%d";
/// Length of an all-day date value
const DATE_LEN: usize = 8;

/// Longest all-day event expanded into holidays; one year covers every
/// (day, month) pair
const MAX_EVENT_DAYS: usize = 366;

/// Reads recurring holidays from a local iCalendar file
///
/// # Errors
/// * `ConfigError::Calendar` if the file cannot be opened or parsed
pub fn read_holidays(path: &Path) -> Result<Vec<FixedHoliday>, ConfigError> {
    let file = File::open(path).map_err(|e| ConfigError::Calendar {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;
    let holidays = parse_calendar(BufReader::new(file), path)?;
    tracing::debug!(path = %path.display(), holidays = holidays.len(), "holiday source read");
    Ok(holidays)
}

/// Parses iCalendar data from a reader
///
/// Every all-day event contributes the (day, month) of each day it covers.
/// Timed events are skipped.
fn parse_calendar<T: BufRead>(reader: T, origin: &Path) -> Result<Vec<FixedHoliday>, ConfigError> {
    let mut holidays = Vec::new();
    for calendar in ical::IcalParser::new(reader) {
        let calendar = calendar.map_err(|e| ConfigError::Calendar {
            path: origin.to_path_buf(),
            reason: format!("{e:?}"),
        })?;

        for event in calendar.events {
            let mut summary = "NO_SUMMARY";
            let mut start = None;
            let mut end = None;
            for prop in &event.properties {
                match prop.name.as_str() {
                    KEY_SUMMARY => {
                        if let Some(value) = &prop.value {
                            summary = value.as_str();
                        }
                    }
                    KEY_DTSTART => start = Some(parse_date(prop)),
                    KEY_DTEND => end = Some(parse_date(prop)),
                    _ => {}
                }
            }

            let Some(Some(start)) = start else {
                tracing::warn!(path = %origin.display(), summary, "skipping event without all-day start");
                continue;
            };
            // DTEND of an all-day event is exclusive; a missing end means one day
            let days = match end {
                Some(Some(end)) if end > start => start
                    .iter_days()
                    .take_while(|d| *d < end)
                    .take(MAX_EVENT_DAYS)
                    .collect(),
                _ => vec![start],
            };
            for day in days {
                holidays.push(FixedHoliday::new(day.day(), day.month())?);
            }
        }
    }
    Ok(holidays)
}

/// Parses an all-day date value; `None` for timed values
fn parse_date(prop: &Property) -> Option<NaiveDate> {
    let value = prop.value.as_deref()?.trim();
    if value.len() != DATE_LEN {
        return None;
    }
    NaiveDate::parse_from_str(value, DATE_FMT).ok()
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;

    const COMPANY: &str = "BEGIN:VCALENDAR\r
VERSION:2.0\r
PRODID:-//workcal//test//EN\r
BEGIN:VEVENT\r
UID:1\r
SUMMARY:Company day\r
DTSTART;VALUE=DATE:20240614\r
DTEND;VALUE=DATE:20240615\r
END:VEVENT\r
BEGIN:VEVENT\r
UID:2\r
SUMMARY:Winter break\r
DTSTART;VALUE=DATE:20241230\r
DTEND;VALUE=DATE:20250102\r
END:VEVENT\r
BEGIN:VEVENT\r
UID:3\r
SUMMARY:Team meeting\r
DTSTART:20240617T090000Z\r
DTEND:20240617T100000Z\r
END:VEVENT\r
BEGIN:VEVENT\r
UID:4\r
SUMMARY:Open day\r
DTSTART;VALUE=DATE:20240920\r
END:VEVENT\r
END:VCALENDAR\r
";

    fn holiday(day: u32, month: u32) -> FixedHoliday {
        FixedHoliday::new(day, month).unwrap()
    }

    #[test]
    fn all_day_events_become_recurring_holidays() {
        let holidays = parse_calendar(Cursor::new(COMPANY), Path::new("company.ics")).unwrap();
        assert_eq!(
            holidays,
            vec![
                holiday(14, 6),
                holiday(30, 12),
                holiday(31, 12),
                holiday(1, 1),
                holiday(20, 9),
            ]
        );
    }

    #[test]
    fn missing_file_is_a_configuration_error() {
        let result = read_holidays(Path::new("/nonexistent/holidays.ics"));
        assert!(matches!(result, Err(ConfigError::Calendar { .. })));
    }
}
