use std::{fs, path::Path};

use chrono::{TimeDelta, TimeZone, Utc};
use workcal::{Conf, ConfigError, Granularity, Holiday};

const HOLIDAYS_ICS: &str = "BEGIN:VCALENDAR\r
VERSION:2.0\r
PRODID:-//workcal//test//EN\r
BEGIN:VEVENT\r
UID:company-day\r
SUMMARY:Company day\r
DTSTART;VALUE=DATE:20240614\r
DTEND;VALUE=DATE:20240615\r
END:VEVENT\r
END:VCALENDAR\r
";

fn write(dir: &Path, name: &str, content: &str) -> std::path::PathBuf {
    let path = dir.join(name);
    fs::write(&path, content).unwrap();
    path
}

#[test]
fn configuration_file_with_relative_holiday_source() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "company.ics", HOLIDAYS_ICS);
    let conf_path = write(
        dir.path(),
        "workcal.toml",
        r#"
        timezone = "UTC"

        [holidays]
        regional = false
        custom = ["01.01"]
        sources = ["company.ics"]

        [schedule]
        monday = [["08:00", "16:00"]]
        tuesday = [["08:00", "16:00"]]
        wednesday = [["08:00", "16:00"]]
        thursday = [["08:00", "16:00"]]
        friday = [["08:00", "16:00"]]
        "#,
    );

    let conf = Conf::load(&conf_path).unwrap();
    let calc = conf.build().unwrap();
    assert_eq!(calc.granularity(), Granularity::WorkSlots);

    let thursday = Utc.with_ymd_and_hms(2024, 6, 13, 15, 0, 0).unwrap();
    let company_day = Utc.with_ymd_and_hms(2024, 6, 14, 10, 0, 0).unwrap();
    assert!(!calc.is_working_day(company_day));
    assert!(matches!(
        calc.calendar().holiday_on(company_day.date_naive()),
        Some(Holiday::Custom(_))
    ));
    // Thursday 15:00 + 2h: 1h Thursday, Friday is the company day, 1h Monday
    assert_eq!(
        calc.add_working_time(thursday, TimeDelta::hours(2)),
        Ok(Utc.with_ymd_and_hms(2024, 6, 17, 9, 0, 0).unwrap())
    );
}

#[test]
fn missing_holiday_source_fails_the_build() {
    let dir = tempfile::tempdir().unwrap();
    let conf_path = write(dir.path(), "workcal.toml", "[holidays]\nsources = [\"missing.ics\"]\n");
    let conf = Conf::load(&conf_path).unwrap();
    assert!(matches!(conf.build(), Err(ConfigError::Calendar { .. })));
}

#[test]
fn working_days_granularity_ignores_intraday_schedule() {
    let dir = tempfile::tempdir().unwrap();
    let conf_path = write(
        dir.path(),
        "workcal.toml",
        r#"
        granularity = "working-days"

        [holidays]
        regional = true

        [schedule]
        monday = [["08:00", "12:00"]]
        "#,
    );
    let calc = Conf::load(&conf_path).unwrap().build().unwrap();
    // Thursday before Easter 2024 counts fully, then Tuesday after Easter Monday
    let thursday = Utc.with_ymd_and_hms(2024, 3, 28, 0, 0, 0).unwrap();
    assert_eq!(
        calc.add_working_time(thursday, TimeDelta::days(2)),
        Ok(Utc.with_ymd_and_hms(2024, 4, 3, 0, 0, 0).unwrap())
    );
    assert_eq!(calc.add_working_days(thursday, 1), Ok(Utc.with_ymd_and_hms(2024, 4, 2, 0, 0, 0).unwrap()));
}

#[test]
fn malformed_file_is_a_parse_error() {
    let dir = tempfile::tempdir().unwrap();
    let conf_path = write(dir.path(), "workcal.toml", "timezone = ");
    assert!(matches!(Conf::load(&conf_path), Err(ConfigError::Parse(_))));
}
