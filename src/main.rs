//! Working-time calculator command-line tool.
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

use std::error::Error;

use chrono::SecondsFormat;
use clap::Parser;
use cli::{Cli, Command, format_duration};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};
use workcal::{WorkingTimeCalculator, easter_sunday};

mod cli;

/// Default log filter when `RUST_LOG` is unset
const DEFAULT_LOG_FILTER: &str = "workcal=warn";

/// Main entry point for the working-time calculator
///
/// # Usage Examples
/// ```bash
/// # Due date 8 working hours after a planned instant
/// workcal -c config.toml add 20241223100000 8h
///
/// # Working time between two instants
/// workcal -c config.toml between 2024-12-20T15:00:00Z 2024-12-23T09:00:00Z
///
/// # Check if today is a working day
/// workcal -c config.toml is-working-day
/// ```
///
/// Exit code 0 for a true or computed answer, 1 for a false answer and 2
/// on error, for scripting use.
fn main() {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| DEFAULT_LOG_FILTER.into()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    // Parse command-line arguments
    let cli = Cli::parse();

    let outcome = run(&cli);
    if let Err(e) = &outcome {
        eprintln!("error: {e}");
    }
    std::process::exit(exit_code(&outcome));
}

/// Maps an answer to the process exit code
fn exit_code(outcome: &Result<bool, Box<dyn Error>>) -> i32 {
    match outcome {
        Ok(true) => 0,
        Ok(false) => 1,
        Err(_) => 2,
    }
}

/// Answers the requested question on stdout
fn run(cli: &Cli) -> Result<bool, Box<dyn Error>> {
    let conf = cli.conf();
    let calculator = conf.build()?;
    let zone = calculator.zone();
    let show = |t: chrono::DateTime<chrono::Utc>| {
        t.with_timezone(&zone).to_rfc3339_opts(SecondsFormat::Millis, true)
    };

    match cli.command() {
        Command::Add { timestamp, duration } => {
            let result = calculator.add_working_time(timestamp.resolve(zone)?, *duration)?;
            println!("{}", show(result));
            Ok(true)
        }
        Command::Subtract { timestamp, duration } => {
            let result = calculator.subtract_working_time(timestamp.resolve(zone)?, *duration)?;
            println!("{}", show(result));
            Ok(true)
        }
        Command::Between { from, to } => {
            let elapsed = calculator.working_time_between(from.resolve(zone)?, to.resolve(zone)?)?;
            println!("{}", format_duration(elapsed));
            Ok(true)
        }
        Command::HasWork { a, b } => {
            let answer = calculator.is_working_time_between(a.resolve(zone)?, b.resolve(zone)?);
            println!("{answer}");
            Ok(answer)
        }
        Command::IsWorkingDay { timestamp } => Ok(is_working_day(&calculator, timestamp.resolve(zone)?)),
        Command::Easter { year } => {
            let easter = easter_sunday(*year).ok_or_else(|| format!("year {year} is out of range"))?;
            println!("Easter Sunday\t{easter}");
            for holiday in calculator.calendar().moving_holidays() {
                if let Some(date) = holiday.date_in(*year) {
                    println!("{}\t{date}", holiday.name());
                }
            }
            Ok(true)
        }
    }
}

/// Prints whether `t` falls on a working day, naming the holiday if any
fn is_working_day(calculator: &WorkingTimeCalculator, t: chrono::DateTime<chrono::Utc>) -> bool {
    let answer = calculator.is_working_day(t);
    println!("{answer}");
    if !answer {
        let date = t.with_timezone(&calculator.zone()).date_naive();
        match calculator.calendar().holiday_on(date) {
            Some(holiday) => tracing::info!(%date, %holiday, "holiday"),
            None => tracing::info!(%date, "weekend"),
        }
    }
    answer
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn answers_and_errors_map_to_distinct_exit_codes() {
        assert_eq!(exit_code(&Ok(true)), 0);
        assert_eq!(exit_code(&Ok(false)), 1);
        assert_eq!(exit_code(&Err("no such zone".into())), 2);
    }
}
