use chrono::{Datelike, NaiveDate};
use clap::{Args, Subcommand};
use quitbuddy_core::mission::ids;
use quitbuddy_core::{parse_date, DayLog, DayLogPatch, DayStatus};

use super::{open_onboarded, print_json, CliResult};

#[derive(Args)]
pub struct CheckinArgs {
    /// smoke-free, slip or relapse
    #[arg(default_value = "smoke-free")]
    status: String,
    /// Mood from 1 (awful) to 5 (great)
    #[arg(long, default_value_t = 3, value_parser = clap::value_parser!(u8).range(1..=5))]
    mood: u8,
}

#[derive(Subcommand)]
pub enum LogAction {
    /// Write a log for any date, replacing an existing one
    Add {
        /// yyyy-MM-dd
        date: String,
        /// smoke-free, slip, relapse, pre-quit or future
        status: String,
        #[arg(long, value_parser = clap::value_parser!(u8).range(1..=5))]
        mood: Option<u8>,
        /// Trigger (repeatable)
        #[arg(long = "trigger")]
        triggers: Vec<String>,
        #[arg(long)]
        notes: Option<String>,
        #[arg(long)]
        cravings: Option<u32>,
    },
    /// Change some fields of an existing log
    Edit {
        /// yyyy-MM-dd
        date: String,
        #[arg(long)]
        status: Option<String>,
        #[arg(long, value_parser = clap::value_parser!(u8).range(1..=5))]
        mood: Option<u8>,
        #[arg(long = "trigger")]
        triggers: Option<Vec<String>>,
        #[arg(long)]
        notes: Option<String>,
        #[arg(long)]
        cravings: Option<u32>,
    },
    /// List all logs as JSON
    List,
    /// Day-by-day status for a month
    Calendar {
        /// yyyy-MM; defaults to this month
        month: Option<String>,
    },
}

/// Today's check-in also completes the check-in mission.
pub fn checkin(args: CheckinArgs) -> CliResult {
    let mut app = open_onboarded()?;
    let status: DayStatus = args.status.parse()?;
    let event = app.check_in(status, Some(args.mood))?;
    print_json(&event)?;
    if let Some(event) = app.complete_mission(ids::CHECK_IN)? {
        print_json(&event)?;
    }
    Ok(())
}

pub fn run(action: LogAction) -> CliResult {
    let mut app = open_onboarded()?;

    match action {
        LogAction::Add {
            date,
            status,
            mood,
            triggers,
            notes,
            cravings,
        } => {
            let mut log = DayLog::new(parse_date(&date)?, status.parse()?);
            log.mood = mood;
            log.triggers = (!triggers.is_empty()).then_some(triggers);
            log.notes = notes;
            log.cravings_count = cravings;
            print_json(&app.add_day_log(log)?)?;
        }
        LogAction::Edit {
            date,
            status,
            mood,
            triggers,
            notes,
            cravings,
        } => {
            let patch = DayLogPatch {
                status: status.map(|s| s.parse::<DayStatus>()).transpose()?,
                mood,
                triggers,
                notes,
                cravings_count: cravings,
            };
            if patch.is_empty() {
                return Err("nothing to change".into());
            }
            match app.update_day_log(parse_date(&date)?, patch)? {
                Some(event) => print_json(&event)?,
                None => return Err(format!("no log for {date}").into()),
            }
        }
        LogAction::List => {
            print_json(app.day_logs())?;
        }
        LogAction::Calendar { month } => {
            let first = match month {
                Some(month) => parse_date(&format!("{month}-01"))?,
                None => app.today().with_day(1).unwrap_or_else(|| app.today()),
            };
            for date in days_of_month(first) {
                let status = app.day_status(date);
                let mood = app
                    .day_log(date)
                    .and_then(|l| l.mood)
                    .map(|m| format!("  mood {m}"))
                    .unwrap_or_default();
                println!("{date}  {:<10}{mood}", status.label());
            }
        }
    }
    Ok(())
}

fn days_of_month(first: NaiveDate) -> impl Iterator<Item = NaiveDate> {
    first
        .iter_days()
        .take_while(move |d| d.month() == first.month())
}
