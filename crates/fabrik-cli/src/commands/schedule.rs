//! Schedule generation commands

use crate::error::CliResult;
use crate::output::{self, OutputFormat};
use clap::Subcommand;
use fabrik_fleet::{CronSchedule, ScheduleGenerator, WeeklyConstraints};
use serde::Serialize;

/// Schedule subcommands
#[derive(Subcommand)]
pub enum ScheduleCommands {
    /// Run once every N days, at a random time of day
    Days {
        /// Days between runs (1-28)
        days: u32,
    },

    /// Run every N hours, at a random minute
    Hours {
        /// Hours between runs (1-28)
        hours: u32,
    },

    /// Run on selected weekdays, at a random time of day
    Weekly {
        /// First weekday allowed (0 = Sunday)
        #[arg(long)]
        after: Option<u32>,

        /// Weekday bound, exclusive (7 = end of week)
        #[arg(long)]
        before: Option<u32>,

        /// Days between runs
        #[arg(long)]
        every: Option<u32>,
    },

    /// Schedule from a descriptor such as `daily` or `8 hours`
    Interval {
        /// Interval descriptor
        interval: String,

        /// Keep the first run at least this many minutes out
        #[arg(long)]
        after_minutes: Option<u32>,
    },
}

#[derive(Debug, Serialize)]
struct ScheduleView {
    schedule: CronSchedule,
    fields: Vec<String>,
}

impl From<CronSchedule> for ScheduleView {
    fn from(schedule: CronSchedule) -> Self {
        let fields = schedule.fields().into_iter().map(str::to_string).collect();
        Self { schedule, fields }
    }
}

/// Execute a schedule command
pub fn execute(command: ScheduleCommands, format: OutputFormat) -> CliResult<()> {
    let generator = ScheduleGenerator::new();

    let schedule = match command {
        ScheduleCommands::Days { days } => generator.once_every_n_days(days)?,
        ScheduleCommands::Hours { hours } => generator.every_n_hours(hours)?,
        ScheduleCommands::Weekly {
            after,
            before,
            every,
        } => {
            let mut constraints = WeeklyConstraints::new();
            if let Some(after) = after {
                constraints = constraints.after(after);
            }
            if let Some(before) = before {
                constraints = constraints.before(before);
            }
            if let Some(every) = every {
                constraints = constraints.every(every);
            }
            generator.weekly(&constraints)?
        }
        ScheduleCommands::Interval {
            interval,
            after_minutes,
        } => generator.with_interval(&interval, after_minutes)?,
    };

    match format {
        OutputFormat::Table => {
            println!("{}", schedule);
            Ok(())
        }
        _ => output::print_single(&ScheduleView::from(schedule), format),
    }
}
