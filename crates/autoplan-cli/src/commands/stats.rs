use autoplan_core::Store;
use chrono::{Local, NaiveDate};
use clap::Subcommand;

use super::CmdResult;

#[derive(Subcommand)]
pub enum StatsAction {
    /// Planned and completed minutes per day for one week
    Week {
        /// Any day of the week (YYYY-MM-DD), defaults to today
        #[arg(long)]
        date: Option<NaiveDate>,
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
}

pub fn run(action: StatsAction) -> CmdResult {
    let store = Store::open_default()?;

    match action {
        StatsAction::Week { date, json } => {
            let day = date.unwrap_or_else(|| Local::now().date_naive());
            let stats = store.weekly_stats(day, &Local);
            if json {
                println!("{}", serde_json::to_string_pretty(&stats)?);
                return Ok(());
            }

            println!("Week of {}", stats.week_start);
            for totals in &stats.days {
                println!(
                    "  {}  planned {:>4}m  done {:>4}m",
                    totals.date.format("%a %m-%d"),
                    totals.planned_minutes,
                    totals.completed_minutes
                );
            }
            println!(
                "Total: {}m planned, {}m done ({:.0}%), {} of {} items done",
                stats.planned_minutes,
                stats.completed_minutes,
                stats.completion_rate * 100.0,
                stats.items_completed,
                stats.items_planned
            );
        }
    }
    Ok(())
}
