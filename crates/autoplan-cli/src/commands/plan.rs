use std::collections::HashMap;

use autoplan_core::{Config, Store};
use chrono::{Local, NaiveDate};
use clap::Args;

use super::{hm, CmdResult};

#[derive(Args)]
pub struct PlanArgs {
    /// Day to plan (YYYY-MM-DD), defaults to today
    #[arg(long)]
    date: Option<NaiveDate>,
    /// Print the plan result as JSON
    #[arg(long)]
    json: bool,
}

pub fn run(args: PlanArgs) -> CmdResult {
    let config = Config::load()?;
    let store = Store::open_default()?;
    let day = args.date.unwrap_or_else(|| Local::now().date_naive());

    let result = store.plan_day(day, &config, &Local)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&result)?);
        return Ok(());
    }

    let titles: HashMap<String, String> = store
        .list_tasks()
        .into_iter()
        .map(|t| (t.id, t.title))
        .collect();
    let title = |id: &str| titles.get(id).map(String::as_str).unwrap_or(id).to_string();

    println!("Plan for {day}");
    if result.allocations.is_empty() {
        println!("  nothing placed");
    }
    for allocation in &result.allocations {
        let cont = if allocation.continuation { " (cont.)" } else { "" };
        println!(
            "  {}-{}  {}{}",
            hm(allocation.start),
            hm(allocation.end),
            title(&allocation.item_id),
            cont
        );
    }

    if !result.unscheduled.is_empty() {
        println!("Unscheduled");
        for u in &result.unscheduled {
            println!("  {}  {}m remaining", title(&u.item.id), u.remaining_minutes);
        }
    }
    Ok(())
}
