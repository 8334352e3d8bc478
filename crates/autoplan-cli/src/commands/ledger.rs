use autoplan_core::{LedgerEntry, Store};
use clap::Args;

use super::{hm, ymd_hm, CmdResult};

#[derive(Args)]
pub struct LedgerArgs {
    /// Only show this task
    task_id: Option<String>,
    /// Print as JSON
    #[arg(long)]
    json: bool,
}

pub fn run(args: LedgerArgs) -> CmdResult {
    let store = Store::open_default()?;

    let entries: Vec<LedgerEntry> = match &args.task_id {
        Some(id) => store
            .ledger_entry(id)
            .map(|e| vec![e])
            .ok_or_else(|| format!("no ledger entry for {id}"))?,
        None => store.ledger().entries().cloned().collect(),
    };

    if args.json {
        println!("{}", serde_json::to_string_pretty(&entries)?);
        return Ok(());
    }

    for entry in &entries {
        println!(
            "{}  {}-{}  {}m in {} segment(s)",
            entry.item_id,
            ymd_hm(entry.scheduled_start),
            ymd_hm(entry.scheduled_end),
            entry.total_minutes(),
            entry.allocations.len()
        );
        for a in &entry.allocations {
            println!("    {}-{}", ymd_hm(a.start), hm(a.end));
        }
    }
    Ok(())
}
