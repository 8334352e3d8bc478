use autoplan_core::Store;
use clap::Subcommand;

use super::{hm, parse_instant, ymd_hm, CmdResult};

#[derive(Subcommand)]
pub enum EventAction {
    /// Add a busy event
    Add {
        #[arg(long)]
        title: String,
        /// RFC 3339 or local "YYYY-MM-DD HH:MM"
        #[arg(long, value_parser = parse_instant)]
        start: chrono::DateTime<chrono::Utc>,
        /// RFC 3339 or local "YYYY-MM-DD HH:MM"
        #[arg(long, value_parser = parse_instant)]
        end: chrono::DateTime<chrono::Utc>,
    },
    /// List busy events
    List {
        #[arg(long)]
        json: bool,
    },
    /// Delete a busy event
    Delete {
        /// Event ID
        id: String,
    },
}

pub fn run(action: EventAction) -> CmdResult {
    let store = Store::open_default()?;

    match action {
        EventAction::Add { title, start, end } => {
            let event = store.add_event(title, start, end)?;
            println!("Event created: {}", event.id);
        }
        EventAction::List { json } => {
            let events = store.list_events();
            if json {
                println!("{}", serde_json::to_string_pretty(&events)?);
            } else {
                for event in &events {
                    println!("{}  {}-{}  {}", event.id, ymd_hm(event.start), hm(event.end), event.title);
                }
            }
        }
        EventAction::Delete { id } => {
            store.delete_event(&id)?;
            println!("Event deleted: {id}");
        }
    }
    Ok(())
}
