//! Task management commands for CLI.

use autoplan_core::{Config, Store, Task};
use clap::Subcommand;

use super::{hm, ymd_hm, CmdResult};

#[derive(Subcommand)]
pub enum TaskAction {
    /// Quick-add a task, e.g. `Draft budget ~1h30m !high due:2026-10-21 #finance`
    Add {
        /// Task text with optional ~effort, !priority, due:DATE and #tag tokens
        #[arg(required = true, num_args = 1..)]
        text: Vec<String>,
        /// Print the created task as JSON
        #[arg(long)]
        json: bool,
    },
    /// List tasks
    List {
        /// Include completed tasks
        #[arg(long)]
        all: bool,
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
    /// Search tasks by title words and tags, e.g. `budget #finance`
    Search {
        /// Search terms; `#tag` only matches tags
        #[arg(required = true, num_args = 1..)]
        query: Vec<String>,
        /// Print hits as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show a task
    Show {
        /// Task ID
        id: String,
    },
    /// Mark a task as done
    Done {
        /// Task ID
        id: String,
    },
    /// Mark a done task as todo again
    Reopen {
        /// Task ID
        id: String,
    },
    /// Clear the scheduled range so the task is planned again
    Unschedule {
        /// Task ID
        id: String,
    },
    /// Delete a task
    Delete {
        /// Task ID
        id: String,
    },
}

fn summary(task: &Task) -> String {
    let mark = if task.is_done() { "x" } else { " " };
    let mut line = format!(
        "[{mark}] {}  {}  {}m  {}",
        task.id, task.title, task.effort_minutes, task.priority
    );
    if let Some(due) = task.due {
        line.push_str(&format!("  due {}", ymd_hm(due)));
    }
    if let Some(range) = task.scheduled {
        line.push_str(&format!("  scheduled {}-{}", ymd_hm(range.start), hm(range.end)));
    }
    line
}

pub fn run(action: TaskAction) -> CmdResult {
    let store = Store::open_default()?;

    match action {
        TaskAction::Add { text, json } => {
            let config = Config::load()?;
            let task = store.quick_add(&text.join(" "), &config)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&task)?);
            } else {
                println!("Task created: {}", task.id);
                println!("{}", summary(&task));
            }
        }
        TaskAction::List { all, json } => {
            let tasks: Vec<Task> = store
                .list_tasks()
                .into_iter()
                .filter(|t| all || !t.is_done())
                .collect();
            if json {
                println!("{}", serde_json::to_string_pretty(&tasks)?);
            } else if tasks.is_empty() {
                println!("No tasks.");
            } else {
                for task in &tasks {
                    println!("{}", summary(task));
                }
            }
        }
        TaskAction::Search { query, json } => {
            let hits = store.search(&query.join(" "));
            if json {
                println!("{}", serde_json::to_string_pretty(&hits)?);
            } else if hits.is_empty() {
                println!("No matching tasks.");
            } else {
                for hit in &hits {
                    println!("{}", summary(&hit.task));
                }
            }
        }
        TaskAction::Show { id } => {
            let task = store.get_task(&id)?;
            println!("{}", serde_json::to_string_pretty(&task)?);
        }
        TaskAction::Done { id } => {
            let task = store.complete_task(&id)?;
            println!("Task done: {}", task.id);
        }
        TaskAction::Reopen { id } => {
            let task = store.reopen_task(&id)?;
            println!("Task reopened: {}", task.id);
        }
        TaskAction::Unschedule { id } => {
            let task = store.clear_schedule(&id)?;
            println!("Task unscheduled: {}", task.id);
        }
        TaskAction::Delete { id } => {
            store.delete_task(&id)?;
            println!("Task deleted: {id}");
        }
    }
    Ok(())
}
