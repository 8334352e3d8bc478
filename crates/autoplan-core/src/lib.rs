//! # Autoplan Core Library
//!
//! This library provides the core logic for Autoplan, a personal planner that
//! places unscheduled work items into the free gaps of a day. All operations are
//! available through the standalone `autoplan` CLI, which is a thin layer over
//! this crate.
//!
//! ## Architecture
//!
//! - **Planner**: Pure placement engine. Resolves the work interval, subtracts
//!   busy time, orders candidates and allocates them greedily with splitting
//! - **Ledger**: Per-item history of placed segments and the bounding
//!   scheduled range derived from them
//! - **Storage**: JSON-file task store (single writer) and TOML configuration
//! - **Task**: Stored work items, quick-add capture and keyword search
//! - **Stats**: Weekly totals of planned and completed time from the ledger
//!
//! ## Key Components
//!
//! - [`AutoPlanner`]: Runs the planning pipeline for one day
//! - [`AllocationLedger`]: Accumulates allocations across runs
//! - [`Store`]: Serialized owner of tasks, busy events and the ledger
//! - [`Config`]: Application configuration management

pub mod error;
pub mod ledger;
pub mod planner;
pub mod stats;
pub mod storage;
pub mod task;

pub use error::{ConfigError, CoreError, StoreError, ValidationError};
pub use ledger::{AllocationLedger, LedgerEntry};
pub use planner::{
    Allocation, AutoPlanner, BusyInterval, FreeSlot, PlanResult, PlannerConfig, Priority,
    SchedulableItem, ScheduledRange, Unscheduled, WorkHoursConfig, WorkInterval,
};
pub use stats::{DayTotals, WeeklyStats};
pub use storage::{BusyEvent, Config, Store};
pub use task::search::SearchHit;
pub use task::{NewTask, Task, TaskStatus};
