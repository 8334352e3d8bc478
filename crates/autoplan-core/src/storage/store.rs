//! JSON-file store for tasks, busy events and the allocation ledger.
//!
//! The store is the single owner of all mutable state. Every operation takes
//! the store mutex, works on a consistent snapshot and, for mutations, writes
//! the new snapshot to disk before it becomes visible. A failed write leaves
//! both the file and the in-memory state as they were.

use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, PoisonError};

use super::{data_dir, Config};
use crate::error::{CoreError, Result, StoreError, ValidationError};
use crate::ledger::{AllocationLedger, LedgerEntry};
use crate::planner::{AutoPlanner, BusyInterval, PlanResult, SchedulableItem};
use crate::stats::{weekly_stats, WeeklyStats};
use crate::task::capture::parse_quick_add;
use crate::task::search::{search_tasks, SearchHit};
use crate::task::{NewTask, Task};

/// A fixed calendar commitment the planner has to work around.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BusyEvent {
    pub id: String,
    pub title: String,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl BusyEvent {
    pub fn interval(&self) -> BusyInterval {
        BusyInterval::new(self.start, self.end)
    }
}

/// Everything the store persists.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreSnapshot {
    #[serde(default)]
    pub tasks: Vec<Task>,
    #[serde(default)]
    pub events: Vec<BusyEvent>,
    #[serde(default)]
    pub ledger: AllocationLedger,
}

impl StoreSnapshot {
    fn task_mut(&mut self, id: &str) -> Result<&mut Task> {
        self.tasks
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or_else(|| CoreError::from(StoreError::TaskNotFound(id.to_string())))
    }
}

/// Serialized owner of the task collection.
#[derive(Debug)]
pub struct Store {
    path: PathBuf,
    state: Mutex<StoreSnapshot>,
}

impl Store {
    /// Open `<data dir>/store.json`.
    pub fn open_default() -> Result<Self> {
        Self::open(data_dir()?.join("store.json"))
    }

    /// Open the store at `path`. A missing file is an empty store.
    ///
    /// # Errors
    /// Returns [`StoreError::Corrupt`] if the file exists but cannot be decoded.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let state = match std::fs::read(&path) {
            Ok(bytes) => serde_json::from_slice(&bytes).map_err(|source| StoreError::Corrupt {
                path: path.clone(),
                source,
            })?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => StoreSnapshot::default(),
            Err(e) => return Err(e.into()),
        };

        Ok(Self {
            path,
            state: Mutex::new(state),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn lock(&self) -> MutexGuard<'_, StoreSnapshot> {
        // A panic mid-mutation never touches the committed snapshot, so the
        // guarded value is still consistent.
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Run `f` on a copy of the state, persist it, then publish it.
    fn mutate<T>(&self, f: impl FnOnce(&mut StoreSnapshot) -> Result<T>) -> Result<T> {
        let mut guard = self.lock();
        let mut next = guard.clone();
        let out = f(&mut next)?;
        write_atomic(&self.path, &next)?;
        *guard = next;
        Ok(out)
    }

    pub fn snapshot(&self) -> StoreSnapshot {
        self.lock().clone()
    }

    // === Tasks ===

    pub fn add_task(&self, fields: NewTask) -> Result<Task> {
        if fields.title.trim().is_empty() {
            return Err(ValidationError::EmptyTitle.into());
        }
        let task = Task::new(fields);
        self.mutate(|state| {
            state.tasks.push(task.clone());
            Ok(())
        })?;
        tracing::info!(task = %task.id, "task added");
        Ok(task)
    }

    /// Parse a quick-add line and store the result.
    pub fn quick_add(&self, text: &str, config: &Config) -> Result<Task> {
        let fields = parse_quick_add(text, config.capture.default_effort_minutes)?;
        self.add_task(fields)
    }

    pub fn list_tasks(&self) -> Vec<Task> {
        self.lock().tasks.clone()
    }

    pub fn get_task(&self, id: &str) -> Result<Task> {
        self.lock()
            .tasks
            .iter()
            .find(|t| t.id == id)
            .cloned()
            .ok_or_else(|| CoreError::from(StoreError::TaskNotFound(id.to_string())))
    }

    pub fn complete_task(&self, id: &str) -> Result<Task> {
        self.mutate(|state| {
            let task = state.task_mut(id)?;
            task.complete();
            Ok(task.clone())
        })
    }

    pub fn reopen_task(&self, id: &str) -> Result<Task> {
        self.mutate(|state| {
            let task = state.task_mut(id)?;
            task.reopen();
            Ok(task.clone())
        })
    }

    /// Drop the task's scheduled range so it becomes a planning candidate again.
    /// Its ledger history is kept.
    pub fn clear_schedule(&self, id: &str) -> Result<Task> {
        self.mutate(|state| {
            let task = state.task_mut(id)?;
            task.set_scheduled(None);
            Ok(task.clone())
        })
    }

    pub fn delete_task(&self, id: &str) -> Result<Task> {
        self.mutate(|state| {
            let index = state
                .tasks
                .iter()
                .position(|t| t.id == id)
                .ok_or_else(|| StoreError::TaskNotFound(id.to_string()))?;
            Ok(state.tasks.remove(index))
        })
    }

    /// Keyword search over titles and tags, best match first.
    pub fn search(&self, query: &str) -> Vec<SearchHit> {
        search_tasks(&self.lock().tasks, query)
    }

    /// Tasks that are not done, not yet scheduled and have positive effort.
    pub fn candidates(&self) -> Vec<SchedulableItem> {
        candidates_of(&self.lock())
    }

    // === Busy events ===

    pub fn add_event(
        &self,
        title: impl Into<String>,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<BusyEvent> {
        if end <= start {
            return Err(ValidationError::InvalidTimeRange { start, end }.into());
        }
        let event = BusyEvent {
            id: format!("event-{}", uuid::Uuid::new_v4()),
            title: title.into(),
            start,
            end,
        };
        self.mutate(|state| {
            state.events.push(event.clone());
            Ok(())
        })?;
        Ok(event)
    }

    pub fn list_events(&self) -> Vec<BusyEvent> {
        let mut events = self.lock().events.clone();
        events.sort_by_key(|e| e.start);
        events
    }

    pub fn delete_event(&self, id: &str) -> Result<BusyEvent> {
        self.mutate(|state| {
            let index = state
                .events
                .iter()
                .position(|e| e.id == id)
                .ok_or_else(|| StoreError::EventNotFound(id.to_string()))?;
            Ok(state.events.remove(index))
        })
    }

    // === Planning ===

    /// Plan `day` for every current candidate and commit the result.
    ///
    /// Working hours are read as wall-clock time in `tz`. The run's allocations
    /// are appended to the ledger and each touched task's scheduled range is
    /// replaced by its ledger bounding range, all in one commit.
    pub fn plan_day<Tz: TimeZone>(&self, day: NaiveDate, config: &Config, tz: &Tz) -> Result<PlanResult> {
        let hours = config.work_hours()?;
        let planner = AutoPlanner::with_config(config.planner());

        self.mutate(|state| {
            let items = candidates_of(state);
            let busy: Vec<BusyInterval> = state.events.iter().map(BusyEvent::interval).collect();

            let result = planner.plan_in(day, &hours, &items, &busy, tz);

            let ranges = state.ledger.record(&result.allocations);
            for task in state.tasks.iter_mut() {
                if let Some(range) = ranges.get(&task.id) {
                    task.set_scheduled(Some(*range));
                }
            }

            tracing::info!(
                %day,
                candidates = items.len(),
                allocations = result.allocations.len(),
                unscheduled = result.unscheduled.len(),
                "plan committed"
            );
            Ok(result)
        })
    }

    pub fn ledger(&self) -> AllocationLedger {
        self.lock().ledger.clone()
    }

    pub fn ledger_entry(&self, item_id: &str) -> Option<LedgerEntry> {
        self.lock().ledger.get(item_id).cloned()
    }

    /// Planned and completed totals for the week containing `day`.
    pub fn weekly_stats<Tz: TimeZone>(&self, day: NaiveDate, tz: &Tz) -> WeeklyStats {
        let state = self.lock();
        weekly_stats(&state.ledger, &state.tasks, day, tz)
    }
}

fn candidates_of(state: &StoreSnapshot) -> Vec<SchedulableItem> {
    state
        .tasks
        .iter()
        .filter(|t| t.is_plan_candidate())
        .map(Task::to_schedulable)
        .collect()
}

fn write_atomic(path: &Path, state: &StoreSnapshot) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    let tmp = path.with_extension("json.tmp");
    std::fs::write(&tmp, serde_json::to_vec_pretty(state)?)?;
    std::fs::rename(&tmp, path)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::planner::Priority;
    use std::sync::Arc;

    fn monday() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 19).unwrap()
    }

    fn at(h: u32, m: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 10, 19, h, m, 0).unwrap()
    }

    fn temp_store() -> (tempfile::TempDir, Store) {
        let dir = tempfile::tempdir().unwrap();
        let store = Store::open(dir.path().join("store.json")).unwrap();
        (dir, store)
    }

    #[test]
    fn missing_file_is_empty_store() {
        let (_dir, store) = temp_store();
        assert!(store.list_tasks().is_empty());
        assert!(store.ledger().is_empty());
    }

    #[test]
    fn corrupt_file_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("store.json");
        std::fs::write(&path, "{ not json").unwrap();
        assert!(matches!(
            Store::open(&path),
            Err(CoreError::Store(StoreError::Corrupt { .. }))
        ));
    }

    #[test]
    fn tasks_persist_across_open() {
        let (dir, store) = temp_store();
        let task = store.add_task(NewTask::new("Write report", 45)).unwrap();
        store.complete_task(&task.id).unwrap();

        let reopened = Store::open(dir.path().join("store.json")).unwrap();
        let loaded = reopened.get_task(&task.id).unwrap();
        assert!(loaded.is_done());
        assert_eq!(loaded.effort_minutes, 45);
    }

    #[test]
    fn unknown_ids_are_errors() {
        let (_dir, store) = temp_store();
        assert!(matches!(
            store.complete_task("nope"),
            Err(CoreError::Store(StoreError::TaskNotFound(_)))
        ));
        assert!(store.delete_event("nope").is_err());
    }

    #[test]
    fn empty_title_and_bad_event_are_rejected() {
        let (_dir, store) = temp_store();
        assert!(store.add_task(NewTask::new("  ", 30)).is_err());
        assert!(store.add_event("Standup", at(10, 0), at(10, 0)).is_err());
        assert!(store.list_tasks().is_empty());
        assert!(store.list_events().is_empty());
    }

    #[test]
    fn quick_add_uses_config_default_effort() {
        let (_dir, store) = temp_store();
        let mut config = Config::default();
        config.capture.default_effort_minutes = 40;

        let task = store.quick_add("Call the bank !low", &config).unwrap();
        assert_eq!(task.effort_minutes, 40);
        assert_eq!(task.priority, Priority::Low);
    }

    #[test]
    fn plan_day_commits_ranges_and_ledger() {
        let (dir, store) = temp_store();
        let big = store.add_task(NewTask::new("Deep work", 240)).unwrap();
        let small = store.add_task(NewTask::new("Email", 30)).unwrap();
        store.add_event("Lunch", at(12, 0), at(13, 0)).unwrap();

        let result = store.plan_day(monday(), &Config::default(), &Utc).unwrap();
        assert!(result.unscheduled.is_empty());
        assert_eq!(result.placed_minutes(&big.id), 240);

        let big = store.get_task(&big.id).unwrap();
        let range = big.scheduled.unwrap();
        // 09:00-12:00 then 13:00-14:00
        assert_eq!(range.start, at(9, 0));
        assert_eq!(range.end, at(14, 0));
        assert_eq!(store.ledger_entry(&big.id).unwrap().allocations.len(), 2);

        let small = store.get_task(&small.id).unwrap();
        assert_eq!(small.scheduled.unwrap().start, at(14, 0));

        // Persisted
        let reopened = Store::open(dir.path().join("store.json")).unwrap();
        assert_eq!(reopened.ledger(), store.ledger());
        assert!(reopened.candidates().is_empty());
    }

    #[test]
    fn scheduled_and_done_tasks_are_not_replanned() {
        let (_dir, store) = temp_store();
        let a = store.add_task(NewTask::new("a", 30)).unwrap();
        let done = store.add_task(NewTask::new("done", 30)).unwrap();
        store.complete_task(&done.id).unwrap();

        store.plan_day(monday(), &Config::default(), &Utc).unwrap();
        let second = store.plan_day(monday(), &Config::default(), &Utc).unwrap();
        assert!(second.allocations.is_empty());
        assert_eq!(store.ledger_entry(&a.id).unwrap().allocations.len(), 1);
        assert!(store.ledger_entry(&done.id).is_none());
    }

    #[test]
    fn clearing_schedule_replans_and_appends() {
        let (_dir, store) = temp_store();
        let a = store.add_task(NewTask::new("a", 30)).unwrap();
        let tuesday = NaiveDate::from_ymd_opt(2026, 10, 20).unwrap();

        store.plan_day(monday(), &Config::default(), &Utc).unwrap();
        store.clear_schedule(&a.id).unwrap();
        store.plan_day(tuesday, &Config::default(), &Utc).unwrap();

        let entry = store.ledger_entry(&a.id).unwrap();
        assert_eq!(entry.allocations.len(), 2);
        let range = store.get_task(&a.id).unwrap().scheduled.unwrap();
        assert_eq!(range.start, at(9, 0));
        assert_eq!(range.end, Utc.with_ymd_and_hms(2026, 10, 20, 9, 30, 0).unwrap());
    }

    #[test]
    fn partially_placed_task_gets_range_and_is_reported() {
        let (_dir, store) = temp_store();
        let a = store.add_task(NewTask::new("huge", 600)).unwrap();

        let result = store.plan_day(monday(), &Config::default(), &Utc).unwrap();
        assert_eq!(result.unscheduled.len(), 1);
        assert_eq!(result.unscheduled[0].remaining_minutes, 120);
        assert!(store.get_task(&a.id).unwrap().scheduled.is_some());
    }

    #[test]
    fn search_finds_captured_tasks() {
        let (_dir, store) = temp_store();
        let config = Config::default();
        store.quick_add("Draft budget ~1h #finance", &config).unwrap();
        store.quick_add("Budget review with team", &config).unwrap();
        store.quick_add("Walk the dog", &config).unwrap();

        let hits = store.search("budget");
        assert_eq!(hits.len(), 2);
        assert!(hits.iter().all(|h| h.task.title.contains("udget")));
        assert_eq!(store.search("#finance")[0].task.title, "Draft budget");
        assert!(store.search("taxes").is_empty());
    }

    #[test]
    fn weekly_stats_follow_plan_and_completion() {
        let (_dir, store) = temp_store();
        let a = store.add_task(NewTask::new("a", 60)).unwrap();
        store.add_task(NewTask::new("b", 30)).unwrap();

        store.plan_day(monday(), &Config::default(), &Utc).unwrap();
        store.complete_task(&a.id).unwrap();

        let friday = NaiveDate::from_ymd_opt(2026, 10, 23).unwrap();
        let stats = store.weekly_stats(friday, &Utc);
        assert_eq!(stats.week_start, monday());
        assert_eq!(stats.days[0].planned_minutes, 90);
        assert_eq!(stats.completed_minutes, 60);
        assert_eq!(stats.items_planned, 2);
        assert_eq!(stats.items_completed, 1);
    }

    #[test]
    fn concurrent_mutations_are_serialized() {
        let (_dir, store) = temp_store();
        let store = Arc::new(store);

        let handles: Vec<_> = (0..8)
            .map(|i| {
                let store = Arc::clone(&store);
                std::thread::spawn(move || {
                    for j in 0..5 {
                        store.add_task(NewTask::new(format!("t{i}-{j}"), 15)).unwrap();
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(store.list_tasks().len(), 40);
        let reopened = Store::open(store.path()).unwrap();
        assert_eq!(reopened.list_tasks().len(), 40);
    }
}
