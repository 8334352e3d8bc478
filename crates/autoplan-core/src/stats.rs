//! Weekly aggregation of planned time.
//!
//! Totals come from the allocation ledger. Each segment counts towards the
//! local calendar day its start falls on. Planned minutes are "completed" when
//! the segment's task is done at the time of the report.

use chrono::{Datelike, Duration, NaiveDate, TimeZone};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashSet};

use crate::ledger::AllocationLedger;
use crate::task::Task;

/// Totals for one calendar day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayTotals {
    pub date: NaiveDate,
    pub planned_minutes: i64,
    pub completed_minutes: i64,
}

/// Totals for one Monday-based week.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeeklyStats {
    pub week_start: NaiveDate,
    /// Monday through Sunday
    pub days: Vec<DayTotals>,
    pub planned_minutes: i64,
    pub completed_minutes: i64,
    /// Distinct items with at least one segment this week
    pub items_planned: usize,
    pub items_completed: usize,
    /// completed / planned minutes, 0.0 for an empty week
    pub completion_rate: f64,
}

/// Monday of the week containing `day`.
pub fn week_start(day: NaiveDate) -> NaiveDate {
    day - Duration::days(i64::from(day.weekday().num_days_from_monday()))
}

/// Aggregate the week containing `day`, reading dates in `tz`.
pub fn weekly_stats<Tz: TimeZone>(
    ledger: &AllocationLedger,
    tasks: &[Task],
    day: NaiveDate,
    tz: &Tz,
) -> WeeklyStats {
    let monday = week_start(day);
    let done: HashSet<&str> = tasks
        .iter()
        .filter(|t| t.is_done())
        .map(|t| t.id.as_str())
        .collect();

    let mut days: Vec<DayTotals> = (0..7)
        .map(|offset| DayTotals {
            date: monday + Duration::days(offset),
            planned_minutes: 0,
            completed_minutes: 0,
        })
        .collect();
    let mut planned_items = BTreeSet::new();

    for entry in ledger.entries() {
        for allocation in &entry.allocations {
            let date = allocation.start.with_timezone(tz).date_naive();
            let Ok(index) = usize::try_from((date - monday).num_days()) else {
                continue;
            };
            let Some(totals) = days.get_mut(index) else {
                continue;
            };

            let minutes = allocation.duration_minutes();
            totals.planned_minutes += minutes;
            if done.contains(entry.item_id.as_str()) {
                totals.completed_minutes += minutes;
            }
            planned_items.insert(entry.item_id.as_str());
        }
    }

    let planned_minutes: i64 = days.iter().map(|d| d.planned_minutes).sum();
    let completed_minutes: i64 = days.iter().map(|d| d.completed_minutes).sum();
    let items_completed = planned_items.iter().filter(|id| done.contains(*id)).count();
    let completion_rate = if planned_minutes > 0 {
        completed_minutes as f64 / planned_minutes as f64
    } else {
        0.0
    };

    tracing::debug!(%monday, planned_minutes, completed_minutes, "weekly stats");

    WeeklyStats {
        week_start: monday,
        days,
        planned_minutes,
        completed_minutes,
        items_planned: planned_items.len(),
        items_completed,
        completion_rate,
    }
}
