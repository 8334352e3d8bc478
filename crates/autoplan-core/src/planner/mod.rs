//! Auto-plan engine.
//!
//! Places candidate items into the free time of one day:
//! - resolves the day's work interval from the working-hours configuration
//! - subtracts busy intervals to get free slots
//! - orders candidates by due date, priority and effort
//! - allocates them greedily, splitting across slots where allowed
//!
//! The engine is pure. It never fails, does no I/O, and identical input
//! produces identical output.

mod allocator;
mod item;
mod ordering;
mod slots;
mod workday;

pub use allocator::{allocate, Allocation, PlanResult, Unscheduled};
pub use item::{Priority, SchedulableItem, ScheduledRange};
pub use ordering::{compare, order_items};
pub use slots::{free_slots, BusyInterval, FreeSlot};
pub use workday::{resolve, resolve_in, WorkHoursConfig, WorkInterval};

use chrono::{NaiveDate, TimeZone, Utc};

/// Default minimum size of a split segment remainder (minutes)
pub const DEFAULT_MIN_SPLIT_MINUTES: u32 = 25;

/// Planner configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlannerConfig {
    /// A slot is only taken as a split segment if what is left of the item
    /// afterwards is at least this many minutes.
    pub min_split_minutes: u32,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            min_split_minutes: DEFAULT_MIN_SPLIT_MINUTES,
        }
    }
}

/// Runs the full planning pipeline for one day.
#[derive(Debug, Clone, Default)]
pub struct AutoPlanner {
    config: PlannerConfig,
}

impl AutoPlanner {
    /// Create a new planner with default config
    pub fn new() -> Self {
        Self::default()
    }

    /// Create with custom config
    pub fn with_config(config: PlannerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &PlannerConfig {
        &self.config
    }

    /// Plan `day` with working hours interpreted in UTC.
    pub fn plan(
        &self,
        day: NaiveDate,
        hours: &WorkHoursConfig,
        items: &[SchedulableItem],
        busy: &[BusyInterval],
    ) -> PlanResult {
        self.plan_in(day, hours, items, busy, &Utc)
    }

    /// Plan `day` with working hours interpreted as wall-clock time in `tz`.
    ///
    /// # Arguments
    /// * `items` - Candidates, already filtered by the caller
    /// * `busy` - Fixed occupied ranges to plan around
    pub fn plan_in<Tz: TimeZone>(
        &self,
        day: NaiveDate,
        hours: &WorkHoursConfig,
        items: &[SchedulableItem],
        busy: &[BusyInterval],
        tz: &Tz,
    ) -> PlanResult {
        let mut ordered = items.to_vec();
        order_items(&mut ordered);

        let Some(work) = resolve_in(day, hours, tz) else {
            tracing::debug!(%day, "no work interval, nothing placed");
            return PlanResult {
                allocations: Vec::new(),
                unscheduled: ordered
                    .into_iter()
                    .filter(|item| item.effort_minutes > 0)
                    .map(|item| Unscheduled {
                        remaining_minutes: item.effort_minutes,
                        item,
                    })
                    .collect(),
            };
        };

        let slots = free_slots(&work, busy);
        tracing::debug!(%day, slots = slots.len(), items = ordered.len(), "planning");

        allocate(&ordered, &slots, self.config.min_split_minutes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, NaiveTime, Utc};

    fn monday() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 19).unwrap()
    }

    fn at(h: u32, m: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 10, 19, h, m, 0).unwrap()
    }

    fn hours() -> WorkHoursConfig {
        WorkHoursConfig::weekdays(
            NaiveTime::from_hms_opt(9, 0, 0).unwrap(),
            NaiveTime::from_hms_opt(17, 0, 0).unwrap(),
        )
    }

    #[test]
    fn larger_item_goes_first_on_ties() {
        let items = [SchedulableItem::new("small", 30), SchedulableItem::new("large", 60)];
        let result = AutoPlanner::new().plan(monday(), &hours(), &items, &[]);

        assert_eq!(result.allocations[0].item_id, "large");
        assert_eq!(result.allocations[0].start, at(9, 0));
        assert_eq!(result.allocations[1].item_id, "small");
        assert_eq!(result.allocations[1].start, at(10, 0));
    }

    #[test]
    fn non_work_day_leaves_everything_unscheduled() {
        let sunday = NaiveDate::from_ymd_opt(2026, 10, 25).unwrap();
        let items = [SchedulableItem::new("a", 30), SchedulableItem::new("b", 90)];
        let result = AutoPlanner::new().plan(sunday, &hours(), &items, &[]);

        assert!(result.allocations.is_empty());
        assert_eq!(result.unscheduled.len(), 2);
        assert_eq!(result.unscheduled[0].item.id, "b");
        assert_eq!(result.unscheduled[0].remaining_minutes, 90);
    }

    #[test]
    fn custom_min_split() {
        // 100 minutes, slots of 60 and 60 with a meeting in between.
        let busy = [BusyInterval::new(at(10, 0), at(16, 0))];
        let items = [SchedulableItem::new("a", 100)];

        let strict = AutoPlanner::with_config(PlannerConfig { min_split_minutes: 45 });
        let result = strict.plan(monday(), &hours(), &items, &busy);
        // first slot would leave 40 < 45, second slot alone is too small
        assert!(result.allocations.is_empty());
        assert_eq!(result.unscheduled[0].remaining_minutes, 100);

        let result = AutoPlanner::new().plan(monday(), &hours(), &items, &busy);
        assert_eq!(result.placed_minutes("a"), 100);
        assert!(result.unscheduled.is_empty());
    }
}
