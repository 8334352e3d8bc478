//! Greedy placement of ordered items into free slots.
//!
//! Single forward pass. Each item walks the slots in start order and either fits
//! in the first slot large enough for its remainder, or takes whole slots as
//! split segments as long as what is left afterwards stays at or above the
//! minimum split size. A slot skipped for one item stays free for the next.
//! Earlier placements are never revisited.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::item::SchedulableItem;
use super::slots::FreeSlot;

/// One placed segment of an item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Allocation {
    pub id: String,
    pub item_id: String,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    /// The item already had an earlier segment in the same run.
    pub continuation: bool,
}

impl Allocation {
    /// Create a segment. The id is derived from item and interval so that
    /// identical runs produce identical results.
    ///
    /// The id names the placement, not the run: if an item is unscheduled and
    /// planned again into the same interval, the ledger holds two segments
    /// with the same id.
    pub fn new(
        item_id: impl Into<String>,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        continuation: bool,
    ) -> Self {
        let item_id = item_id.into();
        let key = format!("{}@{}/{}", item_id, start.to_rfc3339(), end.to_rfc3339());
        Self {
            id: Uuid::new_v5(&Uuid::NAMESPACE_OID, key.as_bytes()).to_string(),
            item_id,
            start,
            end,
            continuation,
        }
    }

    /// Get duration in minutes
    pub fn duration_minutes(&self) -> i64 {
        (self.end - self.start).num_minutes()
    }

    pub fn overlaps(&self, other: &Self) -> bool {
        self.start < other.end && self.end > other.start
    }
}

/// An item that could not be fully placed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Unscheduled {
    pub item: SchedulableItem,
    pub remaining_minutes: u32,
}

/// Outcome of one planning run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanResult {
    /// Placed segments, sorted by start.
    pub allocations: Vec<Allocation>,
    /// Items left (partly) unplaced, in placement order.
    pub unscheduled: Vec<Unscheduled>,
}

impl PlanResult {
    pub fn allocations_for<'a>(&'a self, item_id: &'a str) -> impl Iterator<Item = &'a Allocation> {
        self.allocations.iter().filter(move |a| a.item_id == item_id)
    }

    pub fn placed_minutes(&self, item_id: &str) -> i64 {
        self.allocations_for(item_id).map(Allocation::duration_minutes).sum()
    }

    pub fn is_unscheduled(&self, item_id: &str) -> bool {
        self.unscheduled.iter().any(|u| u.item.id == item_id)
    }
}

/// Place `items` (already in placement order) into `slots`.
pub fn allocate(items: &[SchedulableItem], slots: &[FreeSlot], min_split_minutes: u32) -> PlanResult {
    let min_split = Duration::minutes(i64::from(min_split_minutes));
    let mut free: Vec<FreeSlot> = slots.to_vec();
    free.sort_by_key(|s| s.start);

    let mut result = PlanResult::default();

    for item in items {
        if item.effort_minutes == 0 {
            tracing::debug!(item = %item.id, "zero effort, nothing to place");
            continue;
        }

        let mut remaining = item.effort();
        let mut placed_any = false;

        for slot in free.iter_mut() {
            if slot.is_empty() {
                continue;
            }
            let available = slot.end - slot.start;

            if available >= remaining {
                let end = slot.start + remaining;
                tracing::debug!(item = %item.id, start = %slot.start, %end, "placed");
                result
                    .allocations
                    .push(Allocation::new(item.id.as_str(), slot.start, end, placed_any));
                slot.start = end;
                remaining = Duration::zero();
                break;
            }

            let leftover = remaining - available;
            if leftover < min_split {
                tracing::debug!(
                    item = %item.id,
                    slot_minutes = available.num_minutes(),
                    leftover_minutes = leftover.num_minutes(),
                    "slot skipped, split would leave a sliver"
                );
                continue;
            }

            tracing::debug!(item = %item.id, start = %slot.start, end = %slot.end, "placed split segment");
            result
                .allocations
                .push(Allocation::new(item.id.as_str(), slot.start, slot.end, placed_any));
            placed_any = true;
            slot.start = slot.end;
            remaining = leftover;
        }

        if remaining > Duration::zero() {
            result.unscheduled.push(Unscheduled {
                item: item.clone(),
                remaining_minutes: remaining.num_minutes() as u32,
            });
        }
    }

    result.allocations.sort_by_key(|a| a.start);
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(h: u32, m: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 10, 19, h, m, 0).unwrap()
    }

    fn slot(from: (u32, u32), to: (u32, u32)) -> FreeSlot {
        FreeSlot::new(at(from.0, from.1), at(to.0, to.1))
    }

    #[test]
    fn fits_in_first_slot() {
        let items = [SchedulableItem::new("a", 60), SchedulableItem::new("b", 30)];
        let result = allocate(&items, &[slot((9, 0), (17, 0))], 25);

        assert_eq!(result.allocations.len(), 2);
        assert_eq!(result.allocations[0].item_id, "a");
        assert_eq!((result.allocations[0].start, result.allocations[0].end), (at(9, 0), at(10, 0)));
        assert_eq!((result.allocations[1].start, result.allocations[1].end), (at(10, 0), at(10, 30)));
        assert!(result.allocations.iter().all(|a| !a.continuation));
        assert!(result.unscheduled.is_empty());
    }

    #[test]
    fn splits_across_slots_and_reports_rest() {
        let items = [SchedulableItem::new("big", 480)];
        let slots = [slot((9, 0), (12, 0)), slot((13, 0), (17, 0))];
        let result = allocate(&items, &slots, 25);

        assert_eq!(result.allocations.len(), 2);
        assert!(!result.allocations[0].continuation);
        assert!(result.allocations[1].continuation);
        assert_eq!(result.placed_minutes("big"), 420);
        assert_eq!(result.unscheduled.len(), 1);
        assert_eq!(result.unscheduled[0].remaining_minutes, 60);
    }

    #[test]
    fn skips_slot_that_would_leave_sliver() {
        // 40 needed, a 30 minute slot would leave 10 (< 25): skip it.
        let items = [SchedulableItem::new("x", 40)];
        let slots = [slot((9, 0), (9, 30)), slot((10, 0), (11, 0))];
        let result = allocate(&items, &slots, 25);

        assert_eq!(result.allocations.len(), 1);
        assert_eq!(result.allocations[0].start, at(10, 0));
        assert_eq!(result.allocations[0].end, at(10, 40));
        assert!(!result.allocations[0].continuation);
    }

    #[test]
    fn skipped_slot_stays_free_for_later_items() {
        let items = [SchedulableItem::new("x", 40), SchedulableItem::new("y", 20)];
        let slots = [slot((9, 0), (9, 30)), slot((10, 0), (11, 0))];
        let result = allocate(&items, &slots, 25);

        let y: Vec<_> = result.allocations_for("y").collect();
        assert_eq!(y.len(), 1);
        assert_eq!((y[0].start, y[0].end), (at(9, 0), at(9, 20)));
        // sorted by start regardless of placement order
        assert_eq!(result.allocations[0].item_id, "y");
    }

    #[test]
    fn exact_fit_consumes_slot() {
        let items = [SchedulableItem::new("a", 470), SchedulableItem::new("tail", 10)];
        let result = allocate(&items, &[slot((9, 0), (17, 0))], 25);

        assert!(result.unscheduled.is_empty());
        let tail: Vec<_> = result.allocations_for("tail").collect();
        assert_eq!((tail[0].start, tail[0].end), (at(16, 50), at(17, 0)));
    }

    #[test]
    fn zero_effort_is_ignored() {
        let items = [SchedulableItem::new("none", 0)];
        let result = allocate(&items, &[slot((9, 0), (10, 0))], 25);
        assert!(result.allocations.is_empty());
        assert!(result.unscheduled.is_empty());
    }

    #[test]
    fn placed_and_remaining_add_up_with_seconds_in_busy_times() {
        use crate::planner::slots::{free_slots, BusyInterval};
        use crate::planner::workday::WorkInterval;

        let sec = |h, m, s| Utc.with_ymd_and_hms(2026, 10, 19, h, m, s).unwrap();
        let work = WorkInterval {
            start: at(9, 0),
            end: at(17, 0),
        };

        let slots = free_slots(&work, &[BusyInterval::new(sec(12, 0, 30), at(13, 0))]);
        let result = allocate(&[SchedulableItem::new("big", 480)], &slots, 25);
        assert_eq!(result.placed_minutes("big"), 420);
        assert_eq!(result.unscheduled[0].remaining_minutes, 60);

        let slots = free_slots(&work, &[BusyInterval::new(sec(9, 29, 30), at(17, 0))]);
        let result = allocate(&[SchedulableItem::new("short", 30)], &slots, 0);
        assert_eq!(result.allocations.len(), 1);
        assert_eq!(result.allocations[0].end, at(9, 29));
        assert_eq!(result.unscheduled[0].remaining_minutes, 1);
    }

    #[test]
    fn allocation_ids_are_deterministic() {
        let a = Allocation::new("item", at(9, 0), at(10, 0), false);
        let b = Allocation::new("item", at(9, 0), at(10, 0), false);
        let c = Allocation::new("item", at(10, 0), at(11, 0), false);
        assert_eq!(a.id, b.id);
        assert_ne!(a.id, c.id);
    }
}
