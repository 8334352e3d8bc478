//! Free slot computation by interval subtraction.
//!
//! Busy intervals are clipped to the work interval and then cut out of it one
//! at a time. Because every busy interval is subtracted from every working piece
//! it touches, the result is correct for unsorted and mutually overlapping input.
//!
//! Slots are shrunk to whole minutes (start rounded up, end rounded down) so
//! that every placement downstream is a whole number of minutes.

use chrono::{DateTime, Duration, DurationRound, Utc};
use serde::{Deserialize, Serialize};

use super::workday::WorkInterval;

/// An externally fixed occupied time range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BusyInterval {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl BusyInterval {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self { start, end }
    }

    /// Intersection with `work`, or `None` if empty or degenerate.
    fn clip(&self, work: &WorkInterval) -> Option<Self> {
        let start = self.start.max(work.start);
        let end = self.end.min(work.end);
        (start < end).then_some(Self { start, end })
    }
}

/// A sub-interval of the work interval not covered by any busy interval.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FreeSlot {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl FreeSlot {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self { start, end }
    }

    /// Get duration in minutes
    pub fn duration_minutes(&self) -> i64 {
        (self.end - self.start).num_minutes()
    }

    pub fn is_empty(&self) -> bool {
        self.end <= self.start
    }

    fn overlaps(&self, busy: &BusyInterval) -> bool {
        self.start < busy.end && self.end > busy.start
    }
}

/// Compute the free slots of `work` around `busy`.
///
/// # Returns
/// Non-empty slots sorted by start time, pairwise disjoint, each inside `work`.
pub fn free_slots(work: &WorkInterval, busy: &[BusyInterval]) -> Vec<FreeSlot> {
    let mut clipped: Vec<BusyInterval> = busy.iter().filter_map(|b| b.clip(work)).collect();
    clipped.sort_by_key(|b| b.start);

    let mut working = vec![FreeSlot::new(work.start, work.end)];

    for block in &clipped {
        let mut next = Vec::with_capacity(working.len() + 1);
        for slot in working {
            if !slot.overlaps(block) {
                next.push(slot);
                continue;
            }
            if slot.start < block.start {
                next.push(FreeSlot::new(slot.start, block.start));
            }
            if block.end < slot.end {
                next.push(FreeSlot::new(block.end, slot.end));
            }
        }
        working = next;
    }

    let mut slots: Vec<FreeSlot> = working
        .into_iter()
        .map(|s| FreeSlot::new(ceil_minute(s.start), floor_minute(s.end)))
        .filter(|s| !s.is_empty())
        .collect();
    slots.sort_by_key(|s| s.start);
    slots
}

fn floor_minute(t: DateTime<Utc>) -> DateTime<Utc> {
    t.duration_trunc(Duration::minutes(1)).unwrap_or(t)
}

fn ceil_minute(t: DateTime<Utc>) -> DateTime<Utc> {
    let floor = floor_minute(t);
    if floor == t {
        t
    } else {
        floor + Duration::minutes(1)
    }
}
