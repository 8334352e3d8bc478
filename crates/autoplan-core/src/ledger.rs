//! Allocation ledger.
//!
//! Keeps every segment ever committed for an item and derives the item's
//! bounding scheduled range from them. Recording is additive: segments from
//! earlier runs are never removed or merged, so planning the same item twice
//! leaves both runs' segments in its history.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

use crate::planner::{Allocation, ScheduledRange};

/// Accumulated history for one item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerEntry {
    pub item_id: String,
    /// All segments for the item, sorted by start.
    pub allocations: Vec<Allocation>,
    pub scheduled_start: DateTime<Utc>,
    pub scheduled_end: DateTime<Utc>,
}

impl LedgerEntry {
    pub fn range(&self) -> ScheduledRange {
        ScheduledRange {
            start: self.scheduled_start,
            end: self.scheduled_end,
        }
    }

    pub fn total_minutes(&self) -> i64 {
        self.allocations.iter().map(Allocation::duration_minutes).sum()
    }
}

/// Per-item allocation history.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AllocationLedger {
    entries: BTreeMap<String, LedgerEntry>,
}

impl AllocationLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one run's allocations.
    ///
    /// # Returns
    /// The recomputed bounding range of every item touched by this run, keyed
    /// by item id.
    pub fn record(&mut self, allocations: &[Allocation]) -> BTreeMap<String, ScheduledRange> {
        let mut touched = BTreeSet::new();

        for allocation in allocations {
            let entry = self
                .entries
                .entry(allocation.item_id.clone())
                .or_insert_with(|| LedgerEntry {
                    item_id: allocation.item_id.clone(),
                    allocations: Vec::new(),
                    scheduled_start: allocation.start,
                    scheduled_end: allocation.end,
                });
            entry.allocations.push(allocation.clone());
            touched.insert(allocation.item_id.clone());
        }

        touched
            .into_iter()
            .filter_map(|item_id| {
                let entry = self.entries.get_mut(&item_id)?;
                entry.allocations.sort_by_key(|a| a.start);
                let start = entry.allocations.iter().map(|a| a.start).min()?;
                let end = entry.allocations.iter().map(|a| a.end).max()?;
                entry.scheduled_start = start;
                entry.scheduled_end = end;
                Some((item_id, entry.range()))
            })
            .collect()
    }

    pub fn get(&self, item_id: &str) -> Option<&LedgerEntry> {
        self.entries.get(item_id)
    }

    pub fn scheduled_range(&self, item_id: &str) -> Option<ScheduledRange> {
        self.entries.get(item_id).map(LedgerEntry::range)
    }

    pub fn entries(&self) -> impl Iterator<Item = &LedgerEntry> {
        self.entries.values()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(day: u32, h: u32, m: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 10, day, h, m, 0).unwrap()
    }

    #[test]
    fn bounding_range_spans_all_segments() {
        let mut ledger = AllocationLedger::new();
        let ranges = ledger.record(&[
            Allocation::new("a", at(19, 13, 0), at(19, 17, 0), true),
            Allocation::new("b", at(19, 9, 0), at(19, 9, 30), false),
            Allocation::new("a", at(19, 9, 30), at(19, 12, 0), false),
        ]);

        assert_eq!(ranges.len(), 2);
        assert_eq!(ranges["a"].start, at(19, 9, 30));
        assert_eq!(ranges["a"].end, at(19, 17, 0));

        let entry = ledger.get("a").unwrap();
        assert_eq!(entry.allocations[0].start, at(19, 9, 30));
        assert_eq!(entry.total_minutes(), 150 + 240);
    }

    #[test]
    fn later_runs_are_additive() {
        let mut ledger = AllocationLedger::new();
        ledger.record(&[Allocation::new("a", at(19, 9, 0), at(19, 10, 0), false)]);
        let ranges = ledger.record(&[Allocation::new("a", at(20, 9, 0), at(20, 10, 0), false)]);

        assert_eq!(ledger.get("a").unwrap().allocations.len(), 2);
        assert_eq!(ranges["a"].start, at(19, 9, 0));
        assert_eq!(ranges["a"].end, at(20, 10, 0));
    }

    #[test]
    fn repeated_identical_run_appends_duplicate() {
        let mut ledger = AllocationLedger::new();
        let run = [Allocation::new("a", at(19, 9, 0), at(19, 10, 0), false)];
        ledger.record(&run);
        ledger.record(&run);

        let entry = ledger.get("a").unwrap();
        assert_eq!(entry.allocations.len(), 2);
        // same placement, same id
        assert_eq!(entry.allocations[0].id, entry.allocations[1].id);
        assert_eq!(entry.range().start, at(19, 9, 0));
        assert_eq!(entry.range().end, at(19, 10, 0));
    }

    #[test]
    fn untouched_items_are_not_reported() {
        let mut ledger = AllocationLedger::new();
        ledger.record(&[Allocation::new("a", at(19, 9, 0), at(19, 10, 0), false)]);
        let ranges = ledger.record(&[Allocation::new("b", at(19, 11, 0), at(19, 12, 0), false)]);

        assert!(ranges.contains_key("b"));
        assert!(!ranges.contains_key("a"));
        assert_eq!(ledger.len(), 2);
    }

    #[test]
    fn serializes_as_map() {
        let mut ledger = AllocationLedger::new();
        ledger.record(&[Allocation::new("a", at(19, 9, 0), at(19, 10, 0), false)]);

        let json = serde_json::to_value(&ledger).unwrap();
        assert!(json.get("a").is_some());
        let back: AllocationLedger = serde_json::from_value(json).unwrap();
        assert_eq!(back, ledger);
    }
}
