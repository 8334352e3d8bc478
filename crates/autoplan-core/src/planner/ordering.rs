//! Placement order for candidate items.

use std::cmp::Ordering;

use super::item::SchedulableItem;

/// Compare two items by placement precedence.
///
/// Earlier due first (undated items after all dated ones), then higher priority,
/// then larger effort first.
pub fn compare(a: &SchedulableItem, b: &SchedulableItem) -> Ordering {
    let by_due = match (a.due, b.due) {
        (Some(x), Some(y)) => x.cmp(&y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    };

    by_due
        .then_with(|| b.priority.cmp(&a.priority))
        .then_with(|| b.effort_minutes.cmp(&a.effort_minutes))
}

/// Sort items into placement order. Stable: full ties keep their input order.
pub fn order_items(items: &mut [SchedulableItem]) {
    items.sort_by(compare);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::planner::item::Priority;
    use chrono::{TimeZone, Utc};

    fn ids(items: &[SchedulableItem]) -> Vec<&str> {
        items.iter().map(|i| i.id.as_str()).collect()
    }

    #[test]
    fn due_dates_come_first() {
        let soon = Utc.with_ymd_and_hms(2026, 10, 20, 12, 0, 0).unwrap();
        let later = Utc.with_ymd_and_hms(2026, 10, 22, 12, 0, 0).unwrap();

        let mut items = vec![
            SchedulableItem::new("undated-high", 60).with_priority(Priority::High),
            SchedulableItem::new("later", 30).with_due(later),
            SchedulableItem::new("soon", 15).with_due(soon).with_priority(Priority::Low),
        ];
        order_items(&mut items);
        assert_eq!(ids(&items), ["soon", "later", "undated-high"]);
    }

    #[test]
    fn priority_then_effort() {
        let mut items = vec![
            SchedulableItem::new("low-big", 120).with_priority(Priority::Low),
            SchedulableItem::new("high-small", 10).with_priority(Priority::High),
            SchedulableItem::new("med-small", 10),
            SchedulableItem::new("med-big", 90),
        ];
        order_items(&mut items);
        assert_eq!(ids(&items), ["high-small", "med-big", "med-small", "low-big"]);
    }

    #[test]
    fn full_ties_are_stable() {
        let mut items = vec![
            SchedulableItem::new("first", 30),
            SchedulableItem::new("second", 30),
            SchedulableItem::new("third", 30),
        ];
        order_items(&mut items);
        assert_eq!(ids(&items), ["first", "second", "third"]);
    }
}
