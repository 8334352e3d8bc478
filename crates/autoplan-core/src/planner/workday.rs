//! Resolution of a calendar day into its absolute work interval.

use chrono::{DateTime, Datelike, NaiveDate, NaiveTime, TimeZone, Utc, Weekday};
use serde::{Deserialize, Serialize};

/// Working hours and the weekdays on which planning may place items.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkHoursConfig {
    pub start: NaiveTime,
    pub end: NaiveTime,
    pub days: Vec<Weekday>,
}

impl WorkHoursConfig {
    pub fn new(start: NaiveTime, end: NaiveTime, days: impl IntoIterator<Item = Weekday>) -> Self {
        Self {
            start,
            end,
            days: days.into_iter().collect(),
        }
    }

    /// Monday through Friday.
    pub fn weekdays(start: NaiveTime, end: NaiveTime) -> Self {
        Self::new(
            start,
            end,
            [
                Weekday::Mon,
                Weekday::Tue,
                Weekday::Wed,
                Weekday::Thu,
                Weekday::Fri,
            ],
        )
    }

    pub fn allows(&self, weekday: Weekday) -> bool {
        self.days.contains(&weekday)
    }
}

/// Absolute interval during which planning may place items on one day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkInterval {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl WorkInterval {
    pub fn duration_minutes(&self) -> i64 {
        (self.end - self.start).num_minutes()
    }

    pub fn contains(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> bool {
        self.start <= start && end <= self.end
    }
}

/// Resolve `day` against `config`, composing the hours in UTC.
pub fn resolve(day: NaiveDate, config: &WorkHoursConfig) -> Option<WorkInterval> {
    resolve_in(day, config, &Utc)
}

/// Resolve `day` against `config`, interpreting the hours as wall-clock time in `tz`.
///
/// Returns `None` when the weekday is not a scheduling day, when the composed end
/// is not strictly after the start, or when a wall-clock time does not exist in `tz`
/// (DST gap). Ambiguous wall-clock times take the earliest instant.
pub fn resolve_in<Tz: TimeZone>(
    day: NaiveDate,
    config: &WorkHoursConfig,
    tz: &Tz,
) -> Option<WorkInterval> {
    if !config.allows(day.weekday()) {
        return None;
    }

    let (Some(start), Some(end)) = (
        local_instant(day, config.start, tz),
        local_instant(day, config.end, tz),
    ) else {
        tracing::warn!(%day, start = %config.start, end = %config.end, "work hours fall in a DST gap");
        return None;
    };

    if end <= start {
        tracing::warn!(%day, start = %config.start, end = %config.end, "work hours end before they start");
        return None;
    }

    Some(WorkInterval { start, end })
}

fn local_instant<Tz: TimeZone>(day: NaiveDate, time: NaiveTime, tz: &Tz) -> Option<DateTime<Utc>> {
    tz.from_local_datetime(&day.and_time(time))
        .earliest()
        .map(|dt| dt.with_timezone(&Utc))
}
