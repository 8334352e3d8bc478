//! Planning inputs: priority levels, scheduled ranges and candidate items.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Priority level. Declaration order gives `Low < Medium < High`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
}

impl Priority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Priority {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "high" | "h" => Ok(Self::High),
            "medium" | "med" | "m" => Ok(Self::Medium),
            "low" | "l" => Ok(Self::Low),
            other => Err(format!("unknown priority '{other}'")),
        }
    }
}

/// Bounding scheduled range of an item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduledRange {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

/// A work item as seen by the planner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchedulableItem {
    pub id: String,
    pub effort_minutes: u32,
    pub due: Option<DateTime<Utc>>,
    #[serde(default)]
    pub priority: Priority,
    pub scheduled: Option<ScheduledRange>,
}

impl SchedulableItem {
    pub fn new(id: impl Into<String>, effort_minutes: u32) -> Self {
        Self {
            id: id.into(),
            effort_minutes,
            due: None,
            priority: Priority::Medium,
            scheduled: None,
        }
    }

    pub fn with_due(mut self, due: DateTime<Utc>) -> Self {
        self.due = Some(due);
        self
    }

    pub fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = priority;
        self
    }

    pub fn effort(&self) -> Duration {
        Duration::minutes(i64::from(self.effort_minutes))
    }

    /// Whether this item may be handed to the planner at all.
    pub fn is_candidate(&self) -> bool {
        self.scheduled.is_none() && self.effort_minutes > 0
    }
}
