//! Stored work items.
//!
//! A [`Task`] is what the user captures and the store persists. The planner only
//! ever sees the reduced [`SchedulableItem`] view of it.

pub mod capture;
pub mod search;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::planner::{Priority, SchedulableItem, ScheduledRange};

/// Task status.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum TaskStatus {
    #[default]
    Todo,
    Done,
}

/// A captured work item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    /// Unique identifier
    pub id: String,
    pub title: String,
    /// Estimated effort in minutes
    pub effort_minutes: u32,
    pub due: Option<DateTime<Utc>>,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default)]
    pub status: TaskStatus,
    /// Bounding range of all ledger segments, written back after planning
    pub scheduled: Option<ScheduledRange>,
    #[serde(default)]
    pub tags: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
}

/// Fields supplied when creating a task.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct NewTask {
    pub title: String,
    pub effort_minutes: u32,
    pub due: Option<DateTime<Utc>>,
    pub priority: Priority,
    pub tags: Vec<String>,
}

impl NewTask {
    pub fn new(title: impl Into<String>, effort_minutes: u32) -> Self {
        Self {
            title: title.into(),
            effort_minutes,
            ..Self::default()
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

    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }
}

impl Task {
    /// Create a new task with a fresh id.
    pub fn new(fields: NewTask) -> Self {
        let now = Utc::now();
        Task {
            id: format!("task-{}", uuid::Uuid::new_v4()),
            title: fields.title,
            effort_minutes: fields.effort_minutes,
            due: fields.due,
            priority: fields.priority,
            status: TaskStatus::Todo,
            scheduled: None,
            tags: fields.tags,
            created_at: now,
            updated_at: now,
            completed_at: None,
        }
    }

    pub fn is_done(&self) -> bool {
        self.status == TaskStatus::Done
    }

    /// Not done, not yet scheduled, positive effort.
    pub fn is_plan_candidate(&self) -> bool {
        !self.is_done() && self.to_schedulable().is_candidate()
    }

    pub fn to_schedulable(&self) -> SchedulableItem {
        SchedulableItem {
            id: self.id.clone(),
            effort_minutes: self.effort_minutes,
            due: self.due,
            priority: self.priority,
            scheduled: self.scheduled,
        }
    }

    pub fn complete(&mut self) {
        let now = Utc::now();
        self.status = TaskStatus::Done;
        self.completed_at = Some(now);
        self.updated_at = now;
    }

    pub fn reopen(&mut self) {
        self.status = TaskStatus::Todo;
        self.completed_at = None;
        self.updated_at = Utc::now();
    }

    pub fn set_scheduled(&mut self, range: Option<ScheduledRange>) {
        self.scheduled = range;
        self.updated_at = Utc::now();
    }
}
