//! Quick-add capture.
//!
//! Turns a one-line note into a [`NewTask`]. Recognised tokens:
//!
//! - `~45m`, `~2h`, `~1h30m`: effort
//! - `!high`, `!med`, `!low` (or `!h`, `!m`, `!l`): priority
//! - `due:2026-10-21` (end of that day, UTC) or `due:2026-10-21T15:00` (UTC): due
//! - `#tag`: tag
//!
//! Everything else is the title.
//!
//! ```rust,ignore
//! let task = parse_quick_add("Draft budget ~1h30m !high due:2026-10-21 #finance", 30)?;
//! assert_eq!(task.effort_minutes, 90);
//! ```

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};

use super::NewTask;
use crate::error::ValidationError;
use crate::planner::Priority;

/// Parse a quick-add line. `default_effort` applies when no `~` token is present.
pub fn parse_quick_add(text: &str, default_effort: u32) -> Result<NewTask, ValidationError> {
    let mut task = NewTask::new(String::new(), default_effort);
    let mut title = Vec::new();

    for token in text.split_whitespace() {
        if let Some(effort) = token.strip_prefix('~') {
            task.effort_minutes = parse_effort(effort).ok_or_else(|| invalid("effort", token))?;
        } else if let Some(priority) = token.strip_prefix('!') {
            task.priority = priority
                .parse::<Priority>()
                .map_err(|message| ValidationError::InvalidValue {
                    field: "priority".into(),
                    message,
                })?;
        } else if let Some(due) = token.strip_prefix("due:") {
            task.due = Some(parse_due(due).ok_or_else(|| invalid("due", token))?);
        } else if let Some(tag) = token.strip_prefix('#').filter(|t| !t.is_empty()) {
            task.tags.push(tag.to_string());
        } else {
            title.push(token);
        }
    }

    task.title = title.join(" ");
    if task.title.is_empty() {
        return Err(ValidationError::EmptyTitle);
    }
    Ok(task)
}

fn invalid(field: &str, token: &str) -> ValidationError {
    ValidationError::InvalidValue {
        field: field.into(),
        message: format!("cannot parse '{token}'"),
    }
}

/// `45m`, `2h`, `1h30m`, or bare minutes.
fn parse_effort(s: &str) -> Option<u32> {
    if let Ok(minutes) = s.parse::<u32>() {
        return Some(minutes);
    }

    let (hours, rest) = match s.split_once('h') {
        Some((h, rest)) => (h.parse::<u32>().ok()?, rest),
        None => (0, s),
    };
    let minutes = match rest {
        "" => 0,
        m => m.strip_suffix('m')?.parse::<u32>().ok()?,
    };

    hours.checked_mul(60)?.checked_add(minutes)
}

fn parse_due(s: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M") {
        return Some(dt.and_utc());
    }
    let date = NaiveDate::parse_from_str(s, "%Y-%m-%d").ok()?;
    let end_of_day = NaiveTime::from_hms_opt(23, 59, 0)?;
    Some(date.and_time(end_of_day).and_utc())
}
