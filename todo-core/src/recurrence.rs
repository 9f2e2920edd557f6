//! Recurrence engine: next-occurrence calculation and completion-triggered
//! successor creation for recurring tasks.

use chrono::{DateTime, Duration, Months, Utc};
use thiserror::Error;

use crate::task::{RecurrenceRule, Task};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RecurrenceError {
    #[error("unsupported recurrence rule: '{0}'. Choose from: daily, weekly, monthly, yearly")]
    UnsupportedRule(String),

    #[error("task '{0}' is flagged recurring but has no recurrence rule")]
    InvalidRecurrenceState(String),

    #[error("next occurrence is outside the representable datetime range")]
    OutOfRange,
}

impl std::str::FromStr for RecurrenceRule {
    type Err = RecurrenceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "daily" => Ok(RecurrenceRule::Daily),
            "weekly" => Ok(RecurrenceRule::Weekly),
            "monthly" => Ok(RecurrenceRule::Monthly),
            "yearly" => Ok(RecurrenceRule::Yearly),
            other => Err(RecurrenceError::UnsupportedRule(other.to_string())),
        }
    }
}

/// Compute the occurrence one period after `reference`.
///
/// A recurring task with no due date still recurs relative to `now`, so a
/// missing reference falls back to the injected clock instead of erroring.
/// Monthly and yearly steps clamp to the last day of the target month
/// (Jan 31 -> Feb 28, and Feb 29 -> Feb 28 when the target year is not a
/// leap year); they never roll over into the following month.
pub fn next_occurrence(
    reference: Option<DateTime<Utc>>,
    rule: RecurrenceRule,
    now: DateTime<Utc>,
) -> Result<DateTime<Utc>, RecurrenceError> {
    let base = reference.unwrap_or(now);

    let next = match rule {
        RecurrenceRule::Daily => base.checked_add_signed(Duration::days(1)),
        RecurrenceRule::Weekly => base.checked_add_signed(Duration::days(7)),
        RecurrenceRule::Monthly => base.checked_add_months(Months::new(1)),
        RecurrenceRule::Yearly => base.checked_add_months(Months::new(12)),
    };

    next.ok_or(RecurrenceError::OutOfRange)
}

/// Decide whether completing `task` spawns a successor, and build it.
///
/// The caller has already flipped the task to completed; this only produces
/// the next occurrence as a value for the caller to persist. It never writes
/// anywhere and never mutates the original.
///
/// Non-recurring tasks return `Ok(None)` — the normal case. A recurring flag
/// without a rule is upstream data corruption and is surfaced as an error
/// rather than silently skipped.
pub fn handle_completion(
    task: &Task,
    now: DateTime<Utc>,
) -> Result<Option<Task>, RecurrenceError> {
    if !task.is_recurring {
        return Ok(None);
    }
    let Some(rule) = task.recurrence_rule else {
        return Err(RecurrenceError::InvalidRecurrenceState(task.title.clone()));
    };

    let next_due = next_occurrence(task.due_date, rule, now)?;

    // Task::new gives the successor its reset lifecycle fields: fresh id,
    // pending status, no completed_at, no reminder, no cached occurrence.
    let mut successor = Task::new(task.title.clone(), now);
    successor.description = task.description.clone();
    successor.priority = task.priority;
    successor.tags = task.tags.clone();
    successor.due_date = Some(next_due);
    successor.is_recurring = true;
    successor.recurrence_rule = Some(rule);

    Ok(Some(successor))
}
