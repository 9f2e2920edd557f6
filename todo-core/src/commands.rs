//! Task operations: CRUD, completion toggling, search, filter, and sort.
//!
//! Everything here is synchronous and store-agnostic in spirit: the only
//! side effects are inserts/updates on the in-memory [`TaskStore`] the
//! caller passes in, and every time-dependent operation takes `now`.

use std::cmp::Ordering;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::input::{self, InputError};
use crate::recurrence::{self, RecurrenceError};
use crate::store::TaskStore;
use crate::task::{Priority, RecurrenceRule, Task, TaskStatus};

/// Raw console input for task creation. Parsing and validation happen in
/// [`add_task`] so every entry path gets the same rules.
#[derive(Debug, Clone, Default)]
pub struct NewTask {
    pub title: String,
    pub description: String,
    /// Priority token; blank means medium.
    pub priority: String,
    /// Comma-separated tags.
    pub tags: String,
    /// "YYYY-MM-DD" or "YYYY-MM-DD HH:MM"; blank means none.
    pub due_date: String,
    pub reminder_at: String,
    pub is_recurring: bool,
    /// Rule token; required when `is_recurring` is set.
    pub recurrence_rule: String,
}

/// Partial update; only `Some` fields are applied. A `Some("")` date clears
/// the existing value.
#[derive(Debug, Clone, Default)]
pub struct UpdateTask {
    pub title: Option<String>,
    pub description: Option<String>,
    pub priority: Option<String>,
    pub tags: Option<String>,
    pub due_date: Option<String>,
    pub reminder_at: Option<String>,
    pub status: Option<String>,
}

/// Result of a completion toggle.
#[derive(Debug, Clone, PartialEq)]
pub struct ToggleOutcome {
    pub task: Task,
    /// Successor created when a recurring task was completed.
    pub spawned: Option<Task>,
}

/// Validate, construct, and store a new task. Dates are interpreted in `tz`.
pub fn add_task(
    store: &mut TaskStore,
    req: &NewTask,
    tz: &str,
    now: DateTime<Utc>,
) -> Result<Task, InputError> {
    let title = input::validate_title(&req.title)?;
    let description = input::validate_description(&req.description)?;
    let priority = if req.priority.trim().is_empty() {
        Priority::Medium
    } else {
        input::parse_priority(&req.priority)?
    };
    let rule = if req.recurrence_rule.trim().is_empty() {
        None
    } else {
        Some(req.recurrence_rule.parse::<RecurrenceRule>()?)
    };
    if req.is_recurring && rule.is_none() {
        return Err(InputError::MissingRecurrenceRule);
    }

    let mut task = Task::new(title, now);
    task.description = description;
    task.priority = priority;
    task.tags = input::parse_tags(&req.tags);
    task.due_date = input::parse_local_datetime(&req.due_date, tz)?;
    task.reminder_at = input::parse_local_datetime(&req.reminder_at, tz)?;
    task.is_recurring = req.is_recurring;
    task.recurrence_rule = rule;

    store.add(task.clone());
    Ok(task)
}

/// Apply a partial update. Returns `Ok(None)` if the task does not exist.
pub fn update_task(
    store: &mut TaskStore,
    id: Uuid,
    req: &UpdateTask,
    tz: &str,
    now: DateTime<Utc>,
) -> Result<Option<Task>, InputError> {
    let Some(mut task) = store.get(id).cloned() else {
        return Ok(None);
    };

    if let Some(title) = &req.title {
        task.title = input::validate_title(title)?;
    }
    if let Some(description) = &req.description {
        task.description = input::validate_description(description)?;
    }
    if let Some(priority) = &req.priority {
        task.priority = input::parse_priority(priority)?;
    }
    if let Some(tags) = &req.tags {
        task.tags = input::parse_tags(tags);
    }
    if let Some(due) = &req.due_date {
        task.due_date = input::parse_local_datetime(due, tz)?;
    }
    if let Some(reminder) = &req.reminder_at {
        task.reminder_at = input::parse_local_datetime(reminder, tz)?;
    }
    if let Some(status) = &req.status {
        task.status = input::parse_status(status)?;
    }

    task.updated_at = now;
    store.update(task.clone(), now);
    Ok(Some(task))
}

pub fn delete_task(store: &mut TaskStore, id: Uuid) -> bool {
    store.delete(id)
}

/// Toggle a task between pending and completed.
///
/// Completing a recurring task spawns its next occurrence and adds it to the
/// store; toggling back to pending clears `completed_at` but never retracts
/// a successor. Each genuine pending -> completed transition spawns again.
///
/// Returns `Ok(None)` if the task does not exist. On a recurrence error the
/// store is left untouched.
pub fn toggle_complete(
    store: &mut TaskStore,
    id: Uuid,
    now: DateTime<Utc>,
) -> Result<Option<ToggleOutcome>, RecurrenceError> {
    let Some(mut task) = store.get(id).cloned() else {
        return Ok(None);
    };

    let spawned = if task.status == TaskStatus::Completed {
        task.status = TaskStatus::Pending;
        task.completed_at = None;
        None
    } else {
        task.status = TaskStatus::Completed;
        task.completed_at = Some(now);

        let successor = recurrence::handle_completion(&task, now)?;
        if let Some(successor) = &successor {
            store.add(successor.clone());
        }
        successor
    };

    task.updated_at = now;
    store.update(task.clone(), now);
    Ok(Some(ToggleOutcome { task, spawned }))
}

/// Case-insensitive keyword search over title and description.
/// A blank keyword matches everything.
pub fn search_tasks(tasks: &[Task], keyword: &str) -> Vec<Task> {
    let keyword = keyword.trim().to_lowercase();
    if keyword.is_empty() {
        return tasks.to_vec();
    }
    tasks
        .iter()
        .filter(|t| {
            t.title.to_lowercase().contains(&keyword)
                || t.description.to_lowercase().contains(&keyword)
        })
        .cloned()
        .collect()
}

/// AND-combined task filters.
#[derive(Debug, Clone, Default)]
pub struct TaskFilter {
    pub status: Option<TaskStatus>,
    pub priority: Option<Priority>,
    pub tag: Option<String>,
    pub due_before: Option<DateTime<Utc>>,
    pub due_after: Option<DateTime<Utc>>,
}

pub fn filter_tasks(tasks: &[Task], filter: &TaskFilter) -> Vec<Task> {
    let tag = filter.tag.as_ref().map(|t| t.trim().to_lowercase());
    tasks
        .iter()
        .filter(|t| filter.status.is_none_or(|s| t.status == s))
        .filter(|t| filter.priority.is_none_or(|p| t.priority == p))
        .filter(|t| {
            tag.as_ref()
                .is_none_or(|tag| t.tags.iter().any(|tg| tg.to_lowercase() == *tag))
        })
        .filter(|t| {
            filter
                .due_before
                .is_none_or(|cutoff| t.due_date.is_some_and(|due| due <= cutoff))
        })
        .filter(|t| {
            filter
                .due_after
                .is_none_or(|cutoff| t.due_date.is_some_and(|due| due >= cutoff))
        })
        .cloned()
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortKey {
    #[default]
    CreatedAt,
    Title,
    Priority,
    DueDate,
    Status,
}

impl std::str::FromStr for SortKey {
    type Err = InputError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "" | "created_at" | "created" => Ok(SortKey::CreatedAt),
            "title" => Ok(SortKey::Title),
            "priority" => Ok(SortKey::Priority),
            "due_date" | "due" => Ok(SortKey::DueDate),
            "status" => Ok(SortKey::Status),
            other => Err(InputError::InvalidSortKey(other.to_string())),
        }
    }
}

/// Sort tasks by the given key. Missing due dates sort last (ascending).
pub fn sort_tasks(mut tasks: Vec<Task>, key: SortKey, descending: bool) -> Vec<Task> {
    tasks.sort_by(|a, b| {
        let ord = match key {
            SortKey::CreatedAt => a.created_at.cmp(&b.created_at),
            SortKey::Title => a.title.to_lowercase().cmp(&b.title.to_lowercase()),
            SortKey::Priority => a.priority.rank().cmp(&b.priority.rank()),
            SortKey::DueDate => match (a.due_date, b.due_date) {
                (Some(x), Some(y)) => x.cmp(&y),
                (Some(_), None) => Ordering::Less,
                (None, Some(_)) => Ordering::Greater,
                (None, None) => Ordering::Equal,
            },
            SortKey::Status => a.status.as_str().cmp(b.status.as_str()),
        };
        if descending { ord.reverse() } else { ord }
    });
    tasks
}
