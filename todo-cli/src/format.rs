//! Console rendering for tasks, in the user's display timezone.

use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use todo_core::{Task, TaskStatus};

fn status_icon(status: TaskStatus) -> &'static str {
    match status {
        TaskStatus::Pending => "○",
        TaskStatus::InProgress => "◑",
        TaskStatus::Completed => "●",
    }
}

pub fn short_id(task: &Task) -> String {
    task.id.simple().to_string()[..8].to_string()
}

fn local(dt: DateTime<Utc>, tz: &Tz, fmt: &str) -> String {
    dt.with_timezone(tz).format(fmt).to_string()
}

fn opt_local(dt: Option<DateTime<Utc>>, tz: &Tz) -> String {
    match dt {
        Some(dt) => local(dt, tz, "%Y-%m-%d %H:%M"),
        None => "(none)".to_string(),
    }
}

/// One-line summary for list views.
pub fn task_summary(task: &Task, tz: &Tz) -> String {
    let due = match task.due_date {
        Some(due) => format!(" | Due: {}", local(due, tz, "%Y-%m-%d")),
        None => String::new(),
    };
    format!(
        "  {} [{}] [{}] {}{}  (ID: {})",
        status_icon(task.status),
        task.priority.as_str().to_uppercase(),
        task.status,
        task.title,
        due,
        short_id(task),
    )
}

/// Full detail block.
pub fn task_detail(task: &Task, tz: &Tz) -> String {
    let recurring = match (task.is_recurring, task.recurrence_rule) {
        (true, Some(rule)) => rule.to_string(),
        _ => "No".to_string(),
    };
    let description = if task.description.is_empty() {
        "(none)".to_string()
    } else {
        task.description.clone()
    };
    let tags = if task.tags.is_empty() {
        "(none)".to_string()
    } else {
        task.tags.join(", ")
    };

    let sep = "=".repeat(50);
    [
        sep.clone(),
        format!("  Title:       {}", task.title),
        format!("  ID:          {}", task.id),
        format!("  Status:      {}", task.status),
        format!("  Priority:    {}", task.priority),
        format!("  Description: {description}"),
        format!("  Tags:        {tags}"),
        format!("  Due Date:    {}", opt_local(task.due_date, tz)),
        format!("  Reminder:    {}", opt_local(task.reminder_at, tz)),
        format!("  Recurring:   {recurring}"),
        format!("  Created:     {}", local(task.created_at, tz, "%Y-%m-%d %H:%M")),
        format!("  Updated:     {}", local(task.updated_at, tz, "%Y-%m-%d %H:%M")),
        format!("  Completed:   {}", opt_local(task.completed_at, tz)),
        sep,
    ]
    .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use todo_core::{Priority, RecurrenceRule};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 15, 14, 0, 0).unwrap()
    }

    #[test]
    fn summary_shows_priority_status_and_short_id() {
        let task = Task::new("Buy groceries", now())
            .with_priority(Priority::High)
            .with_due_date(now());
        let line = task_summary(&task, &chrono_tz::UTC);
        assert!(line.contains("[HIGH]"));
        assert!(line.contains("[pending]"));
        assert!(line.contains("Buy groceries"));
        assert!(line.contains("Due: 2025-06-15"));
        assert!(line.contains(&short_id(&task)));
    }

    #[test]
    fn summary_renders_due_date_in_display_timezone() {
        // 2025-06-16 01:00 UTC is still June 15 in Chicago (CDT).
        let due = Utc.with_ymd_and_hms(2025, 6, 16, 1, 0, 0).unwrap();
        let task = Task::new("Late night", now()).with_due_date(due);
        let tz: Tz = "America/Chicago".parse().unwrap();
        assert!(task_summary(&task, &tz).contains("Due: 2025-06-15"));
    }

    #[test]
    fn detail_shows_recurrence_rule_or_no() {
        let recurring = Task::new("Standup", now()).with_recurrence(RecurrenceRule::Daily);
        assert!(task_detail(&recurring, &chrono_tz::UTC).contains("Recurring:   daily"));

        let plain = Task::new("One-off", now());
        assert!(task_detail(&plain, &chrono_tz::UTC).contains("Recurring:   No"));
    }
}
