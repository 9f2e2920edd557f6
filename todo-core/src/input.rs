//! Validation and parsing for console-entered task fields.

use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};
use chrono_tz::Tz;
use thiserror::Error;

use crate::recurrence::RecurrenceError;
use crate::task::{Priority, TaskStatus};

pub const MAX_TITLE_LEN: usize = 200;
pub const MAX_DESCRIPTION_LEN: usize = 2000;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum InputError {
    #[error("title cannot be empty")]
    EmptyTitle,

    #[error("title cannot exceed {MAX_TITLE_LEN} characters")]
    TitleTooLong,

    #[error("description cannot exceed {MAX_DESCRIPTION_LEN} characters")]
    DescriptionTooLong,

    #[error("invalid priority: '{0}'. Choose from: low, medium, high")]
    InvalidPriority(String),

    #[error("invalid status: '{0}'. Choose from: pending, in_progress, completed")]
    InvalidStatus(String),

    #[error("invalid sort key: '{0}'. Choose from: created_at, title, priority, due_date, status")]
    InvalidSortKey(String),

    #[error("invalid date format: '{0}'. Use YYYY-MM-DD or YYYY-MM-DD HH:MM")]
    InvalidDate(String),

    #[error("invalid timezone: {0}")]
    InvalidTimezone(String),

    #[error("ambiguous or invalid local time (DST?): {0}")]
    AmbiguousLocalTime(String),

    #[error("a recurring task needs a recurrence rule")]
    MissingRecurrenceRule,

    #[error(transparent)]
    Recurrence(#[from] RecurrenceError),
}

/// Trim and length-check a title.
pub fn validate_title(title: &str) -> Result<String, InputError> {
    let title = title.trim();
    if title.is_empty() {
        return Err(InputError::EmptyTitle);
    }
    if title.chars().count() > MAX_TITLE_LEN {
        return Err(InputError::TitleTooLong);
    }
    Ok(title.to_string())
}

pub fn validate_description(description: &str) -> Result<String, InputError> {
    let description = description.trim();
    if description.chars().count() > MAX_DESCRIPTION_LEN {
        return Err(InputError::DescriptionTooLong);
    }
    Ok(description.to_string())
}

pub fn parse_priority(value: &str) -> Result<Priority, InputError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "low" => Ok(Priority::Low),
        "medium" => Ok(Priority::Medium),
        "high" => Ok(Priority::High),
        other => Err(InputError::InvalidPriority(other.to_string())),
    }
}

pub fn parse_status(value: &str) -> Result<TaskStatus, InputError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "pending" => Ok(TaskStatus::Pending),
        "in_progress" => Ok(TaskStatus::InProgress),
        "completed" => Ok(TaskStatus::Completed),
        other => Err(InputError::InvalidStatus(other.to_string())),
    }
}

/// Split comma-separated tags, trimming and deduplicating while preserving
/// first-occurrence order.
pub fn parse_tags(value: &str) -> Vec<String> {
    let mut tags: Vec<String> = Vec::new();
    for tag in value.split(',') {
        let tag = tag.trim();
        if tag.is_empty() {
            continue;
        }
        if !tags.iter().any(|t| t == tag) {
            tags.push(tag.to_string());
        }
    }
    tags
}

/// Parse a local datetime like "2025-06-15 09:00" (or a bare "2025-06-15",
/// taken as midnight) in an IANA tz like "America/Chicago", returning UTC.
/// Empty input means "no date". Local times made ambiguous or nonexistent
/// by DST transitions are rejected.
pub fn parse_local_datetime(value: &str, tz: &str) -> Result<Option<DateTime<Utc>>, InputError> {
    let value = value.trim();
    if value.is_empty() {
        return Ok(None);
    }

    let tz: Tz = tz
        .parse()
        .map_err(|_| InputError::InvalidTimezone(tz.to_string()))?;

    let ndt = parse_naive(value).ok_or_else(|| InputError::InvalidDate(value.to_string()))?;

    let local = tz
        .from_local_datetime(&ndt)
        .single()
        .ok_or_else(|| InputError::AmbiguousLocalTime(format!("{value} {tz}")))?;

    Ok(Some(local.with_timezone(&Utc)))
}

fn parse_naive(value: &str) -> Option<NaiveDateTime> {
    if let Ok(ndt) = NaiveDateTime::parse_from_str(value, "%Y-%m-%d %H:%M") {
        return Some(ndt);
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn title_is_trimmed() {
        assert_eq!(validate_title("  Buy milk  ").unwrap(), "Buy milk");
    }

    #[test]
    fn blank_title_is_rejected() {
        assert_eq!(validate_title("   "), Err(InputError::EmptyTitle));
    }

    #[test]
    fn overlong_title_is_rejected() {
        let long = "x".repeat(MAX_TITLE_LEN + 1);
        assert_eq!(validate_title(&long), Err(InputError::TitleTooLong));
    }

    #[test]
    fn overlong_description_is_rejected() {
        let long = "x".repeat(MAX_DESCRIPTION_LEN + 1);
        assert_eq!(
            validate_description(&long),
            Err(InputError::DescriptionTooLong)
        );
    }

    #[test]
    fn priority_and_status_tokens() {
        assert_eq!(parse_priority(" High "), Ok(Priority::High));
        assert_eq!(parse_status("in_progress"), Ok(TaskStatus::InProgress));
        assert!(matches!(
            parse_priority("urgent"),
            Err(InputError::InvalidPriority(_))
        ));
        assert!(matches!(
            parse_status("done"),
            Err(InputError::InvalidStatus(_))
        ));
    }

    #[test]
    fn tags_are_deduplicated_in_order() {
        assert_eq!(
            parse_tags("work, home, work , , errands"),
            vec!["work", "home", "errands"]
        );
        assert!(parse_tags("  ").is_empty());
    }

    #[test]
    fn parses_local_datetime_to_utc() {
        // June is CDT (UTC-5).
        let utc = parse_local_datetime("2025-06-15 09:00", "America/Chicago")
            .unwrap()
            .unwrap();
        assert_eq!(utc.to_rfc3339(), "2025-06-15T14:00:00+00:00");
    }

    #[test]
    fn bare_date_means_midnight() {
        let utc = parse_local_datetime("2025-06-15", "UTC").unwrap().unwrap();
        assert_eq!(utc.to_rfc3339(), "2025-06-15T00:00:00+00:00");
    }

    #[test]
    fn empty_date_means_none() {
        assert_eq!(parse_local_datetime("  ", "UTC"), Ok(None));
    }

    #[test]
    fn bad_date_format_is_rejected() {
        assert!(matches!(
            parse_local_datetime("15/06/2025", "UTC"),
            Err(InputError::InvalidDate(_))
        ));
    }

    #[test]
    fn bad_timezone_is_rejected() {
        assert!(matches!(
            parse_local_datetime("2025-06-15", "Mars/Olympus"),
            Err(InputError::InvalidTimezone(_))
        ));
    }

    #[test]
    fn dst_gap_is_rejected() {
        // 2:30 AM on the spring-forward date does not exist in Chicago.
        assert!(matches!(
            parse_local_datetime("2025-03-09 02:30", "America/Chicago"),
            Err(InputError::AmbiguousLocalTime(_))
        ));
    }
}
