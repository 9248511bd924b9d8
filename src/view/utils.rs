//! Utility functions for rendering UI components

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use ratatui::layout::Rect;

/// Parse a backend timestamp. Empty or unparseable values map to the Unix epoch.
pub fn parse_timestamp(since: &str) -> DateTime<Utc> {
    let since = since.trim();
    if let Ok(parsed) = DateTime::parse_from_rfc3339(since) {
        return parsed.with_timezone(&Utc);
    }
    if let Ok(parsed) = NaiveDateTime::parse_from_str(since, "%Y-%m-%dT%H:%M:%S%.f") {
        return parsed.and_utc();
    }
    if let Some(midnight) = NaiveDate::parse_from_str(since, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
    {
        return midnight.and_utc();
    }
    DateTime::<Utc>::UNIX_EPOCH
}

/// Human friendly age of a submission, e.g. "3 hours ago"
pub fn time_ago(since: &str, now: DateTime<Utc>) -> String {
    let ms = (now - parse_timestamp(since)).num_milliseconds();
    if ms < 0 {
        return "in the future".to_string();
    }

    let seconds = ms / 1000;
    let minutes = seconds / 60;
    let hours = minutes / 60;
    let days = hours / 24;
    let weeks = days / 7;

    if seconds < 10 {
        "just now".to_string()
    } else if seconds < 60 {
        "a few seconds ago".to_string()
    } else if minutes == 1 {
        "a minute ago".to_string()
    } else if minutes < 60 {
        format!("{minutes} minutes ago")
    } else if hours == 1 {
        "an hour ago".to_string()
    } else if hours < 24 {
        format!("{hours} hours ago")
    } else if days == 1 {
        "yesterday".to_string()
    } else if days < 7 {
        format!("{days} days ago")
    } else if weeks == 1 {
        "last week".to_string()
    } else {
        format!("{weeks} weeks ago")
    }
}

/// Submitter address with the organisation's own domain left off
pub fn display_submitter<'a>(submitted_by: &'a str, hidden_domain: Option<&str>) -> &'a str {
    hidden_domain
        .filter(|domain| !domain.is_empty())
        .and_then(|domain| submitted_by.strip_suffix(domain))
        .unwrap_or(submitted_by)
}

pub fn truncate_string(s: &str, max_width: usize) -> String {
    if s.chars().count() > max_width {
        let truncated: String = s.chars().take(max_width.saturating_sub(3)).collect();
        format!("{:<width$}", format!("{}...", truncated), width = max_width)
    } else {
        format!("{:<width$}", s, width = max_width)
    }
}

/// Popup rectangle centred in `area`, clamped to fit
pub fn centered_rect(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width.saturating_sub(4));
    let height = height.min(area.height.saturating_sub(2));
    Rect {
        x: area.x + area.width.saturating_sub(width) / 2,
        y: area.y + area.height.saturating_sub(height) / 2,
        width,
        height,
    }
}
