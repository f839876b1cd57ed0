//! Due date parsing and formatting helpers.

use chrono::{Datelike, Duration, Local, NaiveDate};

/// The local calendar date, i.e. now truncated to midnight.
pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// Parse human-readable due date input relative to `today`.
///
/// Supports:
/// - "today", "tomorrow", "yesterday"
/// - weekday names ("fri", "friday"), "this friday", "next monday"
/// - "in 3d", "in 2w"
/// - "YYYY-MM-DD" format
pub fn parse_due_input(s: &str, today: NaiveDate) -> Option<NaiveDate> {
    let s = s.trim().to_lowercase();

    match s.as_str() {
        "today" => return Some(today),
        "tomorrow" => return Some(today + Duration::days(1)),
        "yesterday" => return Some(today - Duration::days(1)),
        _ => {}
    }

    if let Some(rest) = s.strip_prefix("in ") {
        if let Some(nd) = rest.strip_suffix('d') {
            if let Ok(days) = nd.trim().parse::<i64>() {
                return Some(today + Duration::days(days));
            }
        }
        if let Some(nw) = rest.strip_suffix('w') {
            if let Ok(weeks) = nw.trim().parse::<i64>() {
                return Some(today + Duration::weeks(weeks));
            }
        }
    }

    let weekdays = [
        ("monday", 0), ("tuesday", 1), ("wednesday", 2), ("thursday", 3),
        ("friday", 4), ("saturday", 5), ("sunday", 6),
        ("mon", 0), ("tue", 1), ("wed", 2), ("thu", 3),
        ("fri", 4), ("sat", 5), ("sun", 6),
    ];

    let current_day = today.weekday().num_days_from_monday() as i64;
    for (day_name, target_day) in weekdays {
        let days_ahead = (target_day + 7 - current_day) % 7;

        if s == day_name || s == format!("this {day_name}") {
            return Some(today + Duration::days(days_ahead));
        }

        if s == format!("next {day_name}") {
            let days_to_add = if days_ahead == 0 { 7 } else { days_ahead + 7 };
            return Some(today + Duration::days(days_to_add));
        }
    }

    NaiveDate::parse_from_str(&s, "%Y-%m-%d").ok()
}

/// Format a due date relative to today ("today", "tomorrow", "in 3d", "2d late").
pub fn format_due_relative(due: Option<NaiveDate>, today: NaiveDate) -> String {
    match due {
        None => "-".into(),
        Some(d) => {
            let delta = (d - today).num_days();
            if delta == 0 {
                "today".into()
            } else if delta == 1 {
                "tomorrow".into()
            } else if delta > 1 {
                format!("in {delta}d")
            } else {
                format!("{}d late", -delta)
            }
        }
    }
}

/// Truncate a string to a maximum width, adding ellipsis if needed.
pub fn truncate(s: &str, width: usize) -> String {
    if s.chars().count() <= width {
        s.to_string()
    } else {
        let mut out: String = s.chars().take(width.saturating_sub(1)).collect();
        out.push('…');
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // 2024-05-15 is a Wednesday.
    fn wednesday() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 5, 15).unwrap()
    }

    #[test]
    fn test_parse_relative_words() {
        let today = wednesday();
        assert_eq!(parse_due_input("Today", today), Some(today));
        assert_eq!(parse_due_input("tomorrow", today), NaiveDate::from_ymd_opt(2024, 5, 16));
        assert_eq!(parse_due_input(" yesterday ", today), NaiveDate::from_ymd_opt(2024, 5, 14));
        assert_eq!(parse_due_input("in 3d", today), NaiveDate::from_ymd_opt(2024, 5, 18));
        assert_eq!(parse_due_input("in 2w", today), NaiveDate::from_ymd_opt(2024, 5, 29));
    }

    #[test]
    fn test_parse_weekdays() {
        let today = wednesday();
        assert_eq!(parse_due_input("fri", today), NaiveDate::from_ymd_opt(2024, 5, 17));
        assert_eq!(parse_due_input("wednesday", today), Some(today));
        assert_eq!(parse_due_input("next wednesday", today), NaiveDate::from_ymd_opt(2024, 5, 22));
        assert_eq!(parse_due_input("next monday", today), NaiveDate::from_ymd_opt(2024, 5, 27));
    }

    #[test]
    fn test_parse_iso_and_garbage() {
        let today = wednesday();
        assert_eq!(parse_due_input("2025-01-31", today), NaiveDate::from_ymd_opt(2025, 1, 31));
        assert_eq!(parse_due_input("someday", today), None);
    }

    #[test]
    fn test_format_due_relative() {
        let today = wednesday();
        assert_eq!(format_due_relative(None, today), "-");
        assert_eq!(format_due_relative(Some(today), today), "today");
        assert_eq!(format_due_relative(parse_due_input("in 4d", today), today), "in 4d");
        assert_eq!(format_due_relative(parse_due_input("yesterday", today), today), "1d late");
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("a longer title", 6), "a lon…");
    }
}
