//! Date input parsing for command-line arguments.

use chrono::{Datelike, Duration, NaiveDate};

/// Parse human-readable date input relative to `today`.
///
/// Supports:
/// - "today", "tomorrow", "yesterday"
/// - "in 3d", "in 2w"
/// - "3d ago", "2w ago"
/// - "monday" .. "sunday" (next occurrence, today included)
/// - "YYYY-MM-DD" format
pub fn parse_date_input(s: &str, today: NaiveDate) -> Option<NaiveDate> {
    let s = s.trim().to_lowercase();

    match s.as_str() {
        "today" => return Some(today),
        "tomorrow" => return today.succ_opt(),
        "yesterday" => return today.pred_opt(),
        _ => {}
    }

    if let Some(rest) = s.strip_prefix("in ") {
        return parse_span(rest).and_then(|d| today.checked_add_signed(d));
    }
    if let Some(rest) = s.strip_suffix(" ago") {
        return parse_span(rest).and_then(|d| today.checked_sub_signed(d));
    }

    let weekdays = [
        "monday", "tuesday", "wednesday", "thursday", "friday", "saturday", "sunday",
    ];
    if let Some(target) = weekdays.iter().position(|d| *d == s) {
        let current = today.weekday().num_days_from_monday() as i64;
        let ahead = (target as i64 + 7 - current) % 7;
        return today.checked_add_signed(Duration::days(ahead));
    }

    NaiveDate::parse_from_str(&s, "%Y-%m-%d").ok()
}

/// "3d" or "2w". `None` when the count does not fit a `Duration`.
fn parse_span(s: &str) -> Option<Duration> {
    let s = s.trim();
    if let Some(n) = s.strip_suffix('d') {
        return n.trim().parse::<i64>().ok().and_then(Duration::try_days);
    }
    if let Some(n) = s.strip_suffix('w') {
        return n.trim().parse::<i64>().ok().and_then(Duration::try_weeks);
    }
    None
}
