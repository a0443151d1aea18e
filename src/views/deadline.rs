//! Deadline display: a relative label and an urgency bucket for a deadline.

use chrono::NaiveDate;
use serde::Serialize;

use crate::fields::Urgency;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeadlineDisplay {
    pub label: String,
    pub urgency: Urgency,
    /// Whole calendar days from today to the deadline, negative when past.
    pub days: i64,
}

/// Classify `deadline` against `today`.
///
/// Labels read "today", "in N days" or "N days ago", except that a distance of
/// exactly one day is singular: "in 1 day", "1 day ago".
pub fn classify_deadline(deadline: NaiveDate, today: NaiveDate) -> DeadlineDisplay {
    let days = (deadline - today).num_days();
    let (label, urgency) = match days {
        d if d < 0 => (format!("{} {} ago", -d, day_word(-d)), Urgency::Overdue),
        0 => ("today".to_string(), Urgency::DueToday),
        1..=3 => (format!("in {} {}", days, day_word(days)), Urgency::Imminent),
        4..=7 => (format!("in {days} days"), Urgency::Soon),
        _ => (format!("in {days} days"), Urgency::Distant),
    };
    DeadlineDisplay { label, urgency, days }
}

fn day_word(n: i64) -> &'static str {
    if n == 1 {
        "day"
    } else {
        "days"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn at(offset: i64) -> DeadlineDisplay {
        let today = NaiveDate::from_ymd_opt(2024, 2, 27).unwrap();
        classify_deadline(today + Duration::days(offset), today)
    }

    #[test]
    fn test_boundaries() {
        assert_eq!(at(-2).label, "2 days ago");
        assert_eq!(at(-2).urgency, Urgency::Overdue);
        assert_eq!(at(0).label, "today");
        assert_eq!(at(0).urgency, Urgency::DueToday);
        assert_eq!(at(2).label, "in 2 days");
        assert_eq!(at(2).urgency, Urgency::Imminent);
        assert_eq!(at(5).label, "in 5 days");
        assert_eq!(at(5).urgency, Urgency::Soon);
        assert_eq!(at(15).label, "in 15 days");
        assert_eq!(at(15).urgency, Urgency::Distant);
    }

    #[test]
    fn test_threshold_edges() {
        assert_eq!(at(3).urgency, Urgency::Imminent);
        assert_eq!(at(4).urgency, Urgency::Soon);
        assert_eq!(at(7).urgency, Urgency::Soon);
        assert_eq!(at(8).urgency, Urgency::Distant);
        assert_eq!(at(-1).urgency, Urgency::Overdue);
    }

    #[test]
    fn test_singular_day() {
        assert_eq!(at(1).label, "in 1 day");
        assert_eq!(at(-1).label, "1 day ago");
    }

    #[test]
    fn test_across_month_boundary() {
        // 2024 is a leap year.
        let display = at(3);
        assert_eq!(display.days, 3);
        assert_eq!(display.label, "in 3 days");
    }
}
