//! Completion statistics: per-day completion counts with a trailing moving average.
//!
//! Completions are bucketed by the calendar date of their timestamp as recorded;
//! no timezone conversion happens here. The output always covers every day of the
//! requested window, zero-count days included, so it can be charted directly.

use std::collections::HashMap;

use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::task::CompletedTask;

/// An inclusive range of calendar days.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompletionWindow {
    pub since: NaiveDate,
    pub until: NaiveDate,
}

impl CompletionWindow {
    pub fn new(since: NaiveDate, until: NaiveDate) -> Self {
        CompletionWindow { since, until }
    }

    /// The `days`-long window ending on `until`. Zero days gives an empty window.
    ///
    /// Returns `None` when the first day would fall before the earliest
    /// representable date.
    pub fn ending_on(until: NaiveDate, days: u32) -> Option<Self> {
        let back = Duration::try_days(i64::from(days) - 1)?;
        let since = until.checked_sub_signed(back)?;
        Some(CompletionWindow::new(since, until))
    }

    /// Number of days in the window; 0 when `since` is after `until`.
    pub fn len_days(&self) -> usize {
        ((self.until - self.since).num_days() + 1).max(0) as usize
    }

    pub fn contains(&self, day: NaiveDate) -> bool {
        self.since <= day && day <= self.until
    }

    /// Every day of the window in ascending order.
    pub fn days(&self) -> impl Iterator<Item = NaiveDate> {
        let since = self.since;
        (0..self.len_days()).map(move |i| since + Duration::days(i as i64))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailyCompletionCount {
    pub date: NaiveDate,
    pub count: usize,
    pub moving_average: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatsSummary {
    pub total: usize,
    pub days: usize,
    pub mean_per_day: f64,
    /// First day holding the highest count; absent when nothing was completed.
    pub best_day: Option<NaiveDate>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompletionStats {
    pub daily: Vec<DailyCompletionCount>,
    pub summary: StatsSummary,
}

/// Bucket completions by day over `window` and attach a trailing moving average.
///
/// The average for a day is the mean over the `span` days ending on it, clipped at
/// `window.since`, so the first days average over fewer samples. A span of 0 is
/// treated as 1. Events outside the window are ignored.
pub fn completion_stats(
    completed: &[CompletedTask],
    window: CompletionWindow,
    span: u32,
) -> CompletionStats {
    let mut buckets: HashMap<NaiveDate, usize> = HashMap::new();
    for event in completed {
        let day = event.completed_on();
        if window.contains(day) {
            *buckets.entry(day).or_default() += 1;
        }
    }

    let counts: Vec<(NaiveDate, usize)> = window
        .days()
        .map(|d| (d, buckets.get(&d).copied().unwrap_or(0)))
        .collect();

    let span = span.max(1) as usize;
    let mut running = 0usize;
    let mut daily = Vec::with_capacity(counts.len());
    for (i, &(date, count)) in counts.iter().enumerate() {
        running += count;
        if i >= span {
            running -= counts[i - span].1;
        }
        let samples = (i + 1).min(span);
        daily.push(DailyCompletionCount {
            date,
            count,
            moving_average: running as f64 / samples as f64,
        });
    }

    let summary = summarise(&daily);
    CompletionStats { daily, summary }
}

fn summarise(daily: &[DailyCompletionCount]) -> StatsSummary {
    let total: usize = daily.iter().map(|d| d.count).sum();
    let days = daily.len();
    let mean_per_day = if days == 0 { 0.0 } else { total as f64 / days as f64 };
    let mut best: Option<&DailyCompletionCount> = None;
    for d in daily.iter().filter(|d| d.count > 0) {
        if best.map_or(true, |b| d.count > b.count) {
            best = Some(d);
        }
    }
    StatsSummary {
        total,
        days,
        mean_per_day,
        best_day: best.map(|d| d.date),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn done_on(day: NaiveDate, hour: u32) -> CompletedTask {
        CompletedTask {
            id: format!("{day}-{hour}"),
            content: "done".into(),
            completed_at: day.and_hms_opt(hour, 15, 0).unwrap(),
            labels: vec![],
        }
    }

    fn averages(stats: &CompletionStats) -> Vec<f64> {
        stats.daily.iter().map(|d| d.moving_average).collect()
    }

    #[test]
    fn test_partial_window_average() {
        let since = date(2024, 3, 1);
        let events = vec![done_on(since, 9), done_on(since, 17), done_on(date(2024, 3, 3), 8)];
        let stats = completion_stats(&events, CompletionWindow::new(since, date(2024, 3, 3)), 7);
        let counts: Vec<usize> = stats.daily.iter().map(|d| d.count).collect();
        assert_eq!(counts, vec![2, 0, 1]);
        assert_eq!(averages(&stats), vec![2.0, 1.0, 1.0]);
        assert_eq!(stats.summary.total, 3);
        assert_eq!(stats.summary.best_day, Some(since));
    }

    #[test]
    fn test_span_slides() {
        let since = date(2024, 3, 1);
        let events: Vec<CompletedTask> = [4, 2, 0, 6]
            .iter()
            .enumerate()
            .flat_map(|(i, &n)| (0..n).map(move |h| done_on(since + Duration::days(i as i64), h)))
            .collect();
        let stats = completion_stats(&events, CompletionWindow::new(since, date(2024, 3, 4)), 2);
        assert_eq!(averages(&stats), vec![4.0, 3.0, 1.0, 3.0]);
    }

    #[test]
    fn test_empty_input_is_all_zero() {
        let window = CompletionWindow::new(date(2024, 2, 27), date(2024, 3, 2));
        let stats = completion_stats(&[], window, 7);
        assert_eq!(stats.daily.len(), 5);
        assert!(stats.daily.iter().all(|d| d.count == 0 && d.moving_average == 0.0));
        assert_eq!(stats.summary.total, 0);
        assert_eq!(stats.summary.best_day, None);
    }

    #[test]
    fn test_single_day_window() {
        let day = date(2024, 3, 1);
        let events = vec![done_on(day, 1), done_on(day, 2), done_on(day, 3)];
        let stats = completion_stats(&events, CompletionWindow::new(day, day), 7);
        assert_eq!(stats.daily.len(), 1);
        assert_eq!(stats.daily[0].count, 3);
        assert_eq!(stats.daily[0].moving_average, 3.0);
    }

    #[test]
    fn test_events_outside_window_ignored() {
        let events = vec![done_on(date(2024, 2, 29), 12), done_on(date(2024, 3, 2), 12)];
        let stats = completion_stats(&events, CompletionWindow::new(date(2024, 3, 1), date(2024, 3, 1)), 7);
        assert_eq!(stats.summary.total, 0);
    }

    #[test]
    fn test_inverted_window_is_empty() {
        let stats = completion_stats(&[], CompletionWindow::new(date(2024, 3, 2), date(2024, 3, 1)), 7);
        assert!(stats.daily.is_empty());
        assert_eq!(stats.summary.mean_per_day, 0.0);
    }

    #[test]
    fn test_window_ending_on() {
        let w = CompletionWindow::ending_on(date(2024, 3, 14), 14).unwrap();
        assert_eq!(w.since, date(2024, 3, 1));
        assert_eq!(w.len_days(), 14);
        assert_eq!(CompletionWindow::ending_on(date(2024, 3, 14), 0).unwrap().len_days(), 0);
    }

    #[test]
    fn test_window_past_date_range() {
        assert_eq!(CompletionWindow::ending_on(date(2024, 3, 6), 200_000_000), None);
        assert_eq!(CompletionWindow::ending_on(date(2024, 3, 6), u32::MAX), None);
        let earliest = CompletionWindow::ending_on(NaiveDate::MIN, 1).unwrap();
        assert_eq!(earliest.since, NaiveDate::MIN);
        assert_eq!(CompletionWindow::ending_on(NaiveDate::MIN, 2), None);
    }

    proptest! {
        #[test]
        fn sequence_is_contiguous(start in 0i64..3000, len in 1i64..120, hits in proptest::collection::vec(0i64..150, 0..60)) {
            let since = date(2020, 1, 1) + Duration::days(start);
            let until = since + Duration::days(len - 1);
            let events: Vec<CompletedTask> = hits.iter().map(|&o| done_on(since + Duration::days(o), 10)).collect();
            let stats = completion_stats(&events, CompletionWindow::new(since, until), 7);
            prop_assert_eq!(stats.daily.len() as i64, len);
            prop_assert_eq!(stats.daily[0].date, since);
            for pair in stats.daily.windows(2) {
                prop_assert_eq!(pair[1].date, pair[0].date + Duration::days(1));
            }
            let inside = hits.iter().filter(|&&o| o < len).count();
            prop_assert_eq!(stats.summary.total, inside);
        }
    }
}
