//! Remaining work: active tasks that are not excluded by label.

use std::collections::HashSet;

use crate::labels::normalised_label_set;
use crate::task::Task;

/// Recurring daily chores never count as remaining work.
pub const RECURRING_DAILY_LABEL: &str = "daily";

/// The standing exclusion plus the caller's labels, normalised, blanks dropped.
pub fn exclusion_set<S: AsRef<str>>(extra: &[S]) -> HashSet<String> {
    let mut set = normalised_label_set(extra);
    set.insert(RECURRING_DAILY_LABEL.to_string());
    set
}

/// Count tasks carrying none of the excluded labels.
pub fn remaining_work<S: AsRef<str>>(tasks: &[Task], excluded_labels: &[S]) -> usize {
    let excluded = exclusion_set(excluded_labels);
    tasks
        .iter()
        .filter(|t| !t.normalised_labels().any(|l| excluded.contains(&l)))
        .count()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn task(id: &str, labels: &[&str]) -> Task {
        let mut t = Task::new(id, id);
        t.labels = labels.iter().map(|l| l.to_string()).collect();
        t
    }

    fn sample() -> Vec<Task> {
        vec![
            task("1", &[]),
            task("2", &["daily"]),
            task("3", &["@daily", "home"]),
            task("4", &["work"]),
            task("5", &["@noise"]),
        ]
    }

    #[test]
    fn test_daily_excluded_with_empty_list() {
        let none: [&str; 0] = [];
        assert_eq!(remaining_work(&sample(), &none), 3);
    }

    #[test]
    fn test_caller_exclusions_extend_standing_one() {
        assert_eq!(remaining_work(&sample(), &["noise"]), 2);
        assert_eq!(remaining_work(&sample(), &["@noise", "  work "]), 1);
    }

    #[test]
    fn test_blank_exclusions_are_ignored() {
        assert_eq!(remaining_work(&sample(), &["", "@", "   "]), 3);
        assert!(!exclusion_set(&["", "@"]).contains(""));
    }

    #[test]
    fn test_empty_collection() {
        assert_eq!(remaining_work(&[], &["x"]), 0);
    }
}
