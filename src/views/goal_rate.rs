//! Goal rate: what share of goal tasks are ongoing (non-milestone) goals.

use serde::Serialize;

use crate::task::Task;

/// Label marking a goal as incremental rather than a one-off milestone.
pub const NON_MILESTONE_LABEL: &str = "non-milestone";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct GoalRate {
    pub goal_count: usize,
    pub non_milestone_count: usize,
    /// `non_milestone_count / goal_count` as a whole percentage, 0 when there are no goals.
    pub percentage: u8,
}

/// Compute the goal rate over tasks already filtered to goals.
///
/// Every input task counts as a goal; the `goal` label itself is not checked.
pub fn goal_rate(goals: &[Task]) -> GoalRate {
    let goal_count = goals.len();
    let non_milestone_count = goals
        .iter()
        .filter(|t| t.has_label(NON_MILESTONE_LABEL))
        .count();
    GoalRate {
        goal_count,
        non_milestone_count,
        percentage: rounded_percentage(non_milestone_count, goal_count),
    }
}

/// `part / whole * 100`, rounded half up, in integer arithmetic.
fn rounded_percentage(part: usize, whole: usize) -> u8 {
    if whole == 0 {
        return 0;
    }
    let pct = (part * 200 + whole) / (whole * 2);
    pct.min(100) as u8
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn labelled(id: &str, labels: &[&str]) -> Task {
        let mut t = Task::new(id, format!("goal {id}"));
        t.labels = labels.iter().map(|l| l.to_string()).collect();
        t
    }

    #[test]
    fn test_goal_rate_example() {
        let goals = vec![
            labelled("1", &["goal", "non-milestone"]),
            labelled("2", &["goal"]),
            labelled("3", &["@non-milestone", "goal"]),
        ];
        assert_eq!(
            goal_rate(&goals),
            GoalRate { goal_count: 3, non_milestone_count: 2, percentage: 67 }
        );
    }

    #[test]
    fn test_goal_rate_empty() {
        assert_eq!(
            goal_rate(&[]),
            GoalRate { goal_count: 0, non_milestone_count: 0, percentage: 0 }
        );
    }

    #[test]
    fn test_rounding_half_up() {
        assert_eq!(rounded_percentage(1, 8), 13); // 12.5
        assert_eq!(rounded_percentage(1, 3), 33);
        assert_eq!(rounded_percentage(1, 200), 1); // 0.5
        assert_eq!(rounded_percentage(4, 4), 100);
    }

    proptest! {
        #[test]
        fn goal_rate_is_bounded(flags in proptest::collection::vec(any::<bool>(), 0..40)) {
            let goals: Vec<Task> = flags
                .iter()
                .enumerate()
                .map(|(i, &nm)| {
                    if nm { labelled(&i.to_string(), &["goal", "non-milestone"]) }
                    else { labelled(&i.to_string(), &["goal"]) }
                })
                .collect();
            let rate = goal_rate(&goals);
            prop_assert_eq!(rate.goal_count, flags.len());
            prop_assert!(rate.non_milestone_count <= rate.goal_count);
            prop_assert!(rate.percentage <= 100);
            if goals.is_empty() {
                prop_assert_eq!(rate.percentage, 0);
            }
        }
    }
}
