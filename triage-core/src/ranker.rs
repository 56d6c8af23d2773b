//! Deterministic ranker: total order from task fields and preference flags.

use chrono::NaiveDate;

use crate::task::Task;
use crate::time::parse_deadline;

/// Stand-in deadline for undated tasks; sorts after every real date.
pub const SENTINEL_DEADLINE: &str = "9999-12-31";

/// Sort tasks by (deadline?, priority?, created_at), skipping disabled keys.
///
/// `sort_by` is stable, so tasks equal on every active key keep input order.
pub fn rank(mut tasks: Vec<Task>, prefer_deadline: bool, prefer_high_priority: bool) -> Vec<Task> {
    let sentinel = parse_deadline(SENTINEL_DEADLINE).unwrap_or(NaiveDate::MAX);
    tasks.sort_by(|a, b| {
        let mut ord = std::cmp::Ordering::Equal;
        if prefer_deadline {
            ord = deadline_key(a, sentinel).cmp(&deadline_key(b, sentinel));
        }
        if prefer_high_priority {
            ord = ord.then_with(|| a.priority.cmp(&b.priority));
        }
        ord.then_with(|| a.created_at.cmp(&b.created_at))
    });
    tasks
}

/// Compared as dates, so unpadded forms like "2024-6-5" order correctly.
fn deadline_key(task: &Task, sentinel: NaiveDate) -> NaiveDate {
    task.deadline_str().and_then(parse_deadline).unwrap_or(sentinel)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(tasks: &[Task]) -> Vec<i64> {
        tasks.iter().map(|t| t.task_id).collect()
    }

    fn sample() -> Vec<Task> {
        vec![
            Task::new(1, "undated, important").with_priority(1).with_created_at("2024-01-01"),
            Task::new(2, "due later").with_priority(2).with_deadline("2024-07-01").with_created_at("2024-01-02"),
            Task::new(3, "due soon").with_priority(4).with_deadline("2024-06-01").with_created_at("2024-01-03"),
            Task::new(4, "oldest").with_priority(5).with_created_at("2023-12-01"),
        ]
    }

    #[test]
    fn test_deadline_then_priority() {
        assert_eq!(ids(&rank(sample(), true, true)), vec![3, 2, 1, 4]);
    }

    #[test]
    fn test_priority_only() {
        assert_eq!(ids(&rank(sample(), false, true)), vec![1, 2, 3, 4]);
    }

    #[test]
    fn test_no_preferences_is_creation_order() {
        assert_eq!(ids(&rank(sample(), false, false)), vec![4, 1, 2, 3]);
    }

    #[test]
    fn test_ties_keep_input_order() {
        let tasks = vec![
            Task::new(10, "a").with_created_at("2024-01-01"),
            Task::new(11, "b").with_created_at("2024-01-01"),
            Task::new(12, "c").with_created_at("2024-01-01"),
        ];
        assert_eq!(ids(&rank(tasks, true, true)), vec![10, 11, 12]);
    }

    #[test]
    fn test_empty_deadline_sorts_last() {
        let tasks = vec![
            Task::new(1, "blank").with_deadline("").with_created_at("2024-01-01"),
            Task::new(2, "dated").with_deadline("2030-01-01").with_created_at("2024-01-02"),
        ];
        assert_eq!(ids(&rank(tasks, true, false)), vec![2, 1]);
    }

    #[test]
    fn test_unparseable_deadline_sorts_with_undated() {
        let tasks = vec![
            Task::new(1, "garbage").with_deadline("someday").with_priority(1).with_created_at("2024-01-01"),
            Task::new(2, "undated").with_priority(2).with_created_at("2024-01-02"),
            Task::new(3, "dated").with_deadline("2031-01-01").with_priority(5).with_created_at("2024-01-03"),
        ];
        assert_eq!(ids(&rank(tasks, true, true)), vec![3, 1, 2]);
    }

    #[test]
    fn test_unpadded_deadline_compares_as_date() {
        let tasks = vec![
            Task::new(1, "december").with_deadline("2024-12-01").with_created_at("2024-01-01"),
            Task::new(2, "june").with_deadline("2024-6-5").with_created_at("2024-01-02"),
        ];
        assert_eq!(ids(&rank(tasks, true, false)), vec![2, 1]);
    }

    #[test]
    fn test_empty_input() {
        assert!(rank(Vec::new(), true, true).is_empty());
    }
}
