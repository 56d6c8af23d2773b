//! Short justifications attached to every ranked task.

use chrono::NaiveDate;

use crate::task::Task;
use crate::time::days_until;

/// Label for reasons produced on the deterministic path.
pub const HEURISTIC_LABEL: &str = "Heuristic";
/// Label for reasons filled in when the advisor gave no `why`.
pub const AI_LABEL: &str = "AI";

/// `"<label>: <due text>; P<priority>; favored <criteria>"`.
pub fn build_reason(
    task: &Task,
    prefer_deadline: bool,
    prefer_high_priority: bool,
    mode_label: &str,
    today: NaiveDate,
) -> String {
    let due = due_text(days_until(task.deadline_str(), today));

    let mut favored = Vec::new();
    if prefer_deadline {
        favored.push("deadline");
    }
    if prefer_high_priority {
        favored.push("priority");
    }
    let favored = if favored.is_empty() {
        "recency".to_string()
    } else {
        favored.join(", ")
    };

    format!("{mode_label}: {due}; P{}; favored {favored}", task.priority)
}

fn due_text(days: Option<i64>) -> String {
    match days {
        None => "no deadline".to_string(),
        Some(0) => "due today".to_string(),
        Some(n) if n < 0 => format!("overdue by {}", plural_days(-n)),
        Some(n) => format!("due in {}", plural_days(n)),
    }
}

fn plural_days(n: i64) -> String {
    if n == 1 {
        "1 day".to_string()
    } else {
        format!("{n} days")
    }
}
