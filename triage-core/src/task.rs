//! Task model consumed by the prioritization engine.
//!
//! Tasks are owned by the caller's store; the engine only writes `reason`.

use serde::{Deserialize, Deserializer, Serialize};

/// Priority assumed when a record carries none.
pub const DEFAULT_PRIORITY: i64 = 3;

fn default_priority() -> i64 {
    DEFAULT_PRIORITY
}

/// `null` reads the same as a missing field.
fn priority_or_default<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<i64>::deserialize(deserializer)?.unwrap_or(DEFAULT_PRIORITY))
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub task_id: i64,
    pub description: String,

    /// Smaller is more urgent.
    #[serde(default = "default_priority", deserialize_with = "priority_or_default")]
    pub priority: i64,

    /// ISO `YYYY-MM-DD`. Empty strings are treated like `None`.
    #[serde(default)]
    pub deadline: Option<String>,

    /// Creation timestamp, compared as a string.
    #[serde(default)]
    pub created_at: String,

    /// Why the task sits where it does in the last ordering.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl Task {
    pub fn new(task_id: i64, description: impl Into<String>) -> Self {
        Self {
            task_id,
            description: description.into(),
            priority: DEFAULT_PRIORITY,
            deadline: None,
            created_at: String::new(),
            reason: None,
        }
    }

    pub fn with_priority(mut self, priority: i64) -> Self {
        self.priority = priority;
        self
    }

    pub fn with_deadline(mut self, deadline: impl Into<String>) -> Self {
        self.deadline = Some(deadline.into());
        self
    }

    pub fn with_created_at(mut self, created_at: impl Into<String>) -> Self {
        self.created_at = created_at.into();
        self
    }

    /// Deadline with blank values filtered out.
    pub fn deadline_str(&self) -> Option<&str> {
        self.deadline
            .as_deref()
            .map(str::trim)
            .filter(|d| !d.is_empty())
    }
}
