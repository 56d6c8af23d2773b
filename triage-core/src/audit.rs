//! One audit row per prioritization call. The sink itself belongs to the caller.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::engine::OrderingResult;
use crate::preferences::Preferences;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditRecord {
    pub timestamp: String,
    pub mode: String,
    pub provider: String,
    pub model: String,
    pub prefer_deadline: bool,
    pub prefer_high_priority: bool,
    /// Space-separated task ids in result order.
    pub order: String,
    pub count: usize,
}

impl AuditRecord {
    pub fn new(result: &OrderingResult, prefs: &Preferences, at: DateTime<Utc>) -> Self {
        let order = result
            .ids()
            .iter()
            .map(|id| id.to_string())
            .collect::<Vec<_>>()
            .join(" ");

        Self {
            timestamp: at.to_rfc3339(),
            mode: result.mode.to_string(),
            provider: result.provider.clone().unwrap_or_default(),
            model: result.model.clone().unwrap_or_default(),
            prefer_deadline: prefs.prefer_deadline,
            prefer_high_priority: prefs.prefer_high_priority,
            order,
            count: result.ordered_tasks.len(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::Mode;
    use crate::task::Task;
    use chrono::TimeZone;

    #[test]
    fn test_record_from_fallback_result() {
        let result = OrderingResult {
            ordered_tasks: vec![Task::new(2, "b"), Task::new(1, "a")],
            mode: Mode::Heuristic,
            provider: Some("openrouter".into()),
            model: Some("openai/gpt-4o-mini".into()),
        };
        let at = Utc.with_ymd_and_hms(2024, 5, 30, 9, 0, 0).unwrap();
        let rec = AuditRecord::new(&result, &Preferences::new(true, false), at);

        assert_eq!(rec.timestamp, "2024-05-30T09:00:00+00:00");
        assert_eq!(rec.mode, "heuristic");
        assert_eq!(rec.provider, "openrouter");
        assert_eq!(rec.order, "2 1");
        assert_eq!(rec.count, 2);
        assert!(rec.prefer_deadline);
        assert!(!rec.prefer_high_priority);
    }
}
