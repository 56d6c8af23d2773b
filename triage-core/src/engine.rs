//! Prioritization orchestrator.
//!
//! One call = one snapshot of tasks and preferences. The remote advisor gets a
//! single attempt; every failure mode lands on the deterministic ranker, so the
//! caller always receives a complete, annotated ordering.

use std::fmt;
use std::time::Duration;

use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::advisor::{apply_ranking, request_ranking};
use crate::error::AdvisorError;
use crate::preferences::{PreferenceSource, Preferences};
use crate::provider::{DEFAULT_TIMEOUT, TextGenerationProvider};
use crate::ranker::rank;
use crate::reason::{HEURISTIC_LABEL, build_reason};
use crate::task::Task;

/// How an ordering was produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    Ai,
    Heuristic,
}

impl Mode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Mode::Ai => "ai",
            Mode::Heuristic => "heuristic",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderingResult {
    pub ordered_tasks: Vec<Task>,
    pub mode: Mode,
    /// Provider that produced, or was tried for, this ordering.
    pub provider: Option<String>,
    pub model: Option<String>,
}

impl OrderingResult {
    pub fn ids(&self) -> Vec<i64> {
        self.ordered_tasks.iter().map(|t| t.task_id).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.ordered_tasks.is_empty()
    }
}

/// Orchestrates the advisor and the deterministic fallback.
pub struct Prioritizer {
    provider: Option<Box<dyn TextGenerationProvider>>,
    timeout: Duration,
}

impl Prioritizer {
    pub fn new(provider: Option<Box<dyn TextGenerationProvider>>) -> Self {
        Self {
            provider,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// A prioritizer that never calls out.
    pub fn heuristic_only() -> Self {
        Self::new(None)
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn provider_name(&self) -> Option<&str> {
        self.provider.as_deref().map(|p| p.name())
    }

    /// Order `tasks` using today's local date for deadline math.
    pub fn prioritize(&self, tasks: Vec<Task>, prefs: &dyn PreferenceSource) -> OrderingResult {
        self.prioritize_on(tasks, prefs, Local::now().date_naive())
    }

    pub fn prioritize_on(
        &self,
        tasks: Vec<Task>,
        prefs: &dyn PreferenceSource,
        today: NaiveDate,
    ) -> OrderingResult {
        if tasks.is_empty() {
            return OrderingResult {
                ordered_tasks: Vec::new(),
                mode: Mode::Heuristic,
                provider: None,
                model: None,
            };
        }

        let prefs = prefs.preferences();
        let provider = self.provider.as_deref();
        let attempted = provider.map(|p| (p.name().to_string(), p.model().to_string()));

        let remote = request_ranking(provider, &tasks, &prefs, today, self.timeout)
            .and_then(|ranking| apply_ranking(tasks.clone(), &ranking, &prefs, today));

        let (provider, model) = match attempted {
            Some((p, m)) => (Some(p), Some(m)),
            None => (None, None),
        };

        match remote {
            Ok(ordered_tasks) => {
                info!(
                    provider = provider.as_deref().unwrap_or_default(),
                    count = ordered_tasks.len(),
                    "remote ranking accepted"
                );
                OrderingResult {
                    ordered_tasks,
                    mode: Mode::Ai,
                    provider,
                    model,
                }
            }
            Err(e) => {
                log_fallback(&e);
                OrderingResult {
                    ordered_tasks: heuristic_order(tasks, &prefs, today),
                    mode: Mode::Heuristic,
                    provider,
                    model,
                }
            }
        }
    }
}

impl fmt::Debug for Prioritizer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Prioritizer")
            .field("provider", &self.provider_name())
            .field("timeout", &self.timeout)
            .finish()
    }
}

/// Deterministic ranking with a reason on every task.
pub fn heuristic_order(tasks: Vec<Task>, prefs: &Preferences, today: NaiveDate) -> Vec<Task> {
    let mut ordered = rank(tasks, prefs.prefer_deadline, prefs.prefer_high_priority);
    for t in ordered.iter_mut() {
        t.reason = Some(build_reason(
            t,
            prefs.prefer_deadline,
            prefs.prefer_high_priority,
            HEURISTIC_LABEL,
            today,
        ));
    }
    ordered
}

fn log_fallback(e: &AdvisorError) {
    match e {
        AdvisorError::NoCredentials => {
            info!(outcome = e.outcome_tag(), "no provider configured; using heuristic order")
        }
        _ => warn!(outcome = e.outcome_tag(), error = %e, "remote ranking failed; using heuristic order"),
    }
}
