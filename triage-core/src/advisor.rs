//! Remote advisor: prompt construction, provider call, and decoding of the
//! model's answer into an ordering.
//!
//! Model output is free-form text. We look for the first well-formed JSON
//! array in it and accept two element shapes:
//! - bare ids: `[3, 1, 2]`
//! - objects: `[{"id": 3, "why": "due tomorrow"}, ...]`
//!
//! Elements of any other shape are skipped. An answer with nothing usable is
//! a [`AdvisorError::MalformedResponse`].

use std::collections::HashMap;
use std::time::Duration;

use chrono::NaiveDate;
use serde_json::Value;
use tracing::debug;

use crate::error::{AdvisorError, Result};
use crate::preferences::Preferences;
use crate::provider::TextGenerationProvider;
use crate::reason::{AI_LABEL, build_reason};
use crate::task::Task;
use crate::time::days_until;

/// One position in the advisor's ordering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RankedEntry {
    pub task_id: i64,
    pub why: Option<String>,
}

/// Decoded advisor answer, most important first.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RankingResponse {
    pub entries: Vec<RankedEntry>,
}

impl RankingResponse {
    pub fn ids(&self) -> Vec<i64> {
        self.entries.iter().map(|e| e.task_id).collect()
    }
}

pub fn build_prompt(tasks: &[Task], prefs: &Preferences, today: NaiveDate) -> String {
    let mut lines = vec![
        "You are an AI task prioritizer for a personal to-do list.".to_string(),
        "Order ALL tasks below from what to do first to what to do last.".to_string(),
        format!(
            "Rules: prefer_deadline={}, prefer_high_priority={} (lower pr number = more urgent)",
            prefs.prefer_deadline, prefs.prefer_high_priority
        ),
        format!("Today: {}", today.format("%Y-%m-%d")),
        "Tasks:".to_string(),
    ];

    for t in tasks {
        let due = match days_until(t.deadline_str(), today) {
            Some(d) => d.to_string(),
            None => "none".to_string(),
        };
        lines.push(format!(
            "- id:{} desc:{} pr:{} days_left:{}",
            t.task_id,
            t.description.replace('\n', " "),
            t.priority,
            due
        ));
    }

    lines.push(
        "Return ONLY compact JSON: an array like [{\"id\": 3, \"why\": \"due tomorrow, top priority\"}] \
         in recommended order, each \"why\" under 12 words. A plain array of ids like [3, 1, 2] is also accepted."
            .to_string(),
    );
    lines.join("\n")
}

/// Ask `provider` for an ordering. `None` means no credentials were configured.
pub fn request_ranking(
    provider: Option<&dyn TextGenerationProvider>,
    tasks: &[Task],
    prefs: &Preferences,
    today: NaiveDate,
    timeout: Duration,
) -> Result<RankingResponse> {
    let provider = provider.ok_or(AdvisorError::NoCredentials)?;
    let prompt = build_prompt(tasks, prefs, today);

    debug!(provider = provider.name(), model = provider.model(), tasks = tasks.len(), "requesting remote ranking");
    let text = provider.generate(&prompt, timeout)?;
    parse_ranking(&text)
}

/// Decode the first JSON array found in `text`.
pub fn parse_ranking(text: &str) -> Result<RankingResponse> {
    let items = first_json_array(text)
        .ok_or_else(|| AdvisorError::MalformedResponse("no JSON array in response".into()))?;

    if items.is_empty() {
        return Err(AdvisorError::MalformedResponse("empty array".into()));
    }

    let total = items.len();
    let entries: Vec<RankedEntry> = items.iter().filter_map(entry_from_value).collect();
    if entries.is_empty() {
        return Err(AdvisorError::MalformedResponse(format!(
            "none of {total} array elements is an id or {{id, why}} object"
        )));
    }
    if entries.len() < total {
        debug!(skipped = total - entries.len(), "ignored unrecognised ranking elements");
    }

    Ok(RankingResponse { entries })
}

/// Reorder `tasks` by the advisor's ranking and attach reasons.
///
/// The first mention of an id fixes its position; later repeats are ignored.
/// Tasks the advisor never named follow the named ones in input order.
/// Fails when no entry names any input task.
pub fn apply_ranking(
    mut tasks: Vec<Task>,
    ranking: &RankingResponse,
    prefs: &Preferences,
    today: NaiveDate,
) -> Result<Vec<Task>> {
    let mut positions: HashMap<i64, (usize, Option<&str>)> = HashMap::new();
    for (pos, entry) in ranking.entries.iter().enumerate() {
        positions
            .entry(entry.task_id)
            .or_insert((pos, entry.why.as_deref()));
    }

    if !tasks.iter().any(|t| positions.contains_key(&t.task_id)) {
        return Err(AdvisorError::MalformedResponse(
            "ranking names none of the input tasks".into(),
        ));
    }

    tasks.sort_by_key(|t| positions.get(&t.task_id).map_or(usize::MAX, |(pos, _)| *pos));

    for t in tasks.iter_mut() {
        let why = positions.get(&t.task_id).and_then(|(_, why)| *why);
        t.reason = Some(match why {
            Some(why) => why.to_string(),
            None => build_reason(t, prefs.prefer_deadline, prefs.prefer_high_priority, AI_LABEL, today),
        });
    }

    Ok(tasks)
}

fn first_json_array(text: &str) -> Option<Vec<Value>> {
    for (start, _) in text.match_indices('[') {
        let mut stream = serde_json::Deserializer::from_str(&text[start..]).into_iter::<Value>();
        if let Some(Ok(Value::Array(items))) = stream.next() {
            return Some(items);
        }
    }
    None
}

fn entry_from_value(v: &Value) -> Option<RankedEntry> {
    match v {
        Value::Object(map) => {
            let task_id = id_from_value(map.get("id")?)?;
            let why = map
                .get("why")
                .and_then(Value::as_str)
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string);
            Some(RankedEntry { task_id, why })
        }
        other => id_from_value(other).map(|task_id| RankedEntry { task_id, why: None }),
    }
}

fn id_from_value(v: &Value) -> Option<i64> {
    match v {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}
