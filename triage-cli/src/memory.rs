//! File-backed preference memory (`memory.json`).
//!
//! Holds the ordering rules the user toggled and a running count of completed
//! tasks. Every write stamps `last_updated`.

use anyhow::{Context, Result};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use triage_core::{PreferenceSource, Preferences};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rule {
    PreferDeadline,
    PreferHighPriority,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Memory {
    #[serde(default)]
    pub completions_count: u64,
    #[serde(default)]
    pub user_rules: Preferences,
    #[serde(default)]
    pub last_updated: Option<String>,

    #[serde(skip)]
    path: PathBuf,
}

impl Memory {
    /// Load `path`, creating it with default rules when missing.
    pub fn open(path: &Path) -> Result<Self> {
        if path.exists() {
            let s = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
            let mut m: Memory =
                serde_json::from_str(&s).with_context(|| format!("parse {}", path.display()))?;
            m.path = path.to_path_buf();
            return Ok(m);
        }

        let mut m = Memory {
            completions_count: 0,
            user_rules: Preferences::default(),
            last_updated: None,
            path: path.to_path_buf(),
        };
        m.save()?;
        Ok(m)
    }

    fn save(&mut self) -> Result<()> {
        self.last_updated = Some(Utc::now().to_rfc3339());
        let s = serde_json::to_string_pretty(self)?;
        fs::write(&self.path, s).with_context(|| format!("write {}", self.path.display()))?;
        Ok(())
    }

    /// Count one completed task; returns the new total.
    pub fn record_completion(&mut self) -> Result<u64> {
        self.completions_count += 1;
        self.save()?;
        Ok(self.completions_count)
    }

    pub fn set_rule(&mut self, rule: Rule, value: bool) -> Result<()> {
        match rule {
            Rule::PreferDeadline => self.user_rules.prefer_deadline = value,
            Rule::PreferHighPriority => self.user_rules.prefer_high_priority = value,
        }
        self.save()
    }

    pub fn rules(&self) -> Preferences {
        self.user_rules
    }
}

impl PreferenceSource for Memory {
    fn preferences(&self) -> Preferences {
        self.rules()
    }
}
