use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use triage_core::Task;

/// Overrides the state directory (default `~/.triage`).
pub const HOME_ENV: &str = "TRIAGE_HOME";

pub fn triage_home() -> Result<PathBuf> {
    if let Ok(dir) = std::env::var(HOME_ENV) {
        if !dir.trim().is_empty() {
            return Ok(PathBuf::from(dir));
        }
    }
    let home = std::env::var("HOME").context("HOME is not set")?;
    Ok(PathBuf::from(home).join(".triage"))
}

pub fn ensure_triage_home() -> Result<PathBuf> {
    let dir = triage_home()?;
    fs::create_dir_all(&dir).with_context(|| format!("create {}", dir.display()))?;
    Ok(dir)
}

pub fn memory_path(home: &Path) -> PathBuf {
    home.join("memory.json")
}

/// Resolve a configured file name against the state directory.
pub fn resolve(home: &Path, file: &str) -> PathBuf {
    let p = PathBuf::from(file);
    if p.is_absolute() { p } else { home.join(p) }
}

/// Read open tasks from a JSON array of task records.
pub fn load_tasks(path: &Path) -> Result<Vec<Task>> {
    let s = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    serde_json::from_str(&s).with_context(|| format!("parse tasks from {}", path.display()))
}
