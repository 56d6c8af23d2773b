use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use triage_core::ProviderKind;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Fallback tracing filter when RUST_LOG is unset.
    pub log_level: String,
    pub llm: LlmSection,
    pub profile: ProfileSection,
    pub audit: AuditSection,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmSection {
    pub timeout_secs: u64,
    pub temperature: f32,
    pub openrouter_base_url: String,
    pub openrouter_model: String,
    pub openai_base_url: String,
    pub openai_model: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProfileSection {
    /// IANA timezone used to decide what "today" is.
    pub timezone: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AuditSection {
    pub enabled: bool,
    /// Relative paths live under the state directory.
    pub file: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_level: "warn".to_string(),
            llm: LlmSection::default(),
            profile: ProfileSection::default(),
            audit: AuditSection::default(),
        }
    }
}

impl Default for LlmSection {
    fn default() -> Self {
        Self {
            timeout_secs: triage_core::DEFAULT_TIMEOUT.as_secs(),
            temperature: 0.2,
            openrouter_base_url: "https://openrouter.ai/api/v1".to_string(),
            openrouter_model: ProviderKind::OpenRouter.default_model().to_string(),
            openai_base_url: "https://api.openai.com/v1".to_string(),
            openai_model: ProviderKind::OpenAi.default_model().to_string(),
        }
    }
}

impl Default for ProfileSection {
    fn default() -> Self {
        Self {
            timezone: "UTC".to_string(),
        }
    }
}

impl Default for AuditSection {
    fn default() -> Self {
        Self {
            enabled: true,
            file: "audit.csv".to_string(),
        }
    }
}

impl LlmSection {
    pub fn model_for(&self, kind: ProviderKind) -> String {
        match kind {
            ProviderKind::OpenRouter => self.openrouter_model.clone(),
            ProviderKind::OpenAi => self.openai_model.clone(),
        }
    }

    pub fn base_url_for(&self, kind: ProviderKind) -> &str {
        match kind {
            ProviderKind::OpenRouter => &self.openrouter_base_url,
            ProviderKind::OpenAi => &self.openai_base_url,
        }
    }
}

pub fn config_path(home: &Path) -> PathBuf {
    home.join("config.toml")
}

pub fn load_config(home: &Path) -> Result<Config> {
    let p = config_path(home);
    if !p.exists() {
        return Ok(Config::default());
    }
    let s = fs::read_to_string(&p).with_context(|| format!("read {}", p.display()))?;
    toml::from_str(&s).context("parse config.toml")
}

pub fn save_config(home: &Path, cfg: &Config) -> Result<()> {
    let p = config_path(home);
    let s = toml::to_string_pretty(cfg).context("serialize config")?;
    fs::write(&p, s).with_context(|| format!("write {}", p.display()))?;
    Ok(())
}

pub fn init_config(home: &Path) -> Result<()> {
    let p = config_path(home);
    if p.exists() {
        println!("Config already exists: {}", p.display());
        return Ok(());
    }
    save_config(home, &Config::default())?;
    println!("Wrote {}", p.display());
    Ok(())
}
