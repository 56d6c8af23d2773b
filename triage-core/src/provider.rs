//! Text-generation providers and credential-driven selection.
//!
//! The engine only sees [`TextGenerationProvider`]. Which concrete provider
//! backs it is decided from [`Credentials`]: OpenRouter first, OpenAI second,
//! nothing at all when no key is present.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::Result;

pub const OPENROUTER_KEY_ENV: &str = "OPENROUTER_API_KEY";
pub const OPENAI_KEY_ENV: &str = "OPENAI_API_KEY";
pub const MODEL_OVERRIDE_ENV: &str = "TRIAGE_MODEL";

pub const DEFAULT_OPENROUTER_MODEL: &str = "openai/gpt-4o-mini";
pub const DEFAULT_OPENAI_MODEL: &str = "gpt-4o-mini";

/// Default bound on a single remote call.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

pub trait TextGenerationProvider: Send + Sync {
    /// Short provider id, e.g. "openrouter".
    fn name(&self) -> &str;

    fn model(&self) -> &str;

    /// One completion for `prompt`, giving up after `timeout`.
    fn generate(&self, prompt: &str, timeout: Duration) -> Result<String>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    OpenRouter,
    OpenAi,
}

impl ProviderKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderKind::OpenRouter => "openrouter",
            ProviderKind::OpenAi => "openai",
        }
    }

    pub fn default_model(&self) -> &'static str {
        match self {
            ProviderKind::OpenRouter => DEFAULT_OPENROUTER_MODEL,
            ProviderKind::OpenAi => DEFAULT_OPENAI_MODEL,
        }
    }
}

/// Keys available to the process. Blank values count as missing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Credentials {
    pub openrouter_api_key: Option<String>,
    pub openai_api_key: Option<String>,
    pub model_override: Option<String>,
}

/// The provider a call would use, and with which key and model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderChoice {
    pub kind: ProviderKind,
    pub api_key: String,
    pub model: String,
}

impl Credentials {
    pub fn from_env() -> Self {
        Self {
            openrouter_api_key: std::env::var(OPENROUTER_KEY_ENV).ok(),
            openai_api_key: std::env::var(OPENAI_KEY_ENV).ok(),
            model_override: std::env::var(MODEL_OVERRIDE_ENV).ok(),
        }
    }

    /// Fill gaps from `other`; values already present win.
    pub fn or(self, other: Credentials) -> Self {
        Self {
            openrouter_api_key: non_blank(self.openrouter_api_key).or(non_blank(other.openrouter_api_key)),
            openai_api_key: non_blank(self.openai_api_key).or(non_blank(other.openai_api_key)),
            model_override: non_blank(self.model_override).or(non_blank(other.model_override)),
        }
    }

    /// Pick a provider, or `None` when no key is configured.
    ///
    /// `default_models` supplies per-provider models when no override is set.
    pub fn select(&self, default_models: impl Fn(ProviderKind) -> String) -> Option<ProviderChoice> {
        let (kind, api_key) = if let Some(k) = non_blank(self.openrouter_api_key.clone()) {
            (ProviderKind::OpenRouter, k)
        } else if let Some(k) = non_blank(self.openai_api_key.clone()) {
            (ProviderKind::OpenAi, k)
        } else {
            return None;
        };

        let model = non_blank(self.model_override.clone()).unwrap_or_else(|| default_models(kind));
        Some(ProviderChoice { kind, api_key, model })
    }
}

fn non_blank(v: Option<String>) -> Option<String> {
    v.map(|s| s.trim().to_string()).filter(|s| !s.is_empty())
}
