use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use triage_core::Credentials;

/// Keys stored on disk. Environment variables take precedence over these.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AuthState {
    pub openrouter_api_key: Option<String>,
    pub openai_api_key: Option<String>,
    pub model: Option<String>,
}

impl AuthState {
    pub fn credentials(&self) -> Credentials {
        Credentials {
            openrouter_api_key: self.openrouter_api_key.clone(),
            openai_api_key: self.openai_api_key.clone(),
            model_override: self.model.clone(),
        }
    }
}

fn auth_path(home: &Path) -> PathBuf {
    home.join("auth.json")
}

pub fn load_auth(home: &Path) -> Result<AuthState> {
    let p = auth_path(home);
    if !p.exists() {
        return Ok(AuthState::default());
    }
    let s = fs::read_to_string(&p).with_context(|| format!("read {}", p.display()))?;
    serde_json::from_str(&s).with_context(|| format!("parse {}", p.display()))
}

pub fn save_auth(home: &Path, auth: &AuthState) -> Result<()> {
    let p = auth_path(home);
    let s = serde_json::to_string_pretty(auth)?;
    fs::write(&p, s).with_context(|| format!("write {}", p.display()))?;
    Ok(())
}

/// Environment first, then `auth.json`.
pub fn resolve_credentials(home: &Path) -> Result<Credentials> {
    Ok(Credentials::from_env().or(load_auth(home)?.credentials()))
}

fn prompt_secret(label: &str) -> Result<String> {
    print!("{}: ", label);
    io::stdout().flush().ok();
    let mut s = String::new();
    io::stdin().read_line(&mut s)?;
    Ok(s.trim().to_string())
}

pub fn openrouter_paste_key(home: &Path) -> Result<()> {
    let mut auth = load_auth(home)?;
    let key = prompt_secret("Paste OpenRouter API key (starts with sk-or-)")?;
    if !key.starts_with("sk-or-") {
        bail!("key didn't look like an OpenRouter key (expected prefix sk-or-)");
    }
    auth.openrouter_api_key = Some(key);
    save_auth(home, &auth)?;
    println!("Saved OpenRouter key to {}", auth_path(home).display());
    Ok(())
}

pub fn openai_paste_key(home: &Path) -> Result<()> {
    let mut auth = load_auth(home)?;
    let key = prompt_secret("Paste OpenAI API key (starts with sk-)")?;
    if !key.starts_with("sk-") {
        bail!("key didn't look like an OpenAI API key (expected prefix sk-)");
    }
    auth.openai_api_key = Some(key);
    save_auth(home, &auth)?;
    println!("Saved OpenAI API key to {}", auth_path(home).display());
    Ok(())
}
