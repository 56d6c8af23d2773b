//! HTTP text-generation providers (OpenAI-compatible chat completions).
//!
//! OpenRouter and OpenAI share the same request shape; only the base URL,
//! key and a couple of headers differ.

use std::time::Duration;

use anyhow::{Context, Result};
use reqwest::header::AUTHORIZATION;
use serde::{Deserialize, Serialize};
use tracing::debug;
use triage_core::{AdvisorError, ProviderChoice, ProviderKind, TextGenerationProvider};

use crate::config::LlmSection;

pub struct ChatProvider {
    kind: ProviderKind,
    api_key: String,
    model: String,
    base_url: String,
    temperature: f32,
    client: reqwest::Client,
}

impl ChatProvider {
    pub fn new(choice: ProviderChoice, llm: &LlmSection) -> Result<Self> {
        let client = reqwest::Client::builder()
            .build()
            .context("build http client")?;
        Ok(Self {
            kind: choice.kind,
            api_key: choice.api_key,
            model: choice.model,
            base_url: llm.base_url_for(choice.kind).trim_end_matches('/').to_string(),
            temperature: llm.temperature,
            client,
        })
    }

    async fn complete(&self, prompt: &str, timeout: Duration) -> std::result::Result<String, AdvisorError> {
        #[derive(Serialize)]
        struct Msg<'a> {
            role: &'a str,
            content: &'a str,
        }

        #[derive(Serialize)]
        struct Req<'a> {
            model: &'a str,
            messages: Vec<Msg<'a>>,
            temperature: f32,
        }

        #[derive(Deserialize)]
        struct Resp {
            choices: Vec<Choice>,
        }

        #[derive(Deserialize)]
        struct Choice {
            message: MsgOut,
        }

        #[derive(Deserialize)]
        struct MsgOut {
            content: Option<String>,
        }

        let body = Req {
            model: &self.model,
            messages: vec![Msg {
                role: "user",
                content: prompt,
            }],
            temperature: self.temperature,
        };

        let mut req = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .header(AUTHORIZATION, format!("Bearer {}", self.api_key))
            .timeout(timeout)
            .json(&body);
        if self.kind == ProviderKind::OpenRouter {
            req = req.header("X-Title", "triage");
        }

        let resp = req.send().await.map_err(|e| transport_error(self.name(), timeout, e))?;

        let status = resp.status();
        debug!(provider = self.name(), status = status.as_u16(), "chat completion response");
        if !status.is_success() {
            let txt = resp.text().await.unwrap_or_default();
            return Err(classify_status(status.as_u16(), &txt));
        }

        let out: Resp = resp
            .json()
            .await
            .map_err(|e| AdvisorError::TransientProviderError(format!("parse {} response: {e}", self.name())))?;
        let content = out
            .choices
            .first()
            .and_then(|c| c.message.content.clone())
            .unwrap_or_default();

        Ok(content.trim().to_string())
    }
}

impl TextGenerationProvider for ChatProvider {
    fn name(&self) -> &str {
        self.kind.as_str()
    }

    fn model(&self) -> &str {
        &self.model
    }

    fn generate(&self, prompt: &str, timeout: Duration) -> std::result::Result<String, AdvisorError> {
        // `triage` runs under #[tokio::main], so a runtime is usually already
        // running and a nested block_on would panic.
        if let Ok(handle) = tokio::runtime::Handle::try_current() {
            tokio::task::block_in_place(|| handle.block_on(self.complete(prompt, timeout)))
        } else {
            let rt = tokio::runtime::Runtime::new()
                .map_err(|e| AdvisorError::TransientProviderError(format!("create tokio runtime: {e}")))?;
            rt.block_on(self.complete(prompt, timeout))
        }
    }
}

/// Map a non-2xx status to an advisor outcome.
pub fn classify_status(status: u16, body: &str) -> AdvisorError {
    let detail = format!("{status} {}", snippet(body));
    match status {
        401 | 403 => AdvisorError::AuthenticationFailure(detail),
        // OpenRouter answers 402 when credits run out.
        402 | 429 => AdvisorError::QuotaExceeded(detail),
        _ => AdvisorError::TransientProviderError(detail),
    }
}

fn transport_error(provider: &str, timeout: Duration, e: reqwest::Error) -> AdvisorError {
    if e.is_timeout() {
        AdvisorError::TransientProviderError(format!("{provider} timed out after {timeout:?}"))
    } else {
        AdvisorError::TransientProviderError(format!("{provider} request: {e}"))
    }
}

fn snippet(body: &str) -> String {
    let body = body.trim();
    if body.chars().count() > 200 {
        format!("{}…", body.chars().take(200).collect::<String>())
    } else {
        body.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_status() {
        assert!(matches!(classify_status(401, "bad key"), AdvisorError::AuthenticationFailure(_)));
        assert!(matches!(classify_status(403, ""), AdvisorError::AuthenticationFailure(_)));
        assert!(matches!(classify_status(429, "insufficient_quota"), AdvisorError::QuotaExceeded(_)));
        assert!(matches!(classify_status(402, "no credits"), AdvisorError::QuotaExceeded(_)));
        assert!(matches!(classify_status(503, "overloaded"), AdvisorError::TransientProviderError(_)));
        assert_eq!(classify_status(500, "boom").outcome_tag(), "generic_error");
    }

    #[test]
    fn test_long_bodies_are_clipped() {
        let body = "x".repeat(500);
        match classify_status(500, &body) {
            AdvisorError::TransientProviderError(msg) => assert!(msg.chars().count() < 220),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_unreachable_host_is_transient() {
        let llm = LlmSection {
            openai_base_url: "http://127.0.0.1:9".to_string(),
            ..LlmSection::default()
        };
        let choice = ProviderChoice {
            kind: ProviderKind::OpenAi,
            api_key: "sk-test".into(),
            model: "gpt-4o-mini".into(),
        };
        let p = ChatProvider::new(choice, &llm).unwrap();
        assert_eq!(p.name(), "openai");

        let err = p.generate("hi", Duration::from_secs(2)).unwrap_err();
        assert_eq!(err.outcome_tag(), "generic_error");
    }

    #[test]
    fn test_silent_provider_times_out() {
        // Accepts connections via the backlog but never answers.
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();

        let llm = LlmSection {
            openrouter_base_url: format!("http://{addr}"),
            ..LlmSection::default()
        };
        let choice = ProviderChoice {
            kind: ProviderKind::OpenRouter,
            api_key: "sk-or-test".into(),
            model: "openai/gpt-4o-mini".into(),
        };
        let p = ChatProvider::new(choice, &llm).unwrap();

        let started = std::time::Instant::now();
        let err = p.generate("hi", Duration::from_millis(300)).unwrap_err();
        let elapsed = started.elapsed();

        assert_eq!(err.outcome_tag(), "generic_error");
        assert!(err.to_string().contains("timed out"), "{err}");
        assert!(elapsed < Duration::from_secs(5), "took {elapsed:?}");
        drop(listener);
    }
}
