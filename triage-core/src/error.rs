//! Ways a remote ranking attempt can fail.
//!
//! Every variant is recoverable: the orchestrator answers each one by
//! falling back to the deterministic ranker.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AdvisorError {
    /// No provider key configured; the remote call is skipped.
    #[error("no provider credentials configured")]
    NoCredentials,

    #[error("provider rejected credentials: {0}")]
    AuthenticationFailure(String),

    #[error("provider quota exceeded: {0}")]
    QuotaExceeded(String),

    /// Network failure, timeout, 5xx, or an unreadable response envelope.
    #[error("provider error: {0}")]
    TransientProviderError(String),

    /// The generated text held no usable ranking.
    #[error("malformed ranking response: {0}")]
    MalformedResponse(String),
}

impl AdvisorError {
    /// Outcome tag recorded in logs for a failed attempt.
    pub fn outcome_tag(&self) -> &'static str {
        match self {
            AdvisorError::NoCredentials => "no_key",
            AdvisorError::AuthenticationFailure(_) => "unauthorized",
            AdvisorError::QuotaExceeded(_) => "quota_exceeded",
            AdvisorError::TransientProviderError(_) => "generic_error",
            AdvisorError::MalformedResponse(_) => "malformed",
        }
    }
}

pub type Result<T> = std::result::Result<T, AdvisorError>;
