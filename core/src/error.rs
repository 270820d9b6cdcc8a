//! Error types for the FurSight client.
//!
//! # Design
//! `FurSightError` is a closed set: callers match on it to tell a local
//! validation problem from a rejected credential, an empty credit balance, a
//! rate limit that outlasted the retry budget, or an unreachable service.
//! The executor only recovers internally from rate limiting and transport
//! failures; everything else is returned on the first attempt.

use std::fmt;
use std::time::Duration;

use thiserror::Error;

use crate::endpoint::Endpoint;

/// Number of allowed values shown in a validation message before truncating.
const ALLOWED_PREVIEW_LEN: usize = 5;

/// Errors returned by `FurSightClient`, `RequestExecutor` and `AdoptionForm`.
#[derive(Debug, Error)]
pub enum FurSightError {
    /// Local field-constraint violation, or a request the server rejected with 400.
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationError),

    /// The server returned 401.
    #[error("authentication failed: {0}")]
    Authentication(String),

    /// The server returned 402.
    #[error("insufficient credits: {0}")]
    InsufficientCredits(String),

    /// The server kept answering 429 until the retry budget ran out.
    #[error("rate limit exceeded, retry after {} seconds", .retry_after.as_secs())]
    RateLimited { retry_after: Duration },

    /// Any other non-2xx status.
    #[error("API error (HTTP {status}): {message}")]
    Api { status: u16, message: String },

    /// No response was received on the final attempt.
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// The executor was configured with a zero retry budget.
    #[error("max retries exceeded after {attempts} attempts")]
    RetriesExhausted { attempts: u32 },

    /// The endpoint is disabled upstream; no request was sent.
    #[error("endpoint {0} is not available")]
    EndpointUnavailable(Endpoint),

    /// The request payload could not be serialized to JSON.
    #[error("serialization failed: {0}")]
    Serialization(String),

    /// The response body could not be deserialized into the expected type.
    #[error("deserialization failed: {0}")]
    Deserialization(String),

    #[error("invalid configuration: {0}")]
    Config(#[from] config::ConfigError),
}

impl FurSightError {
    /// HTTP status associated with the failure, if it came from a response.
    pub fn status(&self) -> Option<u16> {
        match self {
            FurSightError::Validation(ValidationError::Rejected(_)) => Some(400),
            FurSightError::Authentication(_) => Some(401),
            FurSightError::InsufficientCredits(_) => Some(402),
            FurSightError::RateLimited { .. } => Some(429),
            FurSightError::Api { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Whether the executor treats this condition as transient.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            FurSightError::RateLimited { .. } | FurSightError::Transport(_)
        )
    }
}

/// Form or payload validation failures.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    /// Both partitions of the form are empty.
    #[error("form must contain at least some adopter and dog data")]
    NoData,

    /// A field holds a value outside its allowed-values list.
    #[error(
        "field '{field}' must be one of: {}. Received: '{received}'",
        AllowedPreview(.allowed)
    )]
    NotAllowed {
        field: String,
        received: String,
        allowed: Vec<String>,
    },

    /// The server rejected the request body (HTTP 400).
    #[error("{0}")]
    Rejected(String),
}

/// Transport-level failures: no HTTP response was obtained.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    #[error("request timeout after {} seconds", .0.as_secs())]
    Timeout(Duration),

    #[error("request failed: {0}")]
    Connection(String),
}

/// Renders the first few allowed values, with `...` when the list is longer.
struct AllowedPreview<'a>(&'a [String]);

impl fmt::Display for AllowedPreview<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let shown = &self.0[..self.0.len().min(ALLOWED_PREVIEW_LEN)];
        write!(f, "[{}]", shown.join(", "))?;
        if self.0.len() > ALLOWED_PREVIEW_LEN {
            write!(f, "...")?;
        }
        Ok(())
    }
}
