//! Resilient execution of one logical API call.
//!
//! # Design
//! `RequestExecutor` owns the outbound request lifecycle: it paces calls,
//! dispatches attempts through a `Transport`, classifies responses and
//! decides whether to retry. Each attempt resolves to an `AttemptOutcome`
//! and the loop in `execute` acts on it, so the retry schedule reads as a
//! small state machine with a bounded attempt counter.
//!
//! Pacing state (`last_request`) is private to the executor. Sleeps block the
//! calling thread through the injected `Clock`; one call is in flight per
//! executor at a time.

use std::cell::Cell;
use std::fmt;
use std::sync::Arc;
use std::time::{Duration, Instant};

use serde_json::Value;

use crate::clock::{Clock, SystemClock};
use crate::config::ClientConfig;
use crate::error::{FurSightError, TransportError, ValidationError};
use crate::http::{HttpMethod, HttpRequest, HttpResponse, Transport, UreqTransport};

const USER_AGENT: &str = concat!("fursight-sdk-rust/", env!("CARGO_PKG_VERSION"));

/// Retry and pacing knobs, derived from `ClientConfig`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts for one logical call.
    pub max_retries: u32,
    /// Minimum gap between the end of one attempt and the start of the next.
    pub min_request_interval: Duration,
    /// Wait used for a 429 without a parseable `Retry-After` header.
    pub default_retry_after: Duration,
}

impl RetryPolicy {
    pub fn from_config(config: &ClientConfig) -> Self {
        Self {
            max_retries: config.max_retries,
            min_request_interval: config.min_request_interval(),
            default_retry_after: config.default_retry_after(),
        }
    }

    /// Exponential backoff after a transport failure on zero-indexed `attempt`.
    pub fn backoff(&self, attempt: u32) -> Duration {
        Duration::from_secs(2u64.saturating_pow(attempt))
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::from_config(&ClientConfig::new(""))
    }
}

/// What a single dispatched attempt resolved to.
#[derive(Debug)]
enum AttemptOutcome {
    Success(Value),
    /// 429: wait for the server-provided interval before the next attempt.
    RetryAfter(Duration),
    /// Timeout or connection failure: back off exponentially.
    Backoff(TransportError),
    /// Not retryable; returned as is.
    Terminal(FurSightError),
}

pub struct RequestExecutor {
    base_url: String,
    api_key: String,
    transport: Box<dyn Transport>,
    clock: Arc<dyn Clock>,
    policy: RetryPolicy,
    last_request: Cell<Option<Instant>>,
}

impl RequestExecutor {
    /// Executor over a `ureq` transport and the system clock.
    pub fn new(config: &ClientConfig) -> Self {
        Self::with_transport(
            config,
            Box::new(UreqTransport::new(config.timeout())),
            Arc::new(SystemClock),
        )
    }

    pub fn with_transport(
        config: &ClientConfig,
        transport: Box<dyn Transport>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
            transport,
            clock,
            policy: RetryPolicy::from_config(config),
            last_request: Cell::new(None),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    /// End time of the most recent dispatched attempt.
    pub fn last_request(&self) -> Option<Instant> {
        self.last_request.get()
    }

    /// Perform one logical call and return the parsed JSON body.
    ///
    /// Retries 429 responses after `Retry-After` and transport failures after
    /// `2^attempt` seconds, up to `max_retries` attempts in total. Every other
    /// non-2xx status fails on the first attempt.
    pub fn execute(
        &self,
        method: HttpMethod,
        path: &str,
        payload: Option<&Value>,
        query: &[(&str, String)],
    ) -> Result<Value, FurSightError> {
        let request = self.build_request(method, path, payload, query)?;
        let max_retries = self.policy.max_retries;

        for attempt in 0..max_retries {
            let is_last = attempt + 1 == max_retries;
            self.wait_for_pacing();

            tracing::debug!(
                method = method.as_str(),
                path,
                attempt = attempt + 1,
                max_retries,
                "dispatching request"
            );
            let outcome = self.dispatch(&request);

            match outcome {
                AttemptOutcome::Success(value) => return Ok(value),
                AttemptOutcome::Terminal(err) => return Err(err),
                AttemptOutcome::RetryAfter(retry_after) => {
                    if is_last {
                        return Err(FurSightError::RateLimited { retry_after });
                    }
                    tracing::warn!(
                        path,
                        retry_after_secs = retry_after.as_secs(),
                        "rate limited, waiting before retry"
                    );
                    self.clock.sleep(retry_after);
                }
                AttemptOutcome::Backoff(err) => {
                    if is_last {
                        return Err(FurSightError::Transport(err));
                    }
                    let delay = self.policy.backoff(attempt);
                    tracing::warn!(
                        path,
                        attempt = attempt + 1,
                        delay_secs = delay.as_secs(),
                        error = %err,
                        "request failed, backing off"
                    );
                    self.clock.sleep(delay);
                }
            }
        }

        Err(FurSightError::RetriesExhausted {
            attempts: max_retries,
        })
    }

    /// Sleeps until the minimum interval since the last attempt has passed.
    fn wait_for_pacing(&self) {
        let Some(last) = self.last_request.get() else {
            return;
        };
        let elapsed = self.clock.now().saturating_duration_since(last);
        if elapsed < self.policy.min_request_interval {
            self.clock.sleep(self.policy.min_request_interval - elapsed);
        }
    }

    fn dispatch(&self, request: &HttpRequest) -> AttemptOutcome {
        let result = self.transport.send(request);
        self.last_request.set(Some(self.clock.now()));

        match result {
            Ok(response) => classify_response(&response, self.policy.default_retry_after),
            Err(err) => AttemptOutcome::Backoff(err),
        }
    }

    pub(crate) fn build_request(
        &self,
        method: HttpMethod,
        path: &str,
        payload: Option<&Value>,
        query: &[(&str, String)],
    ) -> Result<HttpRequest, FurSightError> {
        let mut url = format!("{}{}", self.base_url, path);
        if !query.is_empty() {
            let encoded: Vec<String> = query
                .iter()
                .map(|(key, value)| {
                    format!("{}={}", urlencoding::encode(key), urlencoding::encode(value))
                })
                .collect();
            url.push('?');
            url.push_str(&encoded.join("&"));
        }

        let mut headers = vec![
            ("authorization".to_string(), format!("Bearer {}", self.api_key)),
            ("accept".to_string(), "application/json".to_string()),
            ("user-agent".to_string(), USER_AGENT.to_string()),
        ];

        let body = match payload {
            Some(value) => {
                headers.push(("content-type".to_string(), "application/json".to_string()));
                Some(
                    serde_json::to_string(value)
                        .map_err(|e| FurSightError::Serialization(e.to_string()))?,
                )
            }
            None => None,
        };

        Ok(HttpRequest {
            method,
            path: url,
            headers,
            body,
        })
    }
}

impl fmt::Debug for RequestExecutor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RequestExecutor")
            .field("base_url", &self.base_url)
            .field("policy", &self.policy)
            .field("last_request", &self.last_request.get())
            .finish_non_exhaustive()
    }
}

/// Map a response to the action the retry loop takes next.
fn classify_response(response: &HttpResponse, default_retry_after: Duration) -> AttemptOutcome {
    if response.is_success() {
        if response.body.trim().is_empty() {
            return AttemptOutcome::Success(Value::Null);
        }
        return match serde_json::from_str(&response.body) {
            Ok(value) => AttemptOutcome::Success(value),
            Err(e) => AttemptOutcome::Terminal(FurSightError::Deserialization(e.to_string())),
        };
    }

    if response.status == 429 {
        return AttemptOutcome::RetryAfter(retry_after(response).unwrap_or(default_retry_after));
    }

    let message = error_message(response);
    let err = match response.status {
        400 => FurSightError::Validation(ValidationError::Rejected(message)),
        401 => FurSightError::Authentication(message),
        402 => FurSightError::InsufficientCredits(message),
        status => FurSightError::Api { status, message },
    };
    AttemptOutcome::Terminal(err)
}

/// `Retry-After` in whole seconds. HTTP-date values are not supported.
fn retry_after(response: &HttpResponse) -> Option<Duration> {
    response
        .header("retry-after")
        .and_then(|value| value.trim().parse::<u64>().ok())
        .map(Duration::from_secs)
}

/// Prefer the `detail` field of a JSON error body, then the raw text.
fn error_message(response: &HttpResponse) -> String {
    match serde_json::from_str::<Value>(&response.body) {
        Ok(Value::Object(body)) => match body.get("detail") {
            Some(Value::String(detail)) => detail.clone(),
            Some(detail) => detail.to_string(),
            None => format!("HTTP {}", response.status),
        },
        _ => format!("HTTP {}: {}", response.status, response.body),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn response(status: u16, body: &str) -> HttpResponse {
        HttpResponse {
            status,
            headers: Vec::new(),
            body: body.to_string(),
        }
    }

    fn executor() -> RequestExecutor {
        let config = ClientConfig::new("secret-key").with_base_url("http://localhost:3000/");
        RequestExecutor::new(&config)
    }

    #[test]
    fn build_request_attaches_credentials_and_query() {
        let req = executor()
            .build_request(
                HttpMethod::Post,
                "/predict/single",
                Some(&json!({"dog_size": "Medium"})),
                &[("include_explanation", "true".to_string())],
            )
            .unwrap();
        assert_eq!(req.method, HttpMethod::Post);
        assert_eq!(
            req.path,
            "http://localhost:3000/predict/single?include_explanation=true"
        );
        assert_eq!(req.header("Authorization"), Some("Bearer secret-key"));
        assert_eq!(req.header("Content-Type"), Some("application/json"));
        assert!(req.header("user-agent").unwrap().starts_with("fursight-sdk-rust/"));
        let body: Value = serde_json::from_str(req.body.as_deref().unwrap()).unwrap();
        assert_eq!(body, json!({"dog_size": "Medium"}));
    }

    #[test]
    fn build_request_without_payload_has_no_content_type() {
        let req = executor()
            .build_request(HttpMethod::Get, "/health", None, &[])
            .unwrap();
        assert_eq!(req.path, "http://localhost:3000/health");
        assert!(req.body.is_none());
        assert!(req.header("content-type").is_none());
    }

    #[test]
    fn query_values_are_percent_encoded() {
        let req = executor()
            .build_request(HttpMethod::Get, "/model/info", None, &[("q", "a b&c".to_string())])
            .unwrap();
        assert!(req.path.ends_with("/model/info?q=a%20b%26c"), "{}", req.path);
    }

    #[test]
    fn classify_success_parses_json() {
        let outcome = classify_response(&response(200, r#"{"status":"healthy"}"#), Duration::ZERO);
        assert!(matches!(outcome, AttemptOutcome::Success(v) if v["status"] == "healthy"));
    }

    #[test]
    fn classify_empty_success_is_null() {
        let outcome = classify_response(&response(204, ""), Duration::ZERO);
        assert!(matches!(outcome, AttemptOutcome::Success(Value::Null)));
    }

    #[test]
    fn classify_bad_json_is_terminal() {
        let outcome = classify_response(&response(200, "not json"), Duration::ZERO);
        assert!(matches!(
            outcome,
            AttemptOutcome::Terminal(FurSightError::Deserialization(_))
        ));
    }

    #[test]
    fn classify_429_reads_retry_after() {
        let mut resp = response(429, "");
        resp.headers.push(("Retry-After".to_string(), "5".to_string()));
        let outcome = classify_response(&resp, Duration::from_secs(60));
        assert!(matches!(outcome, AttemptOutcome::RetryAfter(d) if d == Duration::from_secs(5)));
    }

    #[test]
    fn classify_429_without_header_uses_default() {
        let outcome = classify_response(&response(429, ""), Duration::from_secs(60));
        assert!(matches!(outcome, AttemptOutcome::RetryAfter(d) if d == Duration::from_secs(60)));
    }

    #[test]
    fn classify_429_with_date_header_uses_default() {
        let mut resp = response(429, "");
        resp.headers.push((
            "retry-after".to_string(),
            "Wed, 21 Oct 2015 07:28:00 GMT".to_string(),
        ));
        let outcome = classify_response(&resp, Duration::from_secs(60));
        assert!(matches!(outcome, AttemptOutcome::RetryAfter(d) if d == Duration::from_secs(60)));
    }

    #[test]
    fn classify_status_codes() {
        let outcome = classify_response(&response(400, r#"{"detail":"dog_size invalid"}"#), Duration::ZERO);
        assert!(matches!(
            outcome,
            AttemptOutcome::Terminal(FurSightError::Validation(ValidationError::Rejected(ref m))) if m == "dog_size invalid"
        ));

        let outcome = classify_response(&response(401, r#"{"detail":"Invalid API key"}"#), Duration::ZERO);
        assert!(matches!(outcome, AttemptOutcome::Terminal(FurSightError::Authentication(_))));

        let outcome = classify_response(&response(402, ""), Duration::ZERO);
        assert!(matches!(outcome, AttemptOutcome::Terminal(FurSightError::InsufficientCredits(_))));

        let outcome = classify_response(&response(503, "upstream down"), Duration::ZERO);
        assert!(matches!(
            outcome,
            AttemptOutcome::Terminal(FurSightError::Api { status: 503, ref message }) if message == "HTTP 503: upstream down"
        ));
    }

    #[test]
    fn error_message_prefers_detail() {
        assert_eq!(error_message(&response(500, r#"{"detail":"boom"}"#)), "boom");
        assert_eq!(
            error_message(&response(422, r#"{"detail":[{"loc":["body"],"msg":"bad"}]}"#)),
            r#"[{"loc":["body"],"msg":"bad"}]"#
        );
        assert_eq!(error_message(&response(500, r#"{"error":"x"}"#)), "HTTP 500");
        assert_eq!(error_message(&response(502, "<html>")), "HTTP 502: <html>");
    }

    #[test]
    fn backoff_doubles_per_attempt() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.backoff(0), Duration::from_secs(1));
        assert_eq!(policy.backoff(1), Duration::from_secs(2));
        assert_eq!(policy.backoff(2), Duration::from_secs(4));
    }

    #[test]
    fn default_policy_matches_config_defaults() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.max_retries, 3);
        assert_eq!(policy.min_request_interval, Duration::from_millis(100));
        assert_eq!(policy.default_retry_after, Duration::from_secs(60));
    }
}
