//! Blocking HTTP transport shared by the repository providers.
//!
//! Every request carries the configured timeout and auth header. Responses
//! are classified into content, "absent" or a rate-limit signal; ordinary
//! failures never surface as errors.

use chrono::{DateTime, Duration as ChronoDuration, TimeZone, Utc};
use reqwest::blocking::Client;
use reqwest::header::HeaderMap;
use reqwest::StatusCode;
use std::sync::Mutex;
use std::time::Duration;

use crate::error::{ContentError, Result};
use crate::rate_limit::is_rate_limit_message;

/// Authentication header sent with API and raw-content requests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthHeader {
    /// Header name (e.g., "Authorization").
    pub header_name: String,
    /// Header value (e.g., "Bearer token123").
    pub header_value: String,
}

impl AuthHeader {
    /// Create a Bearer token auth header.
    pub fn bearer(token: &str) -> Self {
        Self {
            header_name: "Authorization".to_string(),
            header_value: format!("Bearer {}", token),
        }
    }

    /// Bearer header from an environment variable, if it is set and non-empty.
    pub fn from_env(var: &str) -> Option<Self> {
        std::env::var(var)
            .ok()
            .filter(|t| !t.trim().is_empty())
            .map(|t| Self::bearer(t.trim()))
    }
}

/// HTTP client with timeout, auth and rate-limit classification.
pub struct HttpTransport {
    client: Client,
    timeout: Duration,
    auth: Option<AuthHeader>,
    exhausted_until: Mutex<Option<DateTime<Utc>>>,
}

impl HttpTransport {
    /// Create a transport with the given user agent, timeout and auth.
    pub fn new(user_agent: &str, timeout: Duration, auth: Option<AuthHeader>) -> Result<Self> {
        let client = Client::builder()
            .user_agent(user_agent)
            .timeout(timeout)
            .build()
            .map_err(|e| anyhow::anyhow!("Failed to build HTTP client: {}", e))?;

        Ok(Self {
            client,
            timeout,
            auth,
            exhausted_until: Mutex::new(None),
        })
    }

    /// Get the configured timeout.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Whether requests carry an auth header.
    pub fn has_auth(&self) -> bool {
        self.auth.is_some()
    }

    /// GET a URL and return its body.
    ///
    /// Returns `Ok(None)` for non-success statuses, timeouts and transport
    /// errors. Returns [`ContentError::RateLimited`] when the provider says
    /// the rate-limit budget is exhausted.
    pub fn get_text(&self, url: &str, accept: Option<&str>) -> Result<Option<String>> {
        let mut request = self.client.get(url);

        if let Some(accept) = accept {
            request = request.header("Accept", accept);
        }
        if let Some(auth) = &self.auth {
            request = request.header(&auth.header_name, &auth.header_value);
        }

        let response = match request.send() {
            Ok(r) => r,
            Err(e) => {
                let message = e.to_string();
                if is_rate_limit_message(&message) {
                    return Err(ContentError::RateLimited { reset_at: None });
                }
                tracing::warn!("Request to {} failed: {}", url, message);
                return Ok(None);
            }
        };

        let status = response.status();
        let headers = response.headers().clone();

        if status.is_success() {
            self.note_exhausted_budget(&headers);
            return match response.text() {
                Ok(body) => Ok(Some(body)),
                Err(e) => {
                    tracing::warn!("Failed to read response from {}: {}", url, e);
                    Ok(None)
                }
            };
        }

        let body = response.text().unwrap_or_default();
        if is_rate_limited_response(status, &headers, &body) {
            let reset_at = reset_time_from_headers(&headers);
            tracing::warn!("Rate limited by {} (HTTP {})", url, status);
            return Err(ContentError::RateLimited { reset_at });
        }

        tracing::debug!("HTTP {} fetching {}", status, url);
        Ok(None)
    }

    /// GET a URL and report only whether it succeeded.
    pub fn exists(&self, url: &str, accept: Option<&str>) -> Result<bool> {
        Ok(self.get_text(url, accept)?.is_some())
    }

    /// Take the reset time of an exhausted budget seen on a successful
    /// response, if any.
    pub fn take_exhausted_until(&self) -> Option<DateTime<Utc>> {
        self.exhausted_until
            .lock()
            .map(|mut slot| slot.take())
            .unwrap_or(None)
    }

    fn note_exhausted_budget(&self, headers: &HeaderMap) {
        if remaining_calls(headers) != Some(0) {
            return;
        }
        if let Some(reset) = reset_time_from_headers(headers) {
            if let Ok(mut slot) = self.exhausted_until.lock() {
                *slot = Some(reset);
            }
        }
    }
}

/// Whether a failed response is a rate-limit refusal.
///
/// GitHub answers 403 with `X-RateLimit-Remaining: 0`; secondary limits and
/// other providers use 429 or a "rate limit" message in the body.
pub fn is_rate_limited_response(status: StatusCode, headers: &HeaderMap, body: &str) -> bool {
    if status == StatusCode::TOO_MANY_REQUESTS {
        return true;
    }
    if status == StatusCode::FORBIDDEN {
        return remaining_calls(headers) == Some(0) || is_rate_limit_message(body);
    }
    false
}

/// Remaining calls from `X-RateLimit-Remaining` or `RateLimit-Remaining`.
fn remaining_calls(headers: &HeaderMap) -> Option<u64> {
    headers
        .get("X-RateLimit-Remaining")
        .or_else(|| headers.get("RateLimit-Remaining"))
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.trim().parse::<u64>().ok())
}

/// Reset time from `X-RateLimit-Reset` (unix seconds) or `Retry-After`
/// (seconds from now).
pub fn reset_time_from_headers(headers: &HeaderMap) -> Option<DateTime<Utc>> {
    let reset = headers
        .get("X-RateLimit-Reset")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.trim().parse::<i64>().ok())
        .and_then(|ts| Utc.timestamp_opt(ts, 0).single());

    reset.or_else(|| {
        headers
            .get("Retry-After")
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.trim().parse::<i64>().ok())
            .map(|secs| Utc::now() + ChronoDuration::seconds(secs))
    })
}
