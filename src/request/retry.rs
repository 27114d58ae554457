//! Retry decisions for WebBook requests.
//!
//! A failed attempt is classified into a [`FailureType`]; the [`RetryPolicy`]
//! then decides whether another attempt fits in the configured budget. The
//! pause between attempts is the configured inter-request delay, not an
//! exponential backoff: the WebBook publishes a crawl delay and the client
//! honours it uniformly.
//!
//! # Example
//!
//! ```
//! use webbook::request::{FailureType, RetryDecision, RetryPolicy, classify_http_status};
//!
//! let policy = RetryPolicy::new(3);
//! let failure = classify_http_status(503);
//! assert_eq!(failure, FailureType::Transient);
//! assert!(matches!(policy.should_retry(failure, 1), RetryDecision::Retry { attempt: 2 }));
//! ```

use tracing::{debug, instrument};

use super::RequestError;

/// Classification of request failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureType {
    /// Temporary failure that may succeed on retry.
    ///
    /// Examples: timeout, connection refused, 5xx server errors, 429.
    Transient,

    /// Failure that re-requesting will not fix.
    ///
    /// Examples: 404 Not Found, TLS errors, invalid URL.
    Permanent,
}

/// Decision on whether to make another attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RetryDecision {
    /// Try again; `attempt` is the 1-indexed number of the next attempt.
    Retry {
        /// Which attempt this will be.
        attempt: u32,
    },

    /// Stop and surface the last outcome.
    DoNotRetry {
        /// Human-readable reason.
        reason: String,
    },
}

/// Bounded attempt budget.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    max_attempts: u32,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self { max_attempts: 1 }
    }
}

impl RetryPolicy {
    /// Creates a policy allowing `max_attempts` attempts in total (minimum 1).
    #[must_use]
    pub fn new(max_attempts: u32) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
        }
    }

    /// Maximum number of attempts, including the initial one.
    #[must_use]
    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// Decides whether to retry after `attempt` (1-indexed) failed.
    #[instrument(level = "trace", skip(self), fields(max_attempts = self.max_attempts))]
    pub fn should_retry(&self, failure_type: FailureType, attempt: u32) -> RetryDecision {
        if failure_type == FailureType::Permanent {
            return RetryDecision::DoNotRetry {
                reason: "permanent failure - retry would not help".to_string(),
            };
        }

        if attempt >= self.max_attempts {
            debug!(attempt, max = self.max_attempts, "max attempts reached");
            return RetryDecision::DoNotRetry {
                reason: format!("max attempts ({}) exhausted", self.max_attempts),
            };
        }

        RetryDecision::Retry {
            attempt: attempt + 1,
        }
    }
}

/// Classifies a transport error for retry decisions.
///
/// | Error | Type |
/// |-------|------|
/// | Timeout | Transient |
/// | Network (TLS/certificate) | Permanent |
/// | Network (other) | Transient |
/// | Body read | Transient |
/// | HTTP status | see [`classify_http_status`] |
/// | Invalid URL, client build | Permanent |
#[must_use]
pub fn classify_error(error: &RequestError) -> FailureType {
    match error {
        RequestError::Timeout { .. } | RequestError::Body { .. } => FailureType::Transient,
        RequestError::Network { source, .. } => {
            if is_tls_error(source) {
                FailureType::Permanent
            } else {
                FailureType::Transient
            }
        }
        RequestError::HttpStatus { status, .. } => classify_http_status(*status),
        RequestError::InvalidUrl { .. } | RequestError::ClientBuild { .. } => {
            FailureType::Permanent
        }
    }
}

/// Classifies an HTTP status code.
///
/// Server errors, request timeouts (408) and rate limiting (429) are worth
/// another attempt; other client errors are not.
#[must_use]
#[allow(clippy::match_same_arms)]
pub fn classify_http_status(status: u16) -> FailureType {
    match status {
        408 => FailureType::Transient,
        429 => FailureType::Transient,
        400..=499 => FailureType::Permanent,
        500..=599 => FailureType::Transient,
        _ => FailureType::Permanent,
    }
}

fn is_tls_error(error: &reqwest::Error) -> bool {
    let error_string = error.to_string().to_lowercase();
    error_string.contains("certificate")
        || error_string.contains("tls")
        || error_string.contains("ssl")
        || error_string.contains("handshake")
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_policy_minimum_one_attempt() {
        assert_eq!(RetryPolicy::new(0).max_attempts(), 1);
        assert_eq!(RetryPolicy::default().max_attempts(), 1);
    }

    #[test]
    fn test_single_attempt_never_retries() {
        let policy = RetryPolicy::new(1);
        assert!(matches!(
            policy.should_retry(FailureType::Transient, 1),
            RetryDecision::DoNotRetry { .. }
        ));
    }

    #[test]
    fn test_transient_retries_until_budget_spent() {
        let policy = RetryPolicy::new(3);
        assert_eq!(
            policy.should_retry(FailureType::Transient, 1),
            RetryDecision::Retry { attempt: 2 }
        );
        assert_eq!(
            policy.should_retry(FailureType::Transient, 2),
            RetryDecision::Retry { attempt: 3 }
        );
        match policy.should_retry(FailureType::Transient, 3) {
            RetryDecision::DoNotRetry { reason } => assert!(reason.contains("exhausted")),
            other => panic!("expected DoNotRetry, got {other:?}"),
        }
    }

    #[test]
    fn test_permanent_never_retries() {
        let policy = RetryPolicy::new(5);
        match policy.should_retry(FailureType::Permanent, 1) {
            RetryDecision::DoNotRetry { reason } => assert!(reason.contains("permanent")),
            other => panic!("expected DoNotRetry, got {other:?}"),
        }
    }

    #[test]
    fn test_classify_http_status() {
        assert_eq!(classify_http_status(500), FailureType::Transient);
        assert_eq!(classify_http_status(503), FailureType::Transient);
        assert_eq!(classify_http_status(408), FailureType::Transient);
        assert_eq!(classify_http_status(429), FailureType::Transient);
        assert_eq!(classify_http_status(404), FailureType::Permanent);
        assert_eq!(classify_http_status(400), FailureType::Permanent);
    }

    #[test]
    fn test_classify_error_variants() {
        let timeout = RequestError::Timeout {
            url: "https://webbook.nist.gov".to_string(),
        };
        assert_eq!(classify_error(&timeout), FailureType::Transient);
        assert_eq!(
            classify_error(&RequestError::invalid_url("x")),
            FailureType::Permanent
        );
        assert_eq!(
            classify_error(&RequestError::http_status("u", 502, 1)),
            FailureType::Transient
        );
    }
}
