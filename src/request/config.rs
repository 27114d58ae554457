//! Request configuration shared by every WebBook call.
//!
//! A [`RequestConfig`] is an immutable value: build it once, clone it freely,
//! and share it across tasks. There is no process-wide default; callers that
//! want the defaults construct [`RequestConfig::default`] explicitly.

use std::time::Duration;

use thiserror::Error;

use crate::user_agent;

/// Default delay after each response (none).
pub const DEFAULT_DELAY: Duration = Duration::ZERO;

/// Default number of attempts per request (no retries).
pub const DEFAULT_MAX_ATTEMPTS: u32 = 1;

/// Default whole-request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Default connect timeout.
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Invalid request configuration values.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    /// Delay was negative, not finite, or too large to represent.
    #[error("delay must be a non-negative number of seconds: {value}")]
    InvalidDelay {
        /// The rejected value.
        value: f64,
    },

    /// Attempt count below one.
    #[error("max_attempts must be a positive integer: {value}")]
    InvalidMaxAttempts {
        /// The rejected value.
        value: u32,
    },

    /// A zero timeout.
    #[error("{name} must be greater than zero")]
    InvalidTimeout {
        /// Which timeout was rejected.
        name: &'static str,
    },
}

/// Options forwarded to the HTTP transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportOptions {
    /// Whole-request timeout (connect + read).
    pub timeout: Duration,
    /// TCP/TLS connect timeout.
    pub connect_timeout: Duration,
    /// User-Agent header value.
    pub user_agent: String,
}

impl Default for TransportOptions {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT,
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
            user_agent: user_agent::default_user_agent(),
        }
    }
}

/// Delay, attempt budget, and transport options for WebBook requests.
///
/// # Example
///
/// ```
/// use std::time::Duration;
/// use webbook::request::RequestConfig;
///
/// let config = RequestConfig::default()
///     .with_delay_secs(1.5)?
///     .with_max_attempts(3)?
///     .with_timeout(Duration::from_secs(10))?;
/// assert_eq!(config.max_attempts(), 3);
/// # Ok::<(), webbook::request::ConfigError>(())
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct RequestConfig {
    delay: Duration,
    max_attempts: u32,
    transport: TransportOptions,
}

impl Default for RequestConfig {
    fn default() -> Self {
        Self {
            delay: DEFAULT_DELAY,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            transport: TransportOptions::default(),
        }
    }
}

impl RequestConfig {
    /// Creates a validated configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] for a negative/non-finite delay, zero attempts,
    /// or zero timeouts.
    pub fn new(
        delay_secs: f64,
        max_attempts: u32,
        transport: TransportOptions,
    ) -> Result<Self, ConfigError> {
        Self::default()
            .with_delay_secs(delay_secs)?
            .with_max_attempts(max_attempts)?
            .with_transport(transport)
    }

    /// Returns a copy with a different inter-request delay.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidDelay`] if the value is negative, not
    /// finite, or too large for a [`Duration`].
    pub fn with_delay_secs(mut self, delay_secs: f64) -> Result<Self, ConfigError> {
        if !delay_secs.is_finite() || delay_secs < 0.0 {
            return Err(ConfigError::InvalidDelay { value: delay_secs });
        }
        self.delay = Duration::try_from_secs_f64(delay_secs)
            .map_err(|_| ConfigError::InvalidDelay { value: delay_secs })?;
        Ok(self)
    }

    /// Returns a copy with a different attempt budget.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidMaxAttempts`] for zero.
    pub fn with_max_attempts(mut self, max_attempts: u32) -> Result<Self, ConfigError> {
        if max_attempts == 0 {
            return Err(ConfigError::InvalidMaxAttempts {
                value: max_attempts,
            });
        }
        self.max_attempts = max_attempts;
        Ok(self)
    }

    /// Returns a copy with a different whole-request timeout.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidTimeout`] for a zero duration.
    pub fn with_timeout(mut self, timeout: Duration) -> Result<Self, ConfigError> {
        if timeout.is_zero() {
            return Err(ConfigError::InvalidTimeout { name: "timeout" });
        }
        self.transport.timeout = timeout;
        Ok(self)
    }

    /// Returns a copy with different transport options.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidTimeout`] if either timeout is zero.
    pub fn with_transport(mut self, transport: TransportOptions) -> Result<Self, ConfigError> {
        if transport.timeout.is_zero() {
            return Err(ConfigError::InvalidTimeout { name: "timeout" });
        }
        if transport.connect_timeout.is_zero() {
            return Err(ConfigError::InvalidTimeout {
                name: "connect_timeout",
            });
        }
        self.transport = transport;
        Ok(self)
    }

    /// Returns a copy with a different User-Agent.
    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.transport.user_agent = user_agent.into();
        self
    }

    /// Pause applied after each response.
    #[must_use]
    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Maximum attempts per request, including the first.
    #[must_use]
    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// Transport options.
    #[must_use]
    pub fn transport(&self) -> &TransportOptions {
        &self.transport
    }
}
