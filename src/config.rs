//! Client construction parameters: base URL, admin credentials, token lifetime, and the transport
//! timeout + retry budget.

// self
use crate::{
	_prelude::*,
	auth::{AdminCredentials, DEFAULT_TOKEN_TTL},
	error::ConfigError,
};

/// Everything a [`Client`](crate::api::Client) needs, supplied once at construction.
#[derive(Clone, Debug)]
pub struct ClientConfig {
	/// Record store root; API paths are appended to its path segments.
	pub base_url: Url,
	/// Admin account used by the authentication endpoint.
	pub credentials: AdminCredentials,
	/// Validity window assigned to each freshly issued token.
	pub token_ttl: Duration,
	/// Per-request timeout enforced by the transport, if any.
	pub request_timeout: Option<StdDuration>,
	/// Transport-level retry budget for requests that never received a response.
	pub retry: RetryPolicy,
}
impl ClientConfig {
	/// Validates `base_url` and creates a config with default TTL, no timeout, and the default
	/// retry policy.
	pub fn new(
		base_url: &str,
		identity: impl Into<String>,
		password: impl Into<String>,
	) -> Result<Self, ConfigError> {
		let base_url =
			Url::parse(base_url).map_err(|source| ConfigError::InvalidBaseUrl { source })?;

		if base_url.cannot_be_a_base() {
			return Err(ConfigError::CannotBeABase { url: base_url.into() });
		}

		Ok(Self {
			base_url,
			credentials: AdminCredentials::new(identity, password),
			token_ttl: DEFAULT_TOKEN_TTL,
			request_timeout: None,
			retry: RetryPolicy::default(),
		})
	}

	/// Overrides the token validity window (defaults to 60 minutes).
	pub fn with_token_ttl(mut self, ttl: Duration) -> Self {
		self.token_ttl = if ttl.is_negative() { Duration::ZERO } else { ttl };

		self
	}

	/// Sets a per-request timeout on the transport.
	pub fn with_request_timeout(mut self, timeout: StdDuration) -> Self {
		self.request_timeout = Some(timeout);

		self
	}

	/// Replaces the transport retry policy.
	pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
		self.retry = retry;

		self
	}
}

/// Bounded exponential backoff applied by the transport when no response was received.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RetryPolicy {
	/// Retries after the first attempt.
	pub max_retries: u32,
	/// Wait before the first retry; doubled for each subsequent one.
	pub initial_wait: StdDuration,
	/// Upper bound for any single wait.
	pub max_wait: StdDuration,
}
impl RetryPolicy {
	/// Policy that never retries.
	pub const fn disabled() -> Self {
		Self { max_retries: 0, initial_wait: StdDuration::ZERO, max_wait: StdDuration::ZERO }
	}

	/// Wait before retry number `retry` (zero-based), capped at `max_wait`.
	pub fn backoff(&self, retry: u32) -> StdDuration {
		let factor = 2_u32.checked_pow(retry).unwrap_or(u32::MAX);

		self.initial_wait.checked_mul(factor).unwrap_or(self.max_wait).min(self.max_wait)
	}
}
impl Default for RetryPolicy {
	fn default() -> Self {
		Self {
			max_retries: 3,
			initial_wait: StdDuration::from_secs(3),
			max_wait: StdDuration::from_secs(10),
		}
	}
}
