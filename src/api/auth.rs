//! Admin token coordination with singleflight guards and a fixed TTL.
//!
//! The client exposes [`Client::ensure_authenticated`] so every operation starts from a valid
//! admin token without worrying about concurrent refreshes. A caller first takes a flight ticket,
//! then checks the cached token: a token whose expiry is strictly in the future is returned with
//! no I/O. Otherwise the caller boards the `"auth"` flight. The leader re-checks the cache, posts
//! the credentials, installs the token with `expiry = now + TTL`, and lands the outcome; every
//! caller that waited behind it receives that same token or that same error. Because the ticket is
//! taken before the cache check, a caller that read a stale expiry just before a refresh finished
//! still joins that refresh instead of starting a second one.

mod metrics;

pub use metrics::AuthMetrics;

// self
use crate::{
	_prelude::*,
	api::{Client, common},
	auth::AdminToken,
	error::{AuthenticationError, TransportError},
	flight::Boarding,
	http::{ApiRequest, RecordHttpClient},
	obs::{self, OperationKind, OperationOutcome, OperationSpan},
};

/// Singleflight key shared by every admin authentication of a client.
pub const AUTH_FLIGHT_KEY: &str = "auth";

const AUTH_PATH: [&str; 3] = ["api", "admins", "auth-with-password"];

#[derive(Deserialize)]
struct AuthResponse {
	token: String,
}

impl<C> Client<C>
where
	C: ?Sized + RecordHttpClient,
{
	/// Makes sure a valid admin token is cached, authenticating at most once across all
	/// concurrent callers.
	///
	/// Returns immediately when the cached token has not expired. On failure the cached token
	/// and expiry are left untouched.
	pub async fn ensure_authenticated(&self) -> Result<()> {
		self.access_token().await.map(|_| ())
	}

	/// Returns `true` if a cached token is usable right now.
	pub fn has_valid_token(&self) -> bool {
		self.session.read().is_valid_at(OffsetDateTime::now_utc())
	}

	/// Expiry of the cached token (the Unix epoch before the first authentication).
	pub fn token_expires_at(&self) -> OffsetDateTime {
		self.session.read().expires_at()
	}

	/// Drops the cached token so the next operation re-authenticates, e.g. after the record
	/// store answered 401 to a token it revoked early.
	pub fn invalidate_token(&self) {
		self.session.write().clear();
	}

	pub(crate) async fn access_token(&self) -> Result<AdminToken> {
		self.access_token_with(OffsetDateTime::now_utc).await
	}

	pub(crate) async fn access_token_with<N>(&self, now: N) -> Result<AdminToken>
	where
		N: Fn() -> OffsetDateTime,
	{
		const KIND: OperationKind = OperationKind::Authenticate;

		let flight = self.flights.flight(AUTH_FLIGHT_KEY);
		let ticket = flight.ticket();

		if let Some(token) = self.cached_token(now()) {
			self.auth_metrics.record_cache_hit();
			obs::record_operation_outcome(KIND, OperationOutcome::CacheHit);

			return Ok(token);
		}

		let span = OperationSpan::new(KIND, "ensure_authenticated");

		span.instrument(async move {
			let leader = match flight.board(ticket).await {
				Boarding::Landed(outcome) => {
					self.auth_metrics.record_joined();
					obs::record_operation_outcome(KIND, OperationOutcome::Joined);
					obs::trace_auth_joined(outcome.is_ok());

					return outcome.map_err(Error::from);
				},
				Boarding::Leader(leader) => leader,
			};

			if let Some(token) = self.cached_token(now()) {
				self.auth_metrics.record_cache_hit();
				obs::record_operation_outcome(KIND, OperationOutcome::CacheHit);

				return Ok(token);
			}

			obs::record_operation_outcome(KIND, OperationOutcome::Attempt);
			self.auth_metrics.record_attempt();

			let outcome = self.authenticate().await;

			match &outcome {
				Ok(token) => {
					let expires_at = {
						let mut session = self.session.write();

						session.install(token.clone(), now(), self.token_ttl);

						session.expires_at()
					};

					self.auth_metrics.record_success();
					obs::record_operation_outcome(KIND, OperationOutcome::Success);
					obs::record_token_expiry(expires_at);
					obs::trace_token_refreshed(expires_at);
				},
				Err(err) => {
					self.auth_metrics.record_failure();
					obs::record_operation_outcome(KIND, OperationOutcome::Failure);
					obs::trace_operation_failure(KIND, &Error::from(err.clone()));
				},
			}

			leader.land(&outcome);

			outcome.map_err(Error::from)
		})
		.await
	}

	fn cached_token(&self, instant: OffsetDateTime) -> Option<AdminToken> {
		self.session.read().valid_token_at(instant).cloned()
	}

	async fn authenticate(&self) -> Result<AdminToken, AuthenticationError> {
		let url = common::endpoint(&self.base_url, &AUTH_PATH);
		let body = serde_json::to_vec(&self.credentials.to_auth_body())
			.map_err(|err| AuthenticationError::InvalidRequest { message: err.to_string() })?;
		let request = ApiRequest::new(Method::POST, url).with_body(body);
		let response = self.http_client.execute(request).await.map_err(|err| {
			AuthenticationError::Transport { message: TransportError::network(err).render_chain() }
		})?;

		if !response.is_success() {
			return Err(AuthenticationError::Rejected {
				status: response.status,
				body: response.body_text(),
			});
		}

		let mut deserializer = serde_json::Deserializer::from_slice(&response.body);
		let parsed: AuthResponse = serde_path_to_error::deserialize(&mut deserializer)
			.map_err(|err| AuthenticationError::MalformedResponse { message: err.to_string() })?;

		if parsed.token.is_empty() {
			return Err(AuthenticationError::MalformedResponse {
				message: "token is empty".into(),
			});
		}

		Ok(AdminToken::new(parsed.token))
	}
}

#[cfg(test)]
mod tests {
	// crates.io
	use httpmock::prelude::*;
	use time::macros;
	// self
	use super::*;
	use crate::_preludet::{TEST_IDENTITY, TEST_PASSWORD, build_test_client};

	async fn mock_auth<'a>(server: &'a MockServer, status: u16, body: &str) -> httpmock::Mock<'a> {
		let body = body.to_owned();

		server
			.mock_async(move |when, then| {
				when.method(POST).path("/api/admins/auth-with-password").json_body(
					serde_json::json!({ "identity": TEST_IDENTITY, "password": TEST_PASSWORD }),
				);
				then.status(status).header("content-type", "application/json").body(body);
			})
			.await
	}

	#[tokio::test]
	async fn token_is_reused_until_ttl_elapses() {
		let server = MockServer::start_async().await;
		let mock = mock_auth(&server, 200, "{\"token\":\"tok-1\"}").await;
		let client = build_test_client(&server.base_url()).expect("Test client should build.");
		let t0 = macros::datetime!(2025-01-01 00:00 UTC);
		let first = client.access_token_with(|| t0).await.expect("Cold call should authenticate.");

		assert_eq!(first.expose(), "tok-1");
		assert_eq!(client.token_expires_at(), t0 + Duration::minutes(60));

		for minute in [1, 30, 59] {
			client
				.access_token_with(|| t0 + Duration::minutes(minute))
				.await
				.expect("Calls inside the TTL window should reuse the cached token.");
		}

		mock.assert_calls_async(1).await;

		client
			.access_token_with(|| t0 + Duration::minutes(60))
			.await
			.expect("Calls at the expiry instant should re-authenticate.");

		mock.assert_calls_async(2).await;

		assert_eq!(client.token_expires_at(), t0 + Duration::minutes(120));
		assert_eq!(client.auth_metrics.attempts(), 2);
		assert_eq!(client.auth_metrics.cache_hits(), 3);
	}

	#[tokio::test]
	async fn rejected_credentials_leave_state_untouched() {
		let server = MockServer::start_async().await;
		let mock = mock_auth(&server, 400, "{\"message\":\"Failed to authenticate.\"}").await;
		let client = build_test_client(&server.base_url()).expect("Test client should build.");
		let err = client
			.ensure_authenticated()
			.await
			.expect_err("Rejected credentials should surface as an error.");

		assert!(matches!(
			err,
			Error::Authentication(AuthenticationError::Rejected { status: 400, ref body })
				if body.contains("Failed to authenticate")
		));
		assert_eq!(client.token_expires_at(), OffsetDateTime::UNIX_EPOCH);
		assert!(!client.has_valid_token());
		assert_eq!(client.auth_metrics.failures(), 1);

		mock.assert_calls_async(1).await;
	}

	#[tokio::test]
	async fn malformed_success_body_is_reported_with_path() {
		let server = MockServer::start_async().await;
		let _mock = mock_auth(&server, 200, "{\"token\":42}").await;
		let client = build_test_client(&server.base_url()).expect("Test client should build.");
		let err = client
			.ensure_authenticated()
			.await
			.expect_err("A non-string token should be rejected.");

		match err {
			Error::Authentication(AuthenticationError::MalformedResponse { message }) =>
				assert!(message.starts_with("token"), "unexpected message: {message}"),
			other => panic!("Unexpected error variant: {other:?}."),
		}
		assert!(!client.has_valid_token());
	}

	#[tokio::test]
	async fn empty_token_is_rejected() {
		let server = MockServer::start_async().await;
		let _mock = mock_auth(&server, 200, "{\"token\":\"\"}").await;
		let client = build_test_client(&server.base_url()).expect("Test client should build.");
		let err = client.ensure_authenticated().await.expect_err("Empty tokens are unusable.");

		assert!(matches!(
			err,
			Error::Authentication(AuthenticationError::MalformedResponse { .. })
		));
	}

	#[tokio::test]
	async fn invalidate_forces_reauthentication() {
		let server = MockServer::start_async().await;
		let mock = mock_auth(&server, 200, "{\"token\":\"tok-1\"}").await;
		let client = build_test_client(&server.base_url()).expect("Test client should build.");

		client.ensure_authenticated().await.expect("First authentication should succeed.");
		client.ensure_authenticated().await.expect("Cached token should be reused.");

		mock.assert_calls_async(1).await;

		client.invalidate_token();

		assert!(!client.has_valid_token());

		client.ensure_authenticated().await.expect("Re-authentication should succeed.");

		mock.assert_calls_async(2).await;
	}
}
