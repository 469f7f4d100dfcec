//! Record store client: the admin token coordinator plus the record operations built on it.

pub mod auth;
pub mod common;
pub mod import;
pub mod records;

pub use auth::*;

// self
use crate::{
	_prelude::*,
	auth::{AdminCredentials, AdminToken, TokenState},
	config::ClientConfig,
	error::AuthenticationError,
	flight::SingleFlight,
	http::{RecordHttpClient, ReqwestHttpClient},
};

/// Typed client for a record store's REST API.
///
/// The client owns the HTTP transport, the admin credentials, and the cached admin token. Clones
/// share all of that state, so one client (or its clones) should back every caller in a process:
/// the token is fetched once per TTL window no matter how many callers race on it.
pub struct Client<C = ReqwestHttpClient>
where
	C: ?Sized + RecordHttpClient,
{
	/// HTTP transport used for every outbound request.
	pub http_client: Arc<C>,
	/// Shared counters for admin authentication outcomes.
	pub auth_metrics: Arc<AuthMetrics>,
	base_url: Url,
	credentials: AdminCredentials,
	token_ttl: Duration,
	session: Arc<RwLock<TokenState>>,
	flights: Arc<SingleFlight<AdminToken, AuthenticationError>>,
}
impl<C> Client<C>
where
	C: ?Sized + RecordHttpClient,
{
	/// Creates a client that sends requests through the caller-provided transport.
	pub fn with_http_client(config: ClientConfig, http_client: impl Into<Arc<C>>) -> Self {
		Self {
			http_client: http_client.into(),
			auth_metrics: Default::default(),
			base_url: config.base_url,
			credentials: config.credentials,
			token_ttl: config.token_ttl,
			session: Default::default(),
			flights: Default::default(),
		}
	}

	/// Record store root URL.
	pub fn base_url(&self) -> &Url {
		&self.base_url
	}

	/// Admin identity used for authentication.
	pub fn identity(&self) -> &str {
		self.credentials.identity()
	}

	/// Validity window assigned to each freshly issued token.
	pub fn token_ttl(&self) -> Duration {
		self.token_ttl
	}
}
impl Client<ReqwestHttpClient> {
	/// Creates a client for `base_url` authenticating as the given admin.
	///
	/// Uses the default 60 minute token TTL and the default transport retry policy; build a
	/// [`ClientConfig`] and call [`Client::from_config`] to adjust either.
	pub fn new(
		base_url: &str,
		identity: impl Into<String>,
		password: impl Into<String>,
	) -> Result<Self> {
		Self::from_config(ClientConfig::new(base_url, identity, password)?)
	}

	/// Creates a client whose reqwest transport honors `config`'s timeout and retry policy.
	pub fn from_config(config: ClientConfig) -> Result<Self> {
		let http_client = ReqwestHttpClient::from_config(&config)?;

		Ok(Self::with_http_client(config, http_client))
	}
}
impl<C> Clone for Client<C>
where
	C: ?Sized + RecordHttpClient,
{
	fn clone(&self) -> Self {
		Self {
			http_client: self.http_client.clone(),
			auth_metrics: self.auth_metrics.clone(),
			base_url: self.base_url.clone(),
			credentials: self.credentials.clone(),
			token_ttl: self.token_ttl,
			session: self.session.clone(),
			flights: self.flights.clone(),
		}
	}
}
impl<C> Debug for Client<C>
where
	C: ?Sized + RecordHttpClient,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("Client")
			.field("base_url", &self.base_url.as_str())
			.field("credentials", &self.credentials)
			.field("token_ttl", &self.token_ttl)
			.field("session", &*self.session.read())
			.finish()
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn debug_never_renders_secrets() {
		let client = Client::new("http://127.0.0.1:8090", "admin@example.com", "hunter2")
			.expect("Client should build for a plain HTTP base URL.");
		let rendered = format!("{client:?}");

		assert!(rendered.contains("admin@example.com"));
		assert!(!rendered.contains("hunter2"));
	}

	#[test]
	fn new_rejects_bad_base_url() {
		let err = Client::new("::not-a-url::", "admin@example.com", "hunter2")
			.expect_err("Invalid base URLs should be rejected.");

		assert!(matches!(err, Error::Config(_)));
	}

	#[test]
	fn clones_share_token_state() {
		let client = Client::new("http://127.0.0.1:8090", "admin@example.com", "hunter2")
			.expect("Client should build for a plain HTTP base URL.");
		let clone = client.clone();

		client.session.write().install(
			AdminToken::new("shared"),
			OffsetDateTime::now_utc(),
			Duration::minutes(60),
		);

		assert!(clone.has_valid_token());
	}
}
