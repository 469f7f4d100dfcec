//! Transport primitives for record store calls.
//!
//! The module exposes [`RecordHttpClient`] alongside [`ApiRequest`] and [`ApiResponse`] so
//! downstream crates can plug in custom HTTP stacks. The client builds fully-formed requests
//! (URL, headers, JSON body) and hands them to the transport; the transport only moves bytes and
//! owns connection pooling, timeouts, and retries for requests that never received a response.
//! Once a status line has arrived the request is never re-sent, even if its body is cut off.

// crates.io
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderName, HeaderValue};
// self
use crate::{
	_prelude::*,
	auth::AdminToken,
	config::{ClientConfig, RetryPolicy},
	error::ConfigError,
};

/// Boxed future returned by [`RecordHttpClient::execute`].
pub type HttpFuture<'a, E> = Pin<Box<dyn Future<Output = Result<ApiResponse, E>> + 'a + Send>>;

/// Custom header naming the subsystem that issued a write.
pub const X_ORIGIN: &str = "x-origin";

/// Abstraction over HTTP transports capable of executing record store requests.
///
/// Implementations must be `Send + Sync + 'static` so one transport can back every clone of a
/// [`Client`](crate::api::Client), and the futures they return must be `Send` so callers can
/// spawn operations onto multi-threaded executors.
pub trait RecordHttpClient
where
	Self: 'static + Send + Sync,
{
	/// Concrete error emitted when no response was received.
	type TransportError: 'static + Send + Sync + StdError;

	/// Sends `request` and returns the status and body of the response, whatever the status.
	fn execute(&self, request: ApiRequest) -> HttpFuture<'_, Self::TransportError>;
}

/// Fully-built request handed to a [`RecordHttpClient`].
#[derive(Clone, Debug)]
pub struct ApiRequest {
	/// HTTP method.
	pub method: Method,
	/// Absolute URL including query parameters.
	pub url: Url,
	/// Request headers.
	pub headers: HeaderMap,
	/// Encoded JSON body, if any.
	pub body: Option<Vec<u8>>,
}
impl ApiRequest {
	/// Creates a JSON request (`Content-Type: application/json`) without a body.
	pub fn new(method: Method, url: Url) -> Self {
		let mut headers = HeaderMap::new();

		headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

		Self { method, url, headers, body: None }
	}

	/// Attaches an already encoded JSON body.
	pub fn with_body(mut self, body: Vec<u8>) -> Self {
		self.body = Some(body);

		self
	}

	/// Sets `Authorization: <token>`; the value is marked sensitive.
	pub fn with_token(self, token: &AdminToken) -> Result<Self, InvalidHeader> {
		self.with_header(AUTHORIZATION, "authorization", token.expose(), true)
	}

	/// Sets `X-Origin: <origin>`.
	pub fn with_origin(self, origin: &str) -> Result<Self, InvalidHeader> {
		self.with_header(HeaderName::from_static(X_ORIGIN), X_ORIGIN, origin, false)
	}

	fn with_header(
		mut self,
		name: HeaderName,
		label: &'static str,
		value: &str,
		sensitive: bool,
	) -> Result<Self, InvalidHeader> {
		let mut value = HeaderValue::from_str(value).map_err(|_| InvalidHeader(label))?;

		value.set_sensitive(sensitive);
		self.headers.insert(name, value);

		Ok(self)
	}
}

/// Header value rejected while building an [`ApiRequest`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct InvalidHeader(pub &'static str);

/// Status + body returned by a [`RecordHttpClient`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ApiResponse {
	/// HTTP status code.
	pub status: u16,
	/// Raw response body.
	pub body: Vec<u8>,
}
impl ApiResponse {
	/// Returns `true` for 2xx statuses.
	pub fn is_success(&self) -> bool {
		(200..300).contains(&self.status)
	}

	/// Body decoded lossily as UTF-8, for error messages.
	pub fn body_text(&self) -> String {
		String::from_utf8_lossy(&self.body).into_owned()
	}
}

/// Failure reported by [`ReqwestHttpClient`].
#[derive(Debug, ThisError)]
pub enum ReqwestTransportError {
	/// No response arrived; surfaced once the retry budget is spent.
	#[error("Request could not be sent.")]
	Send(#[source] ReqwestError),
	/// The status line arrived but the body could not be read; never retried.
	#[error("Response body could not be read after status {status}.")]
	Body {
		/// Status carried by the truncated response.
		status: u16,
		/// Body read failure.
		#[source]
		source: ReqwestError,
	},
}

/// Thin wrapper around [`ReqwestClient`] that applies a [`RetryPolicy`] to requests that failed
/// before any response arrived.
#[derive(Clone, Debug, Default)]
pub struct ReqwestHttpClient {
	client: ReqwestClient,
	retry: RetryPolicy,
}
impl ReqwestHttpClient {
	/// Wraps an existing reqwest [`ReqwestClient`].
	pub fn with_client(client: ReqwestClient, retry: RetryPolicy) -> Self {
		Self { client, retry }
	}

	/// Builds a client honoring the config's timeout and retry policy.
	pub fn from_config(config: &ClientConfig) -> Result<Self, ConfigError> {
		let mut builder = ReqwestClient::builder();

		if let Some(timeout) = config.request_timeout {
			builder = builder.timeout(timeout);
		}

		Ok(Self::with_client(builder.build()?, config.retry))
	}

	async fn execute_once(
		&self,
		request: &ApiRequest,
	) -> Result<ApiResponse, ReqwestTransportError> {
		let mut builder = self
			.client
			.request(request.method.clone(), request.url.clone())
			.headers(request.headers.clone());

		if let Some(body) = &request.body {
			builder = builder.body(body.clone());
		}

		let response = builder.send().await.map_err(ReqwestTransportError::Send)?;
		let status = response.status().as_u16();
		let body = response
			.bytes()
			.await
			.map_err(|source| ReqwestTransportError::Body { status, source })?
			.to_vec();

		Ok(ApiResponse { status, body })
	}
}
impl AsRef<ReqwestClient> for ReqwestHttpClient {
	fn as_ref(&self) -> &ReqwestClient {
		&self.client
	}
}
impl RecordHttpClient for ReqwestHttpClient {
	type TransportError = ReqwestTransportError;

	fn execute(&self, request: ApiRequest) -> HttpFuture<'_, Self::TransportError> {
		Box::pin(async move {
			let mut retry = 0;

			loop {
				match self.execute_once(&request).await {
					Err(ReqwestTransportError::Send(err)) if retry < self.retry.max_retries => {
						let wait = self.retry.backoff(retry);

						#[cfg(feature = "tracing")]
						tracing::warn!(
							method = %request.method,
							path = request.url.path(),
							retry = retry + 1,
							wait_ms = wait.as_millis() as u64,
							error = %err,
							"retrying record store request"
						);
						#[cfg(not(feature = "tracing"))]
						let _ = err;

						tokio::time::sleep(wait).await;

						retry += 1;
					},
					// A response (even a truncated one) means the server saw the request.
					outcome => return outcome,
				}
			}
		})
	}
}
