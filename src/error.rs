//! Client-level error types shared across the coordinator, transport, and record operations.

// self
use crate::{_prelude::*, obs::OperationKind};

/// Client-wide result type alias returning [`Error`] by default.
pub type Result<T, E = Error> = std::result::Result<T, E>;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Canonical client error exposed by public APIs.
#[derive(Debug, ThisError)]
pub enum Error {
	/// Local configuration problem.
	#[error(transparent)]
	Config(#[from] ConfigError),
	/// Admin authentication failed; every operation is blocked until it succeeds.
	#[error(transparent)]
	Authentication(#[from] AuthenticationError),

	/// Request never completed (DNS, TCP, TLS, timeout, or a response body cut off mid-read).
	#[error("[{operation}] Request to the record store failed in transport.")]
	Transport {
		/// Operation that issued the request.
		operation: OperationKind,
		/// Underlying transport failure.
		#[source]
		source: TransportError,
	},
	/// Requested record does not exist (only raised by view).
	#[error("[view] Record `{id}` was not found in collection `{collection}`.")]
	NotFound {
		/// Collection that was queried.
		collection: String,
		/// Record identifier that was queried.
		id: String,
	},
	/// Record store answered with a non-success status.
	#[error("[{operation}] Record store returned status {status}: {body}.")]
	Api {
		/// Operation that issued the request.
		operation: OperationKind,
		/// HTTP status code.
		status: u16,
		/// Raw response body, lossily decoded as UTF-8.
		body: String,
	},
	/// Request body could not be serialized as JSON.
	#[error("[{operation}] Request body could not be encoded as JSON.")]
	Encode {
		/// Operation that attempted the encoding.
		operation: OperationKind,
		/// Serialization failure.
		#[source]
		source: serde_json::Error,
	},
	/// A caller-supplied value cannot be sent as an HTTP header.
	#[error("[{operation}] Value for header `{header}` is not a valid header value.")]
	InvalidHeader {
		/// Operation that built the request.
		operation: OperationKind,
		/// Header name.
		header: &'static str,
	},
}
impl Error {
	/// Returns `true` when a view targeted a record that does not exist.
	pub fn is_not_found(&self) -> bool {
		matches!(self, Self::NotFound { .. })
	}

	/// Returns the HTTP status code carried by the error, if any.
	pub fn status(&self) -> Option<u16> {
		match self {
			Self::NotFound { .. } => Some(404),
			Self::Api { status, .. } => Some(*status),
			Self::Authentication(AuthenticationError::Rejected { status, .. }) => Some(*status),
			_ => None,
		}
	}
}

/// Configuration and validation failures raised while constructing a client.
#[derive(Debug, ThisError)]
pub enum ConfigError {
	/// HTTP client could not be constructed.
	#[error("HTTP client could not be constructed.")]
	HttpClientBuild {
		/// Underlying transport builder failure.
		#[source]
		source: BoxError,
	},
	/// Base URL cannot be parsed.
	#[error("Base URL is invalid.")]
	InvalidBaseUrl {
		/// Underlying parsing failure.
		#[source]
		source: url::ParseError,
	},
	/// Base URL cannot carry path segments (e.g. `mailto:`).
	#[error("Base URL `{url}` cannot be used as a base for API paths.")]
	CannotBeABase {
		/// Offending URL.
		url: String,
	},
}
impl ConfigError {
	/// Wraps a transport's builder failure inside [`ConfigError`].
	pub fn http_client_build(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::HttpClientBuild { source: Box::new(src) }
	}
}
impl From<ReqwestError> for ConfigError {
	fn from(e: ReqwestError) -> Self {
		Self::http_client_build(e)
	}
}

/// Admin authentication failures.
///
/// Values are cloneable so every caller joined on one authentication flight observes the same
/// failure.
#[derive(Clone, Debug, PartialEq, Eq, ThisError)]
pub enum AuthenticationError {
	/// The authentication request never completed.
	#[error("[auth] Authentication request failed in transport: {message}.")]
	Transport {
		/// Rendered transport failure.
		message: String,
	},
	/// The authentication endpoint rejected the credentials or failed.
	#[error("[auth] Record store returned status {status}: {body}.")]
	Rejected {
		/// HTTP status code.
		status: u16,
		/// Raw response body, lossily decoded as UTF-8.
		body: String,
	},
	/// The authentication request could not be built.
	#[error("[auth] Authentication request could not be built: {message}.")]
	InvalidRequest {
		/// Rendered encoding failure.
		message: String,
	},
	/// The authentication endpoint answered 2xx without a usable token.
	#[error("[auth] Authentication response is malformed: {message}.")]
	MalformedResponse {
		/// Parsing failure including the JSON path that failed.
		message: String,
	},
}

/// Transport-level failures (network, IO).
#[derive(Debug, ThisError)]
pub enum TransportError {
	/// Underlying HTTP client reported a network failure.
	#[error("Network error occurred while calling the record store.")]
	Network {
		/// Transport-specific network error.
		#[source]
		source: BoxError,
	},
	/// Underlying IO failure surfaced during transport.
	#[error("I/O error occurred while calling the record store.")]
	Io(#[from] std::io::Error),
}
impl TransportError {
	/// Wraps a transport-specific network error.
	pub fn network(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::Network { source: Box::new(src) }
	}

	/// Renders the error together with its source chain.
	pub fn render_chain(&self) -> String {
		let mut rendered = self.to_string();
		let mut source = StdError::source(self);

		while let Some(err) = source {
			rendered.push_str(": ");
			rendered.push_str(&err.to_string());

			source = err.source();
		}

		rendered
	}
}
impl From<ReqwestError> for TransportError {
	fn from(e: ReqwestError) -> Self {
		Self::network(e)
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn not_found_flag_only_set_for_not_found() {
		let missing = Error::NotFound { collection: "widgets".into(), id: "w-1".into() };
		let failed =
			Error::Api { operation: OperationKind::View, status: 500, body: "boom".into() };

		assert!(missing.is_not_found());
		assert_eq!(missing.status(), Some(404));
		assert!(!failed.is_not_found());
		assert_eq!(failed.status(), Some(500));
	}

	#[test]
	fn api_error_carries_operation_status_and_body() {
		let err = Error::Api {
			operation: OperationKind::ImportCallback,
			status: 422,
			body: "{\"message\":\"bad\"}".into(),
		};

		assert_eq!(
			err.to_string(),
			"[import_callback] Record store returned status 422: {\"message\":\"bad\"}."
		);
	}

	#[test]
	fn authentication_errors_convert_and_expose_status() {
		let auth = AuthenticationError::Rejected { status: 400, body: "invalid".into() };
		let err: Error = auth.clone().into();

		assert!(matches!(err, Error::Authentication(ref inner) if *inner == auth));
		assert_eq!(err.status(), Some(400));
		assert!(err.to_string().starts_with("[auth]"));
	}

	#[test]
	fn transport_chain_includes_sources() {
		let io = std::io::Error::new(std::io::ErrorKind::ConnectionRefused, "refused");
		let err = TransportError::network(io);

		assert_eq!(
			err.render_chain(),
			"Network error occurred while calling the record store.: refused"
		);
	}
}
