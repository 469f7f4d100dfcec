#![cfg(feature = "test")]

// std
use std::{
	io,
	sync::atomic::{AtomicBool, Ordering},
};
// crates.io
use parking_lot::Mutex;
// self
use pocketbase_records::{
	_preludet::*,
	api::Client,
	error::{AuthenticationError, TransportError},
	http::{ApiRequest, ApiResponse, HttpFuture, RecordHttpClient},
	obs::OperationKind,
	query::Params,
};

#[derive(Default)]
struct ScriptedTransport {
	requests: Mutex<Vec<ApiRequest>>,
	offline: AtomicBool,
}
impl ScriptedTransport {
	fn paths(&self) -> Vec<String> {
		self.requests.lock().iter().map(|request| request.url.path().to_owned()).collect()
	}
}
impl RecordHttpClient for ScriptedTransport {
	type TransportError = io::Error;

	fn execute(&self, request: ApiRequest) -> HttpFuture<'_, Self::TransportError> {
		let offline = self.offline.load(Ordering::SeqCst);
		let is_auth = request.url.path().ends_with("/auth-with-password");

		self.requests.lock().push(request);

		Box::pin(async move {
			if offline {
				return Err(io::Error::new(io::ErrorKind::ConnectionRefused, "store offline"));
			}

			let body = if is_auth { b"{\"token\":\"tok-scripted\"}".to_vec() } else { b"{}".to_vec() };

			Ok(ApiResponse { status: 200, body })
		})
	}
}

fn scripted_client() -> (Arc<ScriptedTransport>, Client<ScriptedTransport>) {
	let transport = Arc::new(ScriptedTransport::default());
	let config =
		test_client_config("http://records.internal/").expect("Fixture base URL should parse.");
	let client = Client::with_http_client(config, transport.clone());

	(transport, client)
}

#[tokio::test]
async fn custom_transport_receives_explicit_token_per_request() {
	let (transport, client) = scripted_client();

	client.list("widgets", &Params::default().page(1)).await.expect("List should succeed.");
	client.view("widgets", "w1", &Params::default()).await.expect("View should succeed.");

	assert_eq!(
		transport.paths(),
		[
			"/api/admins/auth-with-password",
			"/api/collections/widgets/records",
			"/api/collections/widgets/records/w1",
		]
	);

	let requests = transport.requests.lock();

	assert!(requests[0].headers.get("authorization").is_none());
	assert_eq!(requests[0].method, Method::POST);

	for request in &requests[1..] {
		let token = request.headers.get("authorization").expect("Record calls carry the token.");

		assert!(token.is_sensitive());
		assert_eq!(token.to_str().ok(), Some("tok-scripted"));
	}

	assert_eq!(requests[1].url.query(), Some("page=1"));
	assert_eq!(requests[2].url.query(), None);
}

#[tokio::test]
async fn offline_store_fails_authentication_with_transport_error() {
	let (transport, client) = scripted_client();

	transport.offline.store(true, Ordering::SeqCst);

	let err = client
		.create("widgets", "importer", &serde_json::json!({ "name": "gear" }))
		.await
		.expect_err("Offline transport should fail authentication.");

	match err {
		Error::Authentication(AuthenticationError::Transport { message }) => {
			assert!(message.contains("store offline"));
		},
		other => panic!("Unexpected error variant: {other:?}."),
	}

	assert_eq!(transport.paths(), ["/api/admins/auth-with-password"]);
	assert_eq!(client.auth_metrics.failures(), 1);
}

#[tokio::test]
async fn transport_failure_after_authentication_keeps_token() {
	let (transport, client) = scripted_client();

	client.ensure_authenticated().await.expect("Authentication should succeed.");
	transport.offline.store(true, Ordering::SeqCst);

	let err = client
		.delete("widgets", "w1", "janitor")
		.await
		.expect_err("Offline transport should fail the delete.");

	assert!(matches!(
		err,
		Error::Transport { operation: OperationKind::Delete, source: TransportError::Network { .. } }
	));
	assert!(err.status().is_none());
	assert!(client.has_valid_token());
	assert_eq!(transport.paths().len(), 2);
}
