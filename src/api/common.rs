//! Shared helpers for record operations (URL templating, request dispatch, response
//! classification, instrumentation).

// self
use crate::{
	_prelude::*,
	api::Client,
	error::TransportError,
	http::{ApiRequest, ApiResponse, InvalidHeader, RecordHttpClient},
	obs::{self, OperationKind, OperationOutcome, OperationSpan},
};

/// Appends percent-encoded `segments` to the base URL's path.
pub fn endpoint(base: &Url, segments: &[&str]) -> Url {
	let mut url = base.clone();

	url.set_query(None);
	url.set_fragment(None);

	if let Ok(mut path) = url.path_segments_mut() {
		path.pop_if_empty().extend(segments);
	}

	url
}

/// `/api/collections/{collection}/records`.
pub fn records_endpoint(base: &Url, collection: &str) -> Url {
	endpoint(base, &["api", "collections", collection, "records"])
}

/// `/api/collections/{collection}/records/{id}`.
pub fn record_endpoint(base: &Url, collection: &str, id: &str) -> Url {
	endpoint(base, &["api", "collections", collection, "records", id])
}

/// Maps a non-success response to [`Error::Api`] and hands back the body otherwise.
pub fn classify(operation: OperationKind, response: ApiResponse) -> Result<Vec<u8>> {
	if response.is_success() {
		Ok(response.body)
	} else {
		Err(Error::Api { operation, status: response.status, body: response.body_text() })
	}
}

/// Encodes `body` as JSON for `operation`.
pub fn encode_body<B>(operation: OperationKind, body: &B) -> Result<Vec<u8>>
where
	B: ?Sized + Serialize,
{
	serde_json::to_vec(body).map_err(|source| Error::Encode { operation, source })
}

pub(crate) fn invalid_header(operation: OperationKind) -> impl FnOnce(InvalidHeader) -> Error {
	move |InvalidHeader(header)| Error::InvalidHeader { operation, header }
}

impl<C> Client<C>
where
	C: ?Sized + RecordHttpClient,
{
	/// Sends `request`, mapping transport failures to [`Error::Transport`].
	pub(crate) async fn send(
		&self,
		operation: OperationKind,
		request: ApiRequest,
	) -> Result<ApiResponse> {
		self.http_client
			.execute(request)
			.await
			.map_err(|err| Error::Transport { operation, source: TransportError::network(err) })
	}

	/// Runs `fut` inside an operation span and records its outcome.
	pub(crate) async fn observe<T, Fut>(
		&self,
		operation: OperationKind,
		stage: &'static str,
		fut: Fut,
	) -> Result<T>
	where
		Fut: Future<Output = Result<T>>,
	{
		let span = OperationSpan::new(operation, stage);

		obs::record_operation_outcome(operation, OperationOutcome::Attempt);

		let result = span.instrument(fut).await;

		match &result {
			Ok(_) => obs::record_operation_outcome(operation, OperationOutcome::Success),
			Err(err) => {
				obs::record_operation_outcome(operation, OperationOutcome::Failure);
				obs::trace_operation_failure(operation, err);
			},
		}

		result
	}
}
