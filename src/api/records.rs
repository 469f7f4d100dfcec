//! Record CRUD operations against `/api/collections/{collection}/records`.
//!
//! Every operation obtains an admin token first; if authentication fails, the error is returned
//! and no record request is sent. Successful calls hand back the raw response body so callers
//! decode into their own record types.

// self
use crate::{
	_prelude::*,
	api::{Client, common},
	http::{ApiRequest, RecordHttpClient},
	obs::OperationKind,
	query::Params,
};

impl<C> Client<C>
where
	C: ?Sized + RecordHttpClient,
{
	/// Creates a record in `collection`, tagging the write with `origin` (`X-Origin`).
	pub async fn create<B>(&self, collection: &str, origin: &str, body: &B) -> Result<Vec<u8>>
	where
		B: ?Sized + Serialize,
	{
		const KIND: OperationKind = OperationKind::Create;

		self.observe(KIND, "create", async {
			let payload = common::encode_body(KIND, body)?;
			let token = self.access_token().await?;
			let request = ApiRequest::new(
				Method::POST,
				common::records_endpoint(&self.base_url, collection),
			)
			.with_body(payload)
			.with_token(&token)
			.and_then(|request| request.with_origin(origin))
			.map_err(common::invalid_header(KIND))?;
			let response = self.send(KIND, request).await?;

			common::classify(KIND, response)
		})
		.await
	}

	/// Patches record `id` in `collection`, tagging the write with `origin` (`X-Origin`).
	pub async fn update<B>(
		&self,
		collection: &str,
		id: &str,
		origin: &str,
		body: &B,
	) -> Result<Vec<u8>>
	where
		B: ?Sized + Serialize,
	{
		const KIND: OperationKind = OperationKind::Update;

		self.observe(KIND, "update", async {
			let payload = common::encode_body(KIND, body)?;
			let token = self.access_token().await?;
			let request = ApiRequest::new(
				Method::PATCH,
				common::record_endpoint(&self.base_url, collection, id),
			)
			.with_body(payload)
			.with_token(&token)
			.and_then(|request| request.with_origin(origin))
			.map_err(common::invalid_header(KIND))?;
			let response = self.send(KIND, request).await?;

			common::classify(KIND, response)
		})
		.await
	}

	/// Deletes record `id` from `collection`, tagging the write with `origin` (`X-Origin`).
	pub async fn delete(&self, collection: &str, id: &str, origin: &str) -> Result<Vec<u8>> {
		const KIND: OperationKind = OperationKind::Delete;

		self.observe(KIND, "delete", async {
			let token = self.access_token().await?;
			let request = ApiRequest::new(
				Method::DELETE,
				common::record_endpoint(&self.base_url, collection, id),
			)
			.with_token(&token)
			.and_then(|request| request.with_origin(origin))
			.map_err(common::invalid_header(KIND))?;
			let response = self.send(KIND, request).await?;

			common::classify(KIND, response)
		})
		.await
	}

	/// Lists records in `collection`. Only parameters with a non-default value are sent.
	pub async fn list(&self, collection: &str, params: &Params) -> Result<Vec<u8>> {
		const KIND: OperationKind = OperationKind::List;

		self.observe(KIND, "list", async {
			let token = self.access_token().await?;
			let mut url = common::records_endpoint(&self.base_url, collection);

			params.apply_list(&mut url);

			let request = ApiRequest::new(Method::GET, url)
				.with_token(&token)
				.map_err(common::invalid_header(KIND))?;
			let response = self.send(KIND, request).await?;

			common::classify(KIND, response)
		})
		.await
	}

	/// Fetches record `id` from `collection`; only `params.fields` is sent.
	///
	/// A 404 maps to [`Error::NotFound`], so callers can branch on [`Error::is_not_found`]
	/// without inspecting the message.
	pub async fn view(&self, collection: &str, id: &str, params: &Params) -> Result<Vec<u8>> {
		const KIND: OperationKind = OperationKind::View;

		self.observe(KIND, "view", async {
			let token = self.access_token().await?;
			let mut url = common::record_endpoint(&self.base_url, collection, id);

			params.apply_view(&mut url);

			let request = ApiRequest::new(Method::GET, url)
				.with_token(&token)
				.map_err(common::invalid_header(KIND))?;
			let response = self.send(KIND, request).await?;

			if response.status == 404 {
				return Err(Error::NotFound { collection: collection.into(), id: id.into() });
			}

			common::classify(KIND, response)
		})
		.await
	}
}
