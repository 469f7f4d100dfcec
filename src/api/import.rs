//! Import callback forwarding (`POST /api/v1/import/callback`).

// self
use crate::{
	_prelude::*,
	api::{Client, common},
	http::{ApiRequest, RecordHttpClient},
	obs::OperationKind,
};

const IMPORT_CALLBACK_PATH: [&str; 4] = ["api", "v1", "import", "callback"];

impl<C> Client<C>
where
	C: ?Sized + RecordHttpClient,
{
	/// Forwards an import callback notification and returns the raw response body.
	pub async fn import_callback<B>(&self, body: &B) -> Result<Vec<u8>>
	where
		B: ?Sized + Serialize,
	{
		const KIND: OperationKind = OperationKind::ImportCallback;

		self.observe(KIND, "import_callback", async {
			let payload = common::encode_body(KIND, body)?;
			let token = self.access_token().await?;
			let request = ApiRequest::new(
				Method::POST,
				common::endpoint(&self.base_url, &IMPORT_CALLBACK_PATH),
			)
			.with_body(payload)
			.with_token(&token)
			.map_err(common::invalid_header(KIND))?;
			let response = self.send(KIND, request).await?;

			common::classify(KIND, response)
		})
		.await
	}
}
