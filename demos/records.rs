//! Walks through a record lifecycle against a mock record store: concurrent callers share one
//! admin authentication, then the cached token backs create, list, view, and delete.

// crates.io
use color_eyre::Result;
use httpmock::prelude::*;
// self
use pocketbase_records::{api::Client, config::ClientConfig, query::Params};

#[tokio::main]
async fn main() -> Result<()> {
	color_eyre::install()?;

	let server = MockServer::start_async().await;
	let auth_mock = server
		.mock_async(|when, then| {
			when.method(POST).path("/api/admins/auth-with-password");
			then.status(200)
				.header("content-type", "application/json")
				.body("{\"token\":\"demo-admin-token\",\"admin\":{\"id\":\"a1\"}}");
		})
		.await;
	let create_mock = server
		.mock_async(|when, then| {
			when.method(POST)
				.path("/api/collections/articles/records")
				.header("x-origin", "demo");
			then.status(200).body("{\"id\":\"r1\",\"title\":\"Hello\"}");
		})
		.await;
	let list_mock = server
		.mock_async(|when, then| {
			when.method(GET).path("/api/collections/articles/records").query_param("page", "1");
			then.status(200).body("{\"page\":1,\"items\":[{\"id\":\"r1\"}]}");
		})
		.await;
	let view_mock = server
		.mock_async(|when, then| {
			when.method(GET).path("/api/collections/articles/records/missing");
			then.status(404).body("{\"message\":\"The requested resource wasn't found.\"}");
		})
		.await;
	let delete_mock = server
		.mock_async(|when, then| {
			when.method(DELETE).path("/api/collections/articles/records/r1");
			then.status(204);
		})
		.await;
	let config = ClientConfig::new(&server.base_url(), "admin@example.com", "demo-password")?;
	let client = Client::from_config(config)?;
	let (a, b) = tokio::join!(client.ensure_authenticated(), client.ensure_authenticated());

	a?;
	b?;

	println!("Admin token valid until {}.", client.token_expires_at());

	let created = client
		.create("articles", "demo", &serde_json::json!({ "title": "Hello" }))
		.await?;

	println!("Created: {}.", String::from_utf8_lossy(&created));

	let page = client.list("articles", &Params::default().page(1)).await?;

	println!("Listed: {}.", String::from_utf8_lossy(&page));

	match client.view("articles", "missing", &Params::default()).await {
		Err(err) if err.is_not_found() => println!("Record `missing` does not exist."),
		other => {
			other?;
		},
	}

	client.delete("articles", "r1", "demo").await?;

	auth_mock.assert_calls_async(1).await;
	create_mock.assert_async().await;
	list_mock.assert_async().await;
	view_mock.assert_async().await;
	delete_mock.assert_async().await;

	println!("Authentication attempts: {}.", client.auth_metrics.attempts());

	Ok(())
}
