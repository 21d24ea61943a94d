//! Demonstrates the client end to end against a local mock of the token and completion
//! endpoints: build the configuration, exchange the key, generate, then close.

// std
use std::time::Duration as StdDuration;
// crates.io
use color_eyre::Result;
use httpmock::prelude::*;
use time::{Duration, OffsetDateTime};
// self
use gigachat_client::{ApiKey, Client, ClientConfig, Message};

#[tokio::main]
async fn main() -> Result<()> {
	color_eyre::install()?;

	let server = MockServer::start_async().await;
	let expires_at = OffsetDateTime::now_utc() + Duration::minutes(30);
	let token_mock = server
		.mock_async(|when, then| {
			when.method(POST).path("/api/v2/oauth");
			then.status(200).header("content-type", "application/json").body(format!(
				"{{\"access_token\":\"demo-access\",\"expires_at\":{}}}",
				expires_at.unix_timestamp() * 1_000,
			));
		})
		.await;
	let completion_mock = server
		.mock_async(|when, then| {
			when.method(POST)
				.path("/api/v1/chat/completions")
				.header("authorization", "Bearer demo-access");
			then.status(200).header("content-type", "application/json").body(
				"{\"choices\":[{\"message\":{\"role\":\"assistant\",\"content\":\"Paris.\"},\"index\":0,\"finish_reason\":\"stop\"}]}",
			);
		})
		.await;
	let api_key = ApiKey::from_client_credentials("demo-client", "demo-secret");
	let config = ClientConfig::builder(api_key)
		.oauth_url(server.url("/api/v2/oauth"))
		.api_url(server.url("/api/v1/chat/completions"))
		.timeout(StdDuration::from_secs(5))
		.build()?;
	let client = Client::new(config).await?;
	let response = client
		.generative_model("GigaChat")
		.with_system_instruction("Answer in one word.")
		.generate(&[Message::user("The capital of France is")])
		.await?;

	println!("Model answered: {}.", response.text().unwrap_or_default());

	client.close().await;
	token_mock.assert_async().await;
	completion_mock.assert_async().await;

	Ok(())
}
