mod common;

// std
use std::{sync::Arc, time::Duration as StdDuration};
// crates.io
use httpmock::prelude::*;
use serde_json::json;
// self
use common::{API_PATH, SequenceSource, builder};
use gigachat_client::{
	Client, Error,
	dispatch::ApiRequest,
	url::Url,
};

async fn client_with(server: &MockServer, source: Arc<SequenceSource>) -> Client {
	let config = builder(server).build().expect("Configuration should build.");

	Client::with_token_source(config, source).await.expect("Construction should succeed.")
}

fn ping(server: &MockServer) -> ApiRequest {
	let url = Url::parse(&server.url(API_PATH)).expect("Mock API endpoint should parse.");

	ApiRequest::post_json(url, &json!({ "ping": true })).expect("Request body should encode.")
}

#[tokio::test]
async fn rejected_token_is_refreshed_and_retried_once() {
	let server = MockServer::start_async().await;
	let source = SequenceSource::new();
	let rejected = server
		.mock_async(|when, then| {
			when.method(POST)
				.path(API_PATH)
				.header("authorization", "Bearer token-0")
				.json_body(json!({ "ping": true }));
			then.status(401).body("token expired");
		})
		.await;
	let accepted = server
		.mock_async(|when, then| {
			when.method(POST)
				.path(API_PATH)
				.header("authorization", "Bearer token-1")
				.header_exists("rquid")
				.json_body(json!({ "ping": true }));
			then.status(200).body(r#"{"pong":true}"#);
		})
		.await;
	let client = client_with(&server, source.clone()).await;
	let response = client.send(&ping(&server)).await.expect("Retry should succeed.");
	let body: serde_json::Value = response.json().expect("Response should decode.");

	assert_eq!(response.status, 200);
	assert_eq!(body, json!({ "pong": true }));
	assert_eq!(source.calls(), 2);
	assert_eq!(client.refresh_metrics().forced(), 1);
	assert_eq!(client.credential().access_token().expose(), "token-1");

	rejected.assert_calls_async(1).await;
	accepted.assert_calls_async(1).await;
	client.close().await;
}

#[tokio::test]
async fn second_rejection_is_surfaced() {
	let server = MockServer::start_async().await;
	let source = SequenceSource::new();
	let api = server
		.mock_async(|when, then| {
			when.method(POST).path(API_PATH);
			then.status(401).body("still rejected");
		})
		.await;
	let client = client_with(&server, source.clone()).await;
	let err = client.send(&ping(&server)).await.expect_err("Second 401 should fail.");

	match err {
		Error::AuthRejected { body } => assert_eq!(body, "still rejected"),
		other => panic!("Unexpected error: {other:?}."),
	}

	assert_eq!(source.calls(), 2);

	api.assert_calls_async(2).await;
	client.close().await;
}

#[tokio::test]
async fn other_statuses_pass_through_without_refresh() {
	let server = MockServer::start_async().await;
	let source = SequenceSource::new();
	let api = server
		.mock_async(|when, then| {
			when.method(POST).path(API_PATH);
			then.status(500).body("upstream failure");
		})
		.await;
	let client = client_with(&server, source.clone()).await;
	let err = client.send(&ping(&server)).await.expect_err("A 500 should fail.");

	assert!(matches!(err, Error::Server { status: 500, .. }));
	assert_eq!(err.status(), Some(500));
	assert_eq!(source.calls(), 1);
	assert_eq!(client.refresh_metrics().forced(), 0);

	api.assert_calls_async(1).await;
	client.close().await;
}

#[tokio::test]
async fn concurrent_rejections_share_one_forced_refresh() {
	let server = MockServer::start_async().await;
	let source = SequenceSource::delayed(StdDuration::from_millis(50));

	server
		.mock_async(|when, then| {
			when.method(POST).path(API_PATH).header("authorization", "Bearer token-0");
			then.status(401);
		})
		.await;

	let accepted = server
		.mock_async(|when, then| {
			when.method(POST).path(API_PATH).header("authorization", "Bearer token-1");
			then.status(200).body("{}");
		})
		.await;
	let client = client_with(&server, source.clone()).await;
	let request = ping(&server);
	let (first, second, third) =
		tokio::join!(client.send(&request), client.send(&request), client.send(&request));

	first.expect("First call should succeed after the shared refresh.");
	second.expect("Second call should succeed after the shared refresh.");
	third.expect("Third call should succeed after the shared refresh.");

	assert_eq!(source.calls(), 2);
	assert_eq!(client.refresh_metrics().forced(), 1);

	accepted.assert_calls_async(3).await;
	client.close().await;
}

#[tokio::test]
async fn dispatch_works_after_close() {
	let server = MockServer::start_async().await;
	let source = SequenceSource::new();

	server
		.mock_async(|when, then| {
			when.method(GET).path("/models").header("authorization", "Bearer token-0");
			then.status(200).body(r#"{"data":[]}"#);
		})
		.await;

	let client = client_with(&server, source).await;

	client.close().await;

	let url = Url::parse(&server.url("/models")).expect("Mock endpoint should parse.");
	let response =
		client.send(&ApiRequest::get(url)).await.expect("Calls should still use the stored token.");

	assert_eq!(response.status, 200);
}
