//! Helpers shared by the integration tests.

#![allow(dead_code)]

// std
use std::{
	sync::{
		Arc,
		atomic::{AtomicUsize, Ordering},
	},
	time::Duration as StdDuration,
};
// crates.io
use httpmock::prelude::*;
use time::{Duration, OffsetDateTime};
// self
use gigachat_client::{
	ClientConfig, ClientConfigBuilder, Credential,
	oauth::{TokenFuture, TokenSource},
};

/// API key used by every test; base64 of `test-id:test-secret`.
pub const API_KEY: &str = "dGVzdC1pZDp0ZXN0LXNlY3JldA==";
/// Path of the mocked token endpoint.
pub const OAUTH_PATH: &str = "/api/v2/oauth";
/// Path of the mocked completion endpoint.
pub const API_PATH: &str = "/api/v1/chat/completions";

/// JSON body the token endpoint answers with.
pub fn token_body(token: &str, lifetime: Duration) -> String {
	let expires_at = OffsetDateTime::now_utc() + lifetime;
	let millis = (expires_at.unix_timestamp_nanos() / 1_000_000) as i64;

	format!(r#"{{"access_token":"{token}","expires_at":{millis}}}"#)
}

/// Builder pointed at the mock server with default refresh tuning.
pub fn builder(server: &MockServer) -> ClientConfigBuilder {
	ClientConfig::builder(API_KEY)
		.oauth_url(server.url(OAUTH_PATH))
		.api_url(server.url(API_PATH))
		.timeout(StdDuration::from_secs(5))
}

/// Configuration whose refresh loop ticks every `interval` and treats every token as
/// stale, so each tick reaches the token endpoint.
pub fn eager_refresh_config(server: &MockServer, interval: StdDuration) -> ClientConfig {
	builder(server)
		.refresh_interval(interval)
		.refresh_timeout(StdDuration::from_secs(2))
		.freshness_margin(Duration::days(365))
		.build()
		.expect("Eager refresh configuration should build.")
}

/// Token source issuing `token-0`, `token-1`, ... with a one hour lifetime.
#[derive(Debug, Default)]
pub struct SequenceSource {
	calls: AtomicUsize,
	delay: Option<StdDuration>,
}
impl SequenceSource {
	/// Source that answers immediately.
	pub fn new() -> Arc<Self> {
		Arc::new(Self::default())
	}

	/// Source that sleeps for `delay` before answering.
	pub fn delayed(delay: StdDuration) -> Arc<Self> {
		Arc::new(Self { calls: AtomicUsize::new(0), delay: Some(delay) })
	}

	/// Number of completed and in-flight fetches.
	pub fn calls(&self) -> usize {
		self.calls.load(Ordering::SeqCst)
	}
}
impl TokenSource for SequenceSource {
	fn fetch(&self) -> TokenFuture<'_> {
		let n = self.calls.fetch_add(1, Ordering::SeqCst);

		Box::pin(async move {
			if let Some(delay) = self.delay {
				tokio::time::sleep(delay).await;
			}

			Ok(Credential::new(format!("token-{n}"), OffsetDateTime::now_utc() + Duration::hours(1)))
		})
	}
}
