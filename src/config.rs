//! Client configuration resolved before a [`Client`](crate::Client) exists.
//!
//! Defaults are named constants rather than hidden globals; [`ClientConfigBuilder`]
//! validates everything up front so construction never depends on option order.

pub mod builder;

pub use builder::ClientConfigBuilder;

// self
use crate::{
	_prelude::*,
	auth::{ApiKey, FreshnessPolicy},
};

/// Default chat completions endpoint.
pub const DEFAULT_API_URL: &str = "https://gigachat.devices.sberbank.ru/api/v1/chat/completions";
/// Default OAuth token endpoint.
pub const DEFAULT_OAUTH_URL: &str = "https://ngw.devices.sberbank.ru:9443/api/v2/oauth";
/// Default OAuth scope (personal API access).
pub const DEFAULT_SCOPE: &str = "GIGACHAT_API_PERS";
/// Default per-request timeout of the managed HTTP client.
pub const DEFAULT_TIMEOUT: StdDuration = StdDuration::from_secs(30);
/// Default tick of the background refresh loop.
pub const DEFAULT_REFRESH_INTERVAL: StdDuration = StdDuration::from_secs(60);
/// Default budget for a single background refresh attempt.
pub const DEFAULT_REFRESH_TIMEOUT: StdDuration = StdDuration::from_secs(30);

/// Fully resolved client configuration.
#[derive(Clone, Debug)]
pub struct ClientConfig {
	/// Authorization key for the token endpoint.
	pub api_key: ApiKey,
	/// Chat completions endpoint.
	pub api_url: Url,
	/// OAuth token endpoint.
	pub oauth_url: Url,
	/// OAuth scope requested for every token.
	pub scope: String,
	/// HTTP transport shared by the token source and dispatcher.
	pub transport: HttpTransport,
	/// Background refresh tuning.
	pub refresh: RefreshPolicy,
}
impl ClientConfig {
	/// Returns a builder seeded with the provided API key and documented defaults.
	pub fn builder(api_key: impl Into<ApiKey>) -> ClientConfigBuilder {
		ClientConfigBuilder::new(api_key)
	}
}

/// HTTP stack used by the client.
#[derive(Clone, Debug)]
pub enum HttpTransport {
	/// Client built and owned by this crate.
	Managed {
		/// Per-request timeout.
		timeout: StdDuration,
		/// Disables certificate verification. Only for trusted test networks.
		accept_invalid_certs: bool,
	},
	/// Caller-supplied client used as is.
	Custom(ReqwestClient),
}
impl Default for HttpTransport {
	fn default() -> Self {
		Self::Managed { timeout: DEFAULT_TIMEOUT, accept_invalid_certs: false }
	}
}

/// Timing of the background refresh loop.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RefreshPolicy {
	/// Delay between freshness checks.
	pub interval: StdDuration,
	/// Budget for one background refresh attempt.
	pub timeout: StdDuration,
	/// Predicate deciding when the current credential needs replacing.
	pub freshness: FreshnessPolicy,
}
impl Default for RefreshPolicy {
	fn default() -> Self {
		Self {
			interval: DEFAULT_REFRESH_INTERVAL,
			timeout: DEFAULT_REFRESH_TIMEOUT,
			freshness: FreshnessPolicy::default(),
		}
	}
}
