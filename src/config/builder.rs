//! Builder that validates a [`ClientConfig`] before any client exists.

// self
use crate::{
	_prelude::*,
	auth::{ApiKey, FreshnessPolicy},
	config::{
		ClientConfig, DEFAULT_API_URL, DEFAULT_OAUTH_URL, DEFAULT_SCOPE, DEFAULT_TIMEOUT,
		HttpTransport, RefreshPolicy,
	},
	error::ConfigError,
};

/// Builder for [`ClientConfig`] values.
///
/// A custom HTTP client and the managed-client options (timeout, certificate toggle) are
/// mutually exclusive; [`build`](Self::build) rejects the combination instead of letting
/// one silently override the other.
#[derive(Debug)]
pub struct ClientConfigBuilder {
	api_key: ApiKey,
	api_url: Option<String>,
	oauth_url: Option<String>,
	scope: Option<String>,
	http_client: Option<ReqwestClient>,
	timeout: Option<StdDuration>,
	accept_invalid_certs: Option<bool>,
	refresh: RefreshPolicy,
}
impl ClientConfigBuilder {
	/// Creates a new builder seeded with the provided API key.
	pub fn new(api_key: impl Into<ApiKey>) -> Self {
		Self {
			api_key: api_key.into(),
			api_url: None,
			oauth_url: None,
			scope: None,
			http_client: None,
			timeout: None,
			accept_invalid_certs: None,
			refresh: RefreshPolicy::default(),
		}
	}

	/// Overrides the chat completions endpoint.
	pub fn api_url(mut self, url: impl Into<String>) -> Self {
		self.api_url = Some(url.into());

		self
	}

	/// Overrides the OAuth token endpoint.
	pub fn oauth_url(mut self, url: impl Into<String>) -> Self {
		self.oauth_url = Some(url.into());

		self
	}

	/// Overrides the OAuth scope.
	pub fn scope(mut self, scope: impl Into<String>) -> Self {
		self.scope = Some(scope.into());

		self
	}

	/// Uses a caller-supplied reqwest client (proxies, mTLS, custom pools).
	pub fn http_client(mut self, client: ReqwestClient) -> Self {
		self.http_client = Some(client);

		self
	}

	/// Sets the per-request timeout of the managed client.
	pub fn timeout(mut self, timeout: StdDuration) -> Self {
		self.timeout = Some(timeout);

		self
	}

	/// Disables certificate verification on the managed client.
	///
	/// This exposes every call to interception; use it only against trusted test servers.
	pub fn accept_invalid_certs(mut self, accept: bool) -> Self {
		self.accept_invalid_certs = Some(accept);

		self
	}

	/// Overrides the delay between background freshness checks.
	pub fn refresh_interval(mut self, interval: StdDuration) -> Self {
		self.refresh.interval = interval;

		self
	}

	/// Overrides the budget for one background refresh attempt.
	pub fn refresh_timeout(mut self, timeout: StdDuration) -> Self {
		self.refresh.timeout = timeout;

		self
	}

	/// Overrides the safety window before expiry.
	pub fn freshness_margin(mut self, margin: Duration) -> Self {
		self.refresh.freshness = FreshnessPolicy::new(margin);

		self
	}

	/// Consumes the builder and validates the resulting configuration.
	pub fn build(self) -> Result<ClientConfig, ConfigError> {
		if self.api_key.is_blank() {
			return Err(ConfigError::MissingApiKey);
		}

		let scope = self.scope.unwrap_or_else(|| DEFAULT_SCOPE.into()).trim().to_owned();

		if scope.is_empty() {
			return Err(ConfigError::EmptyScope);
		}

		let api_url = parse_url("api", self.api_url.as_deref().unwrap_or(DEFAULT_API_URL))?;
		let oauth_url =
			parse_url("oauth", self.oauth_url.as_deref().unwrap_or(DEFAULT_OAUTH_URL))?;
		let transport = match (self.http_client, self.timeout, self.accept_invalid_certs) {
			(Some(client), None, None) => HttpTransport::Custom(client),
			(Some(_), _, _) => return Err(ConfigError::ConflictingTransport),
			(None, timeout, accept_invalid_certs) => {
				let timeout = timeout.unwrap_or(DEFAULT_TIMEOUT);

				if timeout.is_zero() {
					return Err(ConfigError::ZeroDuration { field: "timeout" });
				}

				HttpTransport::Managed {
					timeout,
					accept_invalid_certs: accept_invalid_certs.unwrap_or(false),
				}
			},
		};

		if self.refresh.interval.is_zero() {
			return Err(ConfigError::ZeroDuration { field: "refresh interval" });
		}
		if self.refresh.timeout.is_zero() {
			return Err(ConfigError::ZeroDuration { field: "refresh timeout" });
		}
		if self.refresh.freshness.margin().is_negative() {
			return Err(ConfigError::NegativeMargin);
		}

		Ok(ClientConfig {
			api_key: self.api_key,
			api_url,
			oauth_url,
			scope,
			transport,
			refresh: self.refresh,
		})
	}
}

fn parse_url(field: &'static str, raw: &str) -> Result<Url, ConfigError> {
	Url::parse(raw).map_err(|source| ConfigError::InvalidUrl { field, source })
}
