//! Token exchange: turns the API key and scope into a fresh [`Credential`].

// crates.io
use reqwest::{
	StatusCode,
	header::{ACCEPT, AUTHORIZATION},
};
// self
use crate::{
	_prelude::*,
	auth::{ApiKey, Credential},
	config::ClientConfig,
	error::TransportError,
	http::{self, BufferedResponse, ReqwestHttpClient, TRACE_ID_HEADER},
};

const ENDPOINT: &str = "token endpoint";

/// Boxed future returned by [`TokenSource::fetch`].
pub type TokenFuture<'a> = Pin<Box<dyn Future<Output = Result<Credential>> + 'a + Send>>;

/// Source of new credentials.
///
/// One call is one exchange attempt with one outcome; retry policy belongs to the
/// callers (the refresh loop and the dispatcher). Cancellation and deadlines are applied
/// by dropping or bounding the returned future.
pub trait TokenSource
where
	Self: Send + Sync,
{
	/// Performs a single exchange and returns the issued credential.
	fn fetch(&self) -> TokenFuture<'_>;
}

#[derive(Deserialize)]
struct TokenResponse {
	access_token: String,
	expires_at: i64,
}

/// [`TokenSource`] backed by the provider's OAuth endpoint.
///
/// Sends `POST scope=<scope>` as a form body with `Authorization: Basic <key>`, a unique
/// `RqUID` trace header, and `Accept: application/json`. Only HTTP 200 with
/// `{"access_token", "expires_at"}` (Unix milliseconds) counts as success.
#[derive(Clone, Debug)]
pub struct OAuthTokenSource {
	http_client: ReqwestHttpClient,
	endpoint: Url,
	api_key: ApiKey,
	scope: String,
}
impl OAuthTokenSource {
	/// Creates a source for the given endpoint, key, and scope.
	pub fn new(
		http_client: ReqwestHttpClient,
		endpoint: Url,
		api_key: ApiKey,
		scope: impl Into<String>,
	) -> Self {
		Self { http_client, endpoint, api_key, scope: scope.into() }
	}

	/// Creates a source from a resolved client configuration.
	pub fn from_config(config: &ClientConfig, http_client: ReqwestHttpClient) -> Self {
		Self::new(http_client, config.oauth_url.clone(), config.api_key.clone(), &config.scope)
	}

	async fn exchange(&self) -> Result<Credential> {
		let trace_id = http::trace_id();

		tracing::debug!(rq_uid = %trace_id, scope = %self.scope, "Requesting access token.");

		let response = self
			.http_client
			.post(self.endpoint.clone())
			.header(AUTHORIZATION, self.api_key.basic_header())
			.header(ACCEPT, "application/json")
			.header(TRACE_ID_HEADER, &trace_id)
			.form(&[("scope", self.scope.as_str())])
			.send()
			.await
			.map_err(|err| TransportError::network(ENDPOINT, err))?;
		let response = BufferedResponse::read(response, ENDPOINT).await?;

		if response.status != StatusCode::OK {
			return Err(Error::Auth { status: response.status.as_u16(), body: response.text() });
		}

		let token: TokenResponse = http::decode_json(&response.body, response.status.as_u16())?;

		Ok(Credential::from_unix_millis(token.access_token, token.expires_at)?)
	}
}
impl TokenSource for OAuthTokenSource {
	fn fetch(&self) -> TokenFuture<'_> {
		Box::pin(self.exchange())
	}
}
