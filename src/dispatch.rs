//! Authenticated API dispatch with a single forced refresh on token rejection.
//!
//! [`Dispatcher::send`] attaches the stored bearer token and executes the call once. A 401
//! triggers exactly one forced refresh followed by exactly one retry; whatever the retry
//! yields is returned. Every other failure is returned as is. Forced refreshes are
//! single-flight: callers that were rejected with the same stale token wait on one
//! exchange instead of each starting their own.

// crates.io
use reqwest::{
	Method, StatusCode,
	header::{ACCEPT, CONTENT_TYPE},
};
// self
use crate::{
	_prelude::*,
	auth::Credential,
	error::TransportError,
	http::{self, BufferedResponse, ReqwestHttpClient, TRACE_ID_HEADER},
	oauth::TokenSource,
	obs::{FlowKind, FlowSpan},
	refresh::RefreshMetrics,
	store::TokenStore,
};

const ENDPOINT: &str = "API endpoint";

/// Outbound API call. The body is buffered so the call can be replayed after a refresh.
#[derive(Clone, Debug)]
pub struct ApiRequest {
	/// HTTP method.
	pub method: Method,
	/// Target URL.
	pub url: Url,
	/// JSON body, if any.
	pub body: Option<Vec<u8>>,
}
impl ApiRequest {
	/// Builds a `POST` with a JSON body.
	pub fn post_json<B>(url: Url, body: &B) -> Result<Self>
	where
		B: ?Sized + Serialize,
	{
		let body = serde_json::to_vec(body).map_err(Error::Encode)?;

		Ok(Self { method: Method::POST, url, body: Some(body) })
	}

	/// Builds a `GET` without a body.
	pub fn get(url: Url) -> Self {
		Self { method: Method::GET, url, body: None }
	}
}

/// Successful API response.
#[derive(Clone, Debug)]
pub struct ApiResponse {
	/// HTTP status (always 2xx).
	pub status: u16,
	/// Raw response body.
	pub body: Vec<u8>,
}
impl ApiResponse {
	/// Decodes the body as JSON.
	pub fn json<T>(&self) -> Result<T>
	where
		T: DeserializeOwned,
	{
		Ok(http::decode_json(&self.body, self.status)?)
	}
}

/// Executes API calls with the shared credential.
pub struct Dispatcher {
	http_client: ReqwestHttpClient,
	store: Arc<TokenStore>,
	source: Arc<dyn TokenSource>,
	metrics: Arc<RefreshMetrics>,
	refresh_guard: AsyncMutex<()>,
}
impl Dispatcher {
	pub(crate) fn new(
		http_client: ReqwestHttpClient,
		store: Arc<TokenStore>,
		source: Arc<dyn TokenSource>,
		metrics: Arc<RefreshMetrics>,
	) -> Self {
		Self { http_client, store, source, metrics, refresh_guard: AsyncMutex::new(()) }
	}

	/// Sends `request`, refreshing and retrying once if the token is rejected.
	///
	/// No deadline is applied beyond the transport timeout; wrap the call in
	/// `tokio::time::timeout` to bound the forced refresh and retry as well.
	pub async fn send(&self, request: &ApiRequest) -> Result<ApiResponse> {
		FlowSpan::new(FlowKind::Dispatch, "send")
			.observe(async move {
				let credential = self.store.read();

				match self.execute(request, &credential).await {
					Err(err) if err.is_auth_rejected() => {
						tracing::info!("API rejected the access token; refreshing and retrying once.");

						let refreshed = self.force_refresh(&credential).await?;

						self.execute(request, &refreshed).await
					},
					outcome => outcome,
				}
			})
			.await
	}

	/// Replaces `stale` with a newly issued credential.
	///
	/// If another caller (or the background loop) already replaced `stale`, the installed
	/// credential is returned without contacting the token source.
	pub async fn force_refresh(&self, stale: &Arc<Credential>) -> Result<Arc<Credential>> {
		let _singleflight = self.refresh_guard.lock().await;

		if !self.store.is_current(stale) {
			tracing::debug!("Credential already replaced by a concurrent refresh.");

			return Ok(self.store.read());
		}

		self.metrics.record_forced();

		let credential =
			FlowSpan::new(FlowKind::Forced, "force_refresh").observe(self.source.fetch()).await?;
		let installed = self.store.replace(credential);

		tracing::info!(expires_at = %installed.expires_at(), "Forced token refresh succeeded.");

		Ok(installed)
	}

	async fn execute(&self, request: &ApiRequest, credential: &Credential) -> Result<ApiResponse> {
		let mut builder = self
			.http_client
			.request(request.method.clone(), request.url.clone())
			.bearer_auth(credential.bearer())
			.header(ACCEPT, "application/json")
			.header(TRACE_ID_HEADER, http::trace_id());

		if let Some(body) = &request.body {
			builder = builder.header(CONTENT_TYPE, "application/json").body(body.clone());
		}

		let response =
			builder.send().await.map_err(|err| TransportError::network(ENDPOINT, err))?;
		let response = BufferedResponse::read(response, ENDPOINT).await?;

		match response.status {
			status if status.is_success() =>
				Ok(ApiResponse { status: status.as_u16(), body: response.body }),
			StatusCode::UNAUTHORIZED => Err(Error::AuthRejected { body: response.text() }),
			status => Err(Error::Server { status: status.as_u16(), body: response.text() }),
		}
	}
}
impl Debug for Dispatcher {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("Dispatcher").field("credential", &self.store.read()).finish()
	}
}
