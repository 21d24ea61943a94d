//! Client facade tying the credential lifecycle to the completion API.
//!
//! [`Client::new`] performs the first token exchange before anything else exists: if it
//! fails, construction fails and no background task is spawned. On success the token
//! store is seeded, the refresh loop starts, and API calls go through the
//! [`Dispatcher`]. [`Client::close`] stops the loop and waits for it.

// crates.io
use tokio_util::sync::CancellationToken;
// self
use crate::{
	_prelude::*,
	auth::Credential,
	config::ClientConfig,
	dispatch::{ApiRequest, ApiResponse, Dispatcher},
	http::ReqwestHttpClient,
	lifecycle::Lifecycle,
	model::GenerativeModel,
	oauth::{OAuthTokenSource, TokenSource},
	obs::{FlowKind, FlowSpan},
	refresh::{RefreshLoop, RefreshMetrics, RefreshState, StateCell},
	store::TokenStore,
};

/// Authenticated GigaChat client.
///
/// Must be created inside a tokio runtime. Calls made after [`close`](Self::close) still
/// use the last stored credential and may still force a refresh on rejection; only the
/// background loop is gone.
pub struct Client {
	config: ClientConfig,
	store: Arc<TokenStore>,
	metrics: Arc<RefreshMetrics>,
	dispatcher: Dispatcher,
	lifecycle: Lifecycle,
}
impl Client {
	/// Builds the HTTP stack, fetches the first token, and starts the refresh loop.
	pub async fn new(config: ClientConfig) -> Result<Self> {
		let http_client = ReqwestHttpClient::from_transport(&config.transport)?;
		let source = Arc::new(OAuthTokenSource::from_config(&config, http_client.clone()));

		Self::start(config, http_client, source).await
	}

	/// Like [`new`](Self::new) but obtains credentials from `source` instead of the
	/// configured OAuth endpoint.
	pub async fn with_token_source(
		config: ClientConfig,
		source: Arc<dyn TokenSource>,
	) -> Result<Self> {
		let http_client = ReqwestHttpClient::from_transport(&config.transport)?;

		Self::start(config, http_client, source).await
	}

	async fn start(
		config: ClientConfig,
		http_client: ReqwestHttpClient,
		source: Arc<dyn TokenSource>,
	) -> Result<Self> {
		let credential = FlowSpan::new(FlowKind::Initial, "client_new")
			.observe(source.fetch())
			.await
			.inspect_err(|err| {
				tracing::error!(error = %err, "Initial token exchange failed; client not created.");
			})?;

		tracing::info!(expires_at = %credential.expires_at(), "Obtained initial access token.");

		let store = Arc::new(TokenStore::new(credential));
		let metrics = Arc::new(RefreshMetrics::default());
		let lifecycle = Lifecycle::start(RefreshLoop {
			source: source.clone(),
			store: store.clone(),
			policy: config.refresh,
			metrics: metrics.clone(),
			state: StateCell::default(),
			cancel: CancellationToken::new(),
		});
		let dispatcher = Dispatcher::new(http_client, store.clone(), source, metrics.clone());

		Ok(Self { config, store, metrics, dispatcher, lifecycle })
	}

	/// Resolved configuration.
	pub fn config(&self) -> &ClientConfig {
		&self.config
	}

	/// Snapshot of the current credential.
	pub fn credential(&self) -> Arc<Credential> {
		self.store.read()
	}

	/// Counters describing refresh activity so far.
	pub fn refresh_metrics(&self) -> &RefreshMetrics {
		&self.metrics
	}

	/// Current state of the background refresh loop.
	pub fn refresh_state(&self) -> RefreshState {
		self.lifecycle.state()
	}

	/// Returns `true` until [`close`](Self::close) has been called.
	pub fn is_running(&self) -> bool {
		self.lifecycle.is_running()
	}

	/// Dispatcher used for authenticated calls.
	pub fn dispatcher(&self) -> &Dispatcher {
		&self.dispatcher
	}

	/// Sends an authenticated request; see [`Dispatcher::send`].
	pub async fn send(&self, request: &ApiRequest) -> Result<ApiResponse> {
		self.dispatcher.send(request).await
	}

	/// Returns a handle for the named model. An empty name selects
	/// [`DEFAULT_MODEL`](crate::model::DEFAULT_MODEL).
	pub fn generative_model(&self, name: &str) -> GenerativeModel<'_> {
		GenerativeModel::new(self, name)
	}

	/// Stops the refresh loop and waits for it to exit. Later calls are no-ops.
	///
	/// Pooled HTTP connections stay open so calls after `close` keep working; they are
	/// released when the `Client` is dropped.
	pub async fn close(&self) {
		if self.lifecycle.stop().await {
			tracing::info!("Client closed.");
		}
	}
}
impl Debug for Client {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("Client")
			.field("api_url", &self.config.api_url.as_str())
			.field("credential", &self.store.read())
			.field("refresh_state", &self.lifecycle.state())
			.field("running", &self.lifecycle.is_running())
			.finish()
	}
}
