//! Transport primitives shared by the token exchange and API dispatch.
//!
//! [`ReqwestHttpClient`] is the only handle the client holds on an HTTP stack. It is built
//! once from the resolved [`HttpTransport`] and cloned into the token source and the
//! dispatcher, so both share one connection pool. Bodies are buffered in full before they
//! are classified, which keeps error bodies available for [`Error`] values and lets the
//! dispatcher replay a request after a forced refresh.

// std
use std::ops::Deref;
// crates.io
use reqwest::{Response, StatusCode, redirect::Policy};
use uuid::Uuid;
// self
use crate::{
	_prelude::*,
	config::HttpTransport,
	error::{ConfigError, DecodeError, TransportError},
};

/// Header carrying the per-request trace identifier expected by the provider.
pub const TRACE_ID_HEADER: &str = "RqUID";

/// Thin wrapper around [`ReqwestClient`] so shared HTTP behavior lives in one place.
///
/// Managed clients never follow redirects: the token endpoint answers directly and a
/// redirect would forward the `Authorization` header to another origin.
#[derive(Clone, Debug, Default)]
pub struct ReqwestHttpClient(pub ReqwestClient);
impl ReqwestHttpClient {
	/// Wraps an existing reqwest [`ReqwestClient`].
	pub fn with_client(client: ReqwestClient) -> Self {
		Self(client)
	}

	/// Builds the client described by a resolved transport configuration.
	pub fn from_transport(transport: &HttpTransport) -> Result<Self, ConfigError> {
		match transport {
			HttpTransport::Custom(client) => Ok(Self(client.clone())),
			HttpTransport::Managed { timeout, accept_invalid_certs } => {
				let client = ReqwestClient::builder()
					.timeout(*timeout)
					.danger_accept_invalid_certs(*accept_invalid_certs)
					.redirect(Policy::none())
					.build()
					.map_err(ConfigError::http_client_build)?;

				Ok(Self(client))
			},
		}
	}
}
impl AsRef<ReqwestClient> for ReqwestHttpClient {
	fn as_ref(&self) -> &ReqwestClient {
		&self.0
	}
}
impl Deref for ReqwestHttpClient {
	type Target = ReqwestClient;

	fn deref(&self) -> &Self::Target {
		&self.0
	}
}

/// Status and fully buffered body of a completed exchange.
#[derive(Debug)]
pub(crate) struct BufferedResponse {
	pub(crate) status: StatusCode,
	pub(crate) body: Vec<u8>,
}
impl BufferedResponse {
	pub(crate) async fn read(
		response: Response,
		endpoint: &'static str,
	) -> Result<Self, TransportError> {
		let status = response.status();
		let body = response
			.bytes()
			.await
			.map_err(|err| TransportError::network(endpoint, err))?
			.to_vec();

		Ok(Self { status, body })
	}

	pub(crate) fn text(&self) -> String {
		String::from_utf8_lossy(&self.body).into_owned()
	}
}

/// Fresh trace identifier for the [`TRACE_ID_HEADER`] header.
pub(crate) fn trace_id() -> String {
	Uuid::new_v4().to_string()
}

/// Decodes a JSON body, keeping the path of the first mismatch in the error.
pub(crate) fn decode_json<T>(body: &[u8], status: u16) -> Result<T, DecodeError>
where
	T: DeserializeOwned,
{
	let mut deserializer = serde_json::Deserializer::from_slice(body);

	serde_path_to_error::deserialize(&mut deserializer)
		.map_err(|source| DecodeError::Json { source, status })
}
