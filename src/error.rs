//! Client-level error types shared by token exchange, dispatch, and configuration.

// self
use crate::_prelude::*;

/// Client-wide result type alias returning [`Error`] by default.
pub type Result<T, E = Error> = std::result::Result<T, E>;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Canonical error exposed by public APIs.
///
/// Each variant names the stage that failed: configuration, transport, token exchange,
/// API dispatch, or body decoding.
#[derive(Debug, ThisError)]
pub enum Error {
	/// Local configuration problem.
	#[error(transparent)]
	Config(#[from] ConfigError),
	/// Transport failure (DNS, TCP, TLS, timeout).
	#[error(transparent)]
	Transport(#[from] TransportError),
	/// Response body did not match the expected shape.
	#[error(transparent)]
	Decode(#[from] DecodeError),
	/// Request body could not be serialized.
	#[error("Request body could not be serialized.")]
	Encode(#[source] serde_json::Error),
	/// Generation parameters were rejected before any request was sent.
	#[error(transparent)]
	Validation(#[from] crate::model::ValidationError),

	/// Token endpoint refused to issue a credential.
	#[error("Token endpoint returned status {status}: {body}.")]
	Auth {
		/// HTTP status returned by the token endpoint.
		status: u16,
		/// Raw response body.
		body: String,
	},
	/// API rejected the bearer token with HTTP 401, even after a forced refresh.
	#[error("API rejected the access token with status 401: {body}.")]
	AuthRejected {
		/// Raw response body.
		body: String,
	},
	/// API answered with a non-success status other than 401.
	#[error("API returned unexpected status {status}: {body}.")]
	Server {
		/// HTTP status returned by the API.
		status: u16,
		/// Raw response body.
		body: String,
	},
}
impl Error {
	/// Returns `true` when the API rejected the bearer token.
	pub fn is_auth_rejected(&self) -> bool {
		matches!(self, Self::AuthRejected { .. })
	}

	/// Returns the HTTP status carried by the error, if any.
	pub fn status(&self) -> Option<u16> {
		match self {
			Self::Auth { status, .. } | Self::Server { status, .. } => Some(*status),
			Self::AuthRejected { .. } => Some(401),
			Self::Decode(DecodeError::Json { status, .. }) => Some(*status),
			_ => None,
		}
	}
}

/// Configuration and validation failures raised before a client exists.
#[derive(Debug, ThisError)]
pub enum ConfigError {
	/// API key is empty.
	#[error("API key must not be empty.")]
	MissingApiKey,
	/// OAuth scope is empty.
	#[error("OAuth scope must not be empty.")]
	EmptyScope,
	/// A configured URL cannot be parsed.
	#[error("The {field} URL is invalid.")]
	InvalidUrl {
		/// Configuration field that failed validation.
		field: &'static str,
		/// Underlying parsing failure.
		#[source]
		source: url::ParseError,
	},
	/// A duration that must be positive was zero.
	#[error("The {field} must be greater than zero.")]
	ZeroDuration {
		/// Configuration field that failed validation.
		field: &'static str,
	},
	/// Freshness margin was negative.
	#[error("The freshness margin must not be negative.")]
	NegativeMargin,
	/// A custom HTTP client was combined with options that only apply to the managed client.
	#[error("Timeout and certificate options cannot be combined with a custom HTTP client.")]
	ConflictingTransport,
	/// HTTP client could not be constructed.
	#[error("HTTP client could not be constructed.")]
	HttpClientBuild {
		/// Underlying transport builder failure.
		#[source]
		source: BoxError,
	},
}
impl ConfigError {
	/// Wraps a transport's builder failure inside [`ConfigError`].
	pub fn http_client_build(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::HttpClientBuild { source: Box::new(src) }
	}
}

/// Transport-level failures (network, timeouts).
#[derive(Debug, ThisError)]
pub enum TransportError {
	/// Underlying HTTP client reported a network failure.
	#[error("Network error occurred while calling {endpoint}.")]
	Network {
		/// Which endpoint was being called.
		endpoint: &'static str,
		/// Transport-specific network error.
		#[source]
		source: BoxError,
	},
	/// The call did not finish within the allotted time.
	#[error("Call to {endpoint} timed out after {after:?}.")]
	Timeout {
		/// Which endpoint was being called.
		endpoint: &'static str,
		/// Budget that elapsed.
		after: StdDuration,
	},
}
impl TransportError {
	/// Wraps a transport-specific network error.
	pub fn network(endpoint: &'static str, src: impl 'static + Send + Sync + StdError) -> Self {
		Self::Network { endpoint, source: Box::new(src) }
	}

	/// Returns `true` when the failure was a timeout, either ours or the transport's.
	pub fn is_timeout(&self) -> bool {
		match self {
			Self::Timeout { .. } => true,
			Self::Network { source, .. } =>
				source.downcast_ref::<ReqwestError>().is_some_and(ReqwestError::is_timeout),
		}
	}
}

/// Response bodies that could not be turned into the expected value.
#[derive(Debug, ThisError)]
pub enum DecodeError {
	/// Body is not valid JSON for the expected shape.
	#[error("Response body is malformed: {source}.")]
	Json {
		/// Structured parsing failure, including the offending path.
		#[source]
		source: serde_path_to_error::Error<serde_json::Error>,
		/// HTTP status the body arrived with.
		status: u16,
	},
	/// Token expiry timestamp cannot be represented as an instant.
	#[error("Token expiry {expires_at} ms is out of range.")]
	ExpiryOutOfRange {
		/// Raw Unix-millisecond value from the token endpoint.
		expires_at: i64,
	},
}
