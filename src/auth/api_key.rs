//! Authorization key sent to the token endpoint.

// crates.io
use base64::{Engine as _, engine::general_purpose::STANDARD};
// self
use crate::_prelude::*;

/// Opaque authorization key sent as `Authorization: Basic <key>`.
///
/// The provider issues this value already encoded; [`ApiKey::from_client_credentials`]
/// derives it from the raw client identifier and secret instead.
#[derive(Clone, PartialEq, Eq)]
pub struct ApiKey(String);
impl ApiKey {
	/// Wraps an already encoded authorization key.
	pub fn new(value: impl Into<String>) -> Self {
		Self(value.into())
	}

	/// Encodes `client_id:client_secret` with standard base64.
	pub fn from_client_credentials(client_id: &str, client_secret: &str) -> Self {
		Self(STANDARD.encode(format!("{client_id}:{client_secret}")))
	}

	/// Returns the raw key. Callers must avoid logging this string.
	pub fn expose(&self) -> &str {
		&self.0
	}

	/// Returns `true` when the key is empty or whitespace.
	pub fn is_blank(&self) -> bool {
		self.0.trim().is_empty()
	}

	pub(crate) fn basic_header(&self) -> String {
		format!("Basic {}", self.0)
	}
}
impl From<&str> for ApiKey {
	fn from(value: &str) -> Self {
		Self::new(value)
	}
}
impl From<String> for ApiKey {
	fn from(value: String) -> Self {
		Self(value)
	}
}
impl Debug for ApiKey {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_tuple("ApiKey").field(&"<redacted>").finish()
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn client_credentials_are_base64_encoded() {
		let key = ApiKey::from_client_credentials("client", "secret");

		assert_eq!(key.expose(), "Y2xpZW50OnNlY3JldA==");
		assert_eq!(key.basic_header(), "Basic Y2xpZW50OnNlY3JldA==");
	}

	#[test]
	fn debug_output_is_redacted() {
		let key = ApiKey::new("very-secret");

		assert_eq!(format!("{key:?}"), "ApiKey(\"<redacted>\")");
		assert!(!key.is_blank());
		assert!(ApiKey::from("  ").is_blank());
	}
}
