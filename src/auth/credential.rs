//! Immutable bearer credential issued by the token endpoint.

// self
use crate::{_prelude::*, error::DecodeError};

/// Redacted bearer token wrapper keeping sensitive material out of logs.
#[derive(Clone, PartialEq, Eq)]
pub struct AccessToken(String);
impl AccessToken {
	/// Wraps a bearer token string.
	pub fn new(value: impl Into<String>) -> Self {
		Self(value.into())
	}

	/// Returns the inner token value. Callers must avoid logging this string.
	pub fn expose(&self) -> &str {
		&self.0
	}
}
impl Debug for AccessToken {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_tuple("AccessToken").field(&"<redacted>").finish()
	}
}
impl Display for AccessToken {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str("<redacted>")
	}
}

/// Bearer token paired with the absolute instant it stops being accepted.
///
/// Values are never mutated; a refresh builds a new `Credential` and swaps it into the
/// [`TokenStore`](crate::store::TokenStore) as a whole.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential {
	access_token: AccessToken,
	expires_at: OffsetDateTime,
}
impl Credential {
	/// Creates a credential from a token and its absolute expiry.
	pub fn new(access_token: impl Into<String>, expires_at: OffsetDateTime) -> Self {
		Self { access_token: AccessToken::new(access_token), expires_at }
	}

	/// Creates a credential whose expiry is expressed in Unix milliseconds.
	pub fn from_unix_millis(
		access_token: impl Into<String>,
		expires_at: i64,
	) -> Result<Self, DecodeError> {
		let nanos = i128::from(expires_at) * 1_000_000;
		let instant = OffsetDateTime::from_unix_timestamp_nanos(nanos)
			.map_err(|_| DecodeError::ExpiryOutOfRange { expires_at })?;

		Ok(Self::new(access_token, instant))
	}

	/// Bearer token attached to API calls.
	pub fn access_token(&self) -> &AccessToken {
		&self.access_token
	}

	/// Instant after which the provider rejects the token.
	pub fn expires_at(&self) -> OffsetDateTime {
		self.expires_at
	}

	/// Expiry as Unix milliseconds, the resolution used on the wire.
	pub fn expires_at_millis(&self) -> i64 {
		(self.expires_at.unix_timestamp_nanos() / 1_000_000) as i64
	}

	/// Time left before expiry at `now`; negative once expired.
	pub fn remaining_at(&self, now: OffsetDateTime) -> Duration {
		self.expires_at - now
	}

	pub(crate) fn bearer(&self) -> &str {
		self.access_token.expose()
	}
}
impl Debug for Credential {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("Credential")
			.field("access_token", &"<redacted>")
			.field("expires_at", &self.expires_at)
			.finish()
	}
}
