//! Freshness policy deciding whether a credential is still safe to hand out.

// self
use crate::_prelude::*;

/// Default safety window before expiry during which a token is treated as stale.
pub const DEFAULT_FRESHNESS_MARGIN: Duration = Duration::minutes(15);

/// Pure predicate over a credential's expiry and the current instant.
///
/// A token is fresh only while strictly more than `margin` remains, so a request started
/// with a fresh token cannot see it expire mid-flight. Exactly at the margin the token is
/// already stale.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FreshnessPolicy {
	margin: Duration,
}
impl FreshnessPolicy {
	/// Creates a policy with the provided margin.
	pub const fn new(margin: Duration) -> Self {
		Self { margin }
	}

	/// Safety window applied before expiry.
	pub const fn margin(&self) -> Duration {
		self.margin
	}

	/// Returns `true` iff `expires_at - now > margin`.
	pub fn is_fresh(&self, expires_at: OffsetDateTime, now: OffsetDateTime) -> bool {
		expires_at - now > self.margin
	}
}
impl Default for FreshnessPolicy {
	fn default() -> Self {
		Self::new(DEFAULT_FRESHNESS_MARGIN)
	}
}
