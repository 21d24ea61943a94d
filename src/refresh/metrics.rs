// std
use std::sync::atomic::{AtomicU64, Ordering};

/// Thread-safe counters for credential refresh activity.
#[derive(Debug, Default)]
pub struct RefreshMetrics {
	checks: AtomicU64,
	attempts: AtomicU64,
	success: AtomicU64,
	failure: AtomicU64,
	forced: AtomicU64,
}
impl RefreshMetrics {
	/// Returns the number of background freshness checks (one per tick).
	pub fn checks(&self) -> u64 {
		self.checks.load(Ordering::Relaxed)
	}

	/// Returns the number of background refresh attempts against the token source.
	pub fn attempts(&self) -> u64 {
		self.attempts.load(Ordering::Relaxed)
	}

	/// Returns the number of background refreshes that installed a new credential.
	pub fn successes(&self) -> u64 {
		self.success.load(Ordering::Relaxed)
	}

	/// Returns the number of background refreshes that failed or timed out.
	pub fn failures(&self) -> u64 {
		self.failure.load(Ordering::Relaxed)
	}

	/// Returns the number of forced refreshes that reached the token source.
	pub fn forced(&self) -> u64 {
		self.forced.load(Ordering::Relaxed)
	}

	pub(crate) fn record_check(&self) {
		self.checks.fetch_add(1, Ordering::Relaxed);
	}

	pub(crate) fn record_attempt(&self) {
		self.attempts.fetch_add(1, Ordering::Relaxed);
	}

	pub(crate) fn record_success(&self) {
		self.success.fetch_add(1, Ordering::Relaxed);
	}

	pub(crate) fn record_failure(&self) {
		self.failure.fetch_add(1, Ordering::Relaxed);
	}

	pub(crate) fn record_forced(&self) {
		self.forced.fetch_add(1, Ordering::Relaxed);
	}
}
