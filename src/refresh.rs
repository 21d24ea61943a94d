//! Background refresh loop that keeps the stored credential usable.
//!
//! The loop starts [`Idle`](RefreshState::Idle) and does nothing until its first tick. On
//! every tick it moves to [`Checking`](RefreshState::Checking) and consults the
//! [`FreshnessPolicy`](crate::auth::FreshnessPolicy); a stale credential moves it to
//! [`Refreshing`](RefreshState::Refreshing), where one bounded call to the
//! [`TokenSource`] runs. Success replaces the stored credential, failure is logged and
//! left for the next tick. Both return to `Idle`. Cancellation moves any state to
//! [`Stopped`](RefreshState::Stopped), aborting an in-flight exchange.

mod metrics;

pub use metrics::RefreshMetrics;

// std
use std::ops::ControlFlow;
// crates.io
use tokio::time::{Instant, MissedTickBehavior, interval_at, timeout};
use tokio_util::sync::CancellationToken;
// self
use crate::{
	_prelude::*,
	auth::Credential,
	config::RefreshPolicy,
	error::TransportError,
	oauth::TokenSource,
	obs::{FlowKind, FlowSpan},
	store::TokenStore,
};

const SOURCE_LABEL: &str = "token source";

/// States of the background refresh loop.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum RefreshState {
	/// Waiting for the next tick.
	#[default]
	Idle,
	/// Evaluating the current credential's freshness.
	Checking,
	/// Exchanging the API key for a new credential.
	Refreshing,
	/// Cancelled; the task has exited or is about to.
	Stopped,
}
impl RefreshState {
	/// Returns a stable label suitable for span or log fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			RefreshState::Idle => "idle",
			RefreshState::Checking => "checking",
			RefreshState::Refreshing => "refreshing",
			RefreshState::Stopped => "stopped",
		}
	}
}
impl Display for RefreshState {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Shared view of the loop's state, readable from the client.
#[derive(Clone, Debug, Default)]
pub(crate) struct StateCell(Arc<Mutex<RefreshState>>);
impl StateCell {
	pub(crate) fn get(&self) -> RefreshState {
		*self.0.lock()
	}

	fn set(&self, next: RefreshState) {
		let previous = std::mem::replace(&mut *self.0.lock(), next);

		tracing::trace!(from = %previous, to = %next, "Refresh loop transition.");
	}
}

/// Everything the background task owns.
pub(crate) struct RefreshLoop {
	pub(crate) source: Arc<dyn TokenSource>,
	pub(crate) store: Arc<TokenStore>,
	pub(crate) policy: RefreshPolicy,
	pub(crate) metrics: Arc<RefreshMetrics>,
	pub(crate) state: StateCell,
	pub(crate) cancel: CancellationToken,
}
impl RefreshLoop {
	/// Runs until the cancellation token fires.
	pub(crate) async fn run(self) {
		let period = self.policy.interval;
		let mut ticker = interval_at(Instant::now() + period, period);

		ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
		self.state.set(RefreshState::Idle);

		tracing::debug!(interval = ?period, "Token refresh loop started.");

		loop {
			tokio::select! {
				biased;
				_ = self.cancel.cancelled() => break,
				_ = ticker.tick() => {},
			}

			if self.tick().await.is_break() {
				break;
			}

			self.state.set(RefreshState::Idle);
		}

		self.state.set(RefreshState::Stopped);

		tracing::debug!("Token refresh loop stopped.");
	}

	async fn tick(&self) -> ControlFlow<()> {
		self.state.set(RefreshState::Checking);
		self.metrics.record_check();

		let current = self.store.read();

		if self.policy.freshness.is_fresh(current.expires_at(), OffsetDateTime::now_utc()) {
			return ControlFlow::Continue(());
		}

		self.state.set(RefreshState::Refreshing);
		self.metrics.record_attempt();

		let span = FlowSpan::new(FlowKind::Background, "refresh_loop");
		let attempt = span.observe(self.bounded_fetch());
		let result = tokio::select! {
			biased;
			_ = self.cancel.cancelled() => return ControlFlow::Break(()),
			outcome = attempt => outcome,
		};

		match result {
			Ok(credential) => {
				let installed = self.store.replace(credential);

				self.metrics.record_success();

				tracing::info!(expires_at = %installed.expires_at(), "Refreshed access token.");
			},
			Err(err) => {
				self.metrics.record_failure();

				tracing::warn!(
					error = %err,
					expires_at = %current.expires_at(),
					"Background token refresh failed; keeping the current token until the next tick."
				);
			},
		}

		ControlFlow::Continue(())
	}

	/// One fetch from the source, failing with [`TransportError::Timeout`] past the budget.
	async fn bounded_fetch(&self) -> Result<Credential> {
		let budget = self.policy.timeout;

		timeout(budget, self.source.fetch()).await.unwrap_or_else(|_| {
			Err(TransportError::Timeout { endpoint: SOURCE_LABEL, after: budget }.into())
		})
	}
}

#[cfg(test)]
mod tests {
	// std
	use std::sync::atomic::{AtomicUsize, Ordering};
	// self
	use super::*;
	use crate::{
		auth::FreshnessPolicy,
		error::DecodeError,
		oauth::TokenFuture,
	};

	enum Behavior {
		Issue,
		Malformed,
		Hang,
	}

	struct FakeSource {
		behavior: Behavior,
		calls: AtomicUsize,
	}
	impl FakeSource {
		fn new(behavior: Behavior) -> Arc<Self> {
			Arc::new(Self { behavior, calls: AtomicUsize::new(0) })
		}

		fn calls(&self) -> usize {
			self.calls.load(Ordering::SeqCst)
		}
	}
	impl TokenSource for FakeSource {
		fn fetch(&self) -> TokenFuture<'_> {
			let call = self.calls.fetch_add(1, Ordering::SeqCst) + 1;

			Box::pin(async move {
				match self.behavior {
					Behavior::Issue => Ok(Credential::new(
						format!("token-{call}"),
						OffsetDateTime::now_utc() + Duration::hours(1),
					)),
					Behavior::Malformed =>
						Err(Error::Decode(DecodeError::ExpiryOutOfRange { expires_at: i64::MAX })),
					Behavior::Hang => std::future::pending().await,
				}
			})
		}
	}

	struct Harness {
		store: Arc<TokenStore>,
		metrics: Arc<RefreshMetrics>,
		state: StateCell,
		cancel: CancellationToken,
		handle: tokio::task::JoinHandle<()>,
	}

	fn spawn(source: Arc<FakeSource>, margin: Duration) -> Harness {
		let store = Arc::new(TokenStore::new(Credential::new(
			"token-0",
			OffsetDateTime::now_utc() + Duration::hours(1),
		)));
		let metrics = Arc::new(RefreshMetrics::default());
		let state = StateCell::default();
		let cancel = CancellationToken::new();
		let refresh_loop = RefreshLoop {
			source,
			store: store.clone(),
			policy: RefreshPolicy {
				interval: StdDuration::from_secs(60),
				timeout: StdDuration::from_secs(30),
				freshness: FreshnessPolicy::new(margin),
			},
			metrics: metrics.clone(),
			state: state.clone(),
			cancel: cancel.clone(),
		};
		let handle = tokio::spawn(refresh_loop.run());

		Harness { store, metrics, state, cancel, handle }
	}

	#[tokio::test(start_paused = true)]
	async fn fresh_token_is_left_alone() {
		let source = FakeSource::new(Behavior::Issue);
		let harness = spawn(source.clone(), Duration::minutes(15));

		tokio::time::sleep(StdDuration::from_secs(185)).await;

		assert_eq!(harness.metrics.checks(), 3);
		assert_eq!(source.calls(), 0);
		assert_eq!(harness.store.read().bearer(), "token-0");

		harness.cancel.cancel();
		harness.handle.await.expect("Refresh loop should exit cleanly.");

		assert_eq!(harness.state.get(), RefreshState::Stopped);
	}

	#[tokio::test(start_paused = true)]
	async fn no_check_before_the_first_tick() {
		let source = FakeSource::new(Behavior::Issue);
		let harness = spawn(source.clone(), Duration::days(1));

		tokio::time::sleep(StdDuration::from_secs(59)).await;

		assert_eq!(harness.metrics.checks(), 0);
		assert_eq!(harness.state.get(), RefreshState::Idle);

		tokio::time::sleep(StdDuration::from_secs(2)).await;

		assert_eq!(harness.metrics.checks(), 1);
		assert_eq!(source.calls(), 1);
		assert_eq!(harness.store.read().bearer(), "token-1");

		harness.cancel.cancel();
		harness.handle.await.expect("Refresh loop should exit cleanly.");
	}

	#[tokio::test(start_paused = true)]
	async fn failures_are_contained_and_retried() {
		let source = FakeSource::new(Behavior::Malformed);
		let harness = spawn(source.clone(), Duration::days(1));

		tokio::time::sleep(StdDuration::from_secs(181)).await;

		assert_eq!(source.calls(), 3);
		assert_eq!(harness.metrics.failures(), 3);
		assert_eq!(harness.metrics.successes(), 0);
		assert_eq!(harness.store.read().bearer(), "token-0");
		assert!(!harness.handle.is_finished());

		harness.cancel.cancel();
		harness.handle.await.expect("Refresh loop should exit cleanly.");
	}

	#[tokio::test(start_paused = true)]
	async fn hung_exchange_times_out() {
		let source = FakeSource::new(Behavior::Hang);
		let harness = spawn(source.clone(), Duration::days(1));

		tokio::time::sleep(StdDuration::from_secs(95)).await;

		assert_eq!(source.calls(), 1);
		assert_eq!(harness.metrics.failures(), 1);

		harness.cancel.cancel();
		harness.handle.await.expect("Refresh loop should exit cleanly.");
	}

	#[tokio::test(start_paused = true)]
	async fn timeout_names_the_token_source() {
		let refresh_loop = RefreshLoop {
			source: FakeSource::new(Behavior::Hang),
			store: Arc::new(TokenStore::new(Credential::new(
				"token-0",
				OffsetDateTime::now_utc() + Duration::hours(1),
			))),
			policy: RefreshPolicy::default(),
			metrics: Arc::new(RefreshMetrics::default()),
			state: StateCell::default(),
			cancel: CancellationToken::new(),
		};
		let err = refresh_loop.bounded_fetch().await.expect_err("A hung source should time out.");

		match err {
			Error::Transport(TransportError::Timeout { endpoint, after }) => {
				assert_eq!(endpoint, "token source");
				assert_eq!(after, StdDuration::from_secs(30));
			},
			other => panic!("Unexpected error: {other:?}."),
		}
	}

	#[tokio::test(start_paused = true)]
	async fn cancellation_aborts_in_flight_refresh() {
		let source = FakeSource::new(Behavior::Hang);
		let harness = spawn(source.clone(), Duration::days(1));

		tokio::time::sleep(StdDuration::from_secs(65)).await;

		assert_eq!(harness.state.get(), RefreshState::Refreshing);

		harness.cancel.cancel();
		harness.handle.await.expect("Refresh loop should exit cleanly.");

		assert_eq!(harness.state.get(), RefreshState::Stopped);
		assert_eq!(harness.metrics.failures(), 0);
	}
}
