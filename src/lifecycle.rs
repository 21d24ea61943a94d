//! Ownership of the background refresh task: start, cancel, join.

// crates.io
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
// self
use crate::{
	_prelude::*,
	refresh::{RefreshLoop, RefreshState, StateCell},
};

/// Handle to the running refresh loop.
#[derive(Debug)]
struct RefreshTask {
	cancel: CancellationToken,
	join: JoinHandle<()>,
}

/// Owns the refresh task for the lifetime of a client.
///
/// [`stop`](Self::stop) cancels the loop and waits for it to exit, so nothing the loop
/// holds (token source, HTTP client clones) outlives shutdown. Concurrent callers of
/// `stop` all return only after the loop has exited. Dropping a controller that was never
/// stopped still cancels the loop but cannot wait for it.
#[derive(Debug)]
pub struct Lifecycle {
	task: AsyncMutex<Option<RefreshTask>>,
	state: StateCell,
}
impl Lifecycle {
	/// Spawns the refresh loop onto the current tokio runtime.
	pub(crate) fn start(refresh_loop: RefreshLoop) -> Self {
		let cancel = refresh_loop.cancel.clone();
		let state = refresh_loop.state.clone();
		let join = tokio::spawn(refresh_loop.run());

		Self { task: AsyncMutex::new(Some(RefreshTask { cancel, join })), state }
	}

	/// Cancels the refresh loop and waits until it has exited.
	///
	/// Returns `false` when another call already stopped (or is stopping) the loop; that
	/// call still waits for the exit before returning.
	pub async fn stop(&self) -> bool {
		// Held across the join so concurrent callers queue behind it.
		let mut slot = self.task.lock().await;
		let Some(task) = slot.take() else {
			return false;
		};

		task.cancel.cancel();

		if let Err(err) = task.join.await {
			if err.is_panic() {
				tracing::error!("Token refresh loop panicked before shutdown.");
			} else {
				tracing::warn!("Token refresh loop was aborted before shutdown.");
			}
		}

		true
	}

	/// Returns `true` until [`stop`](Self::stop) has finished.
	pub fn is_running(&self) -> bool {
		self.task.try_lock().is_none_or(|slot| slot.is_some())
	}

	/// Current state of the refresh loop.
	pub fn state(&self) -> RefreshState {
		self.state.get()
	}
}
impl Drop for Lifecycle {
	fn drop(&mut self) {
		if let Some(task) = self.task.get_mut().take() {
			task.cancel.cancel();

			tracing::warn!("Client dropped without close(); refresh loop cancelled without a join.");
		}
	}
}
