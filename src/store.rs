//! Guarded cell holding the client's single live credential.

// self
use crate::{_prelude::*, auth::Credential};

/// Reader/writer cell holding exactly one [`Credential`].
///
/// Readers clone an `Arc` snapshot, writers swap the `Arc`; neither holds the lock across
/// an `.await` or a network call. Concurrent replacements serialize and the last one wins.
#[derive(Debug)]
pub struct TokenStore {
	current: RwLock<Arc<Credential>>,
}
impl TokenStore {
	/// Creates a store seeded with the initial credential.
	pub fn new(initial: Credential) -> Self {
		Self { current: RwLock::new(Arc::new(initial)) }
	}

	/// Returns a consistent snapshot of the current credential.
	pub fn read(&self) -> Arc<Credential> {
		self.current.read().clone()
	}

	/// Installs `next` as the current credential and returns the installed snapshot.
	pub fn replace(&self, next: Credential) -> Arc<Credential> {
		let next = Arc::new(next);

		*self.current.write() = next.clone();

		next
	}

	/// Returns `true` when `snapshot` is still the installed credential.
	pub fn is_current(&self, snapshot: &Arc<Credential>) -> bool {
		Arc::ptr_eq(&self.current.read(), snapshot)
	}
}
