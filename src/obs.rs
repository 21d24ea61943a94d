//! Observability helpers for credential flows.
//!
//! # Spans and Counters
//!
//! - Every flow runs inside a `gigachat.flow` span carrying `flow` (see [`FlowKind`]),
//!   `stage` (call site), and, once finished, `outcome` fields.
//! - Enable the `metrics` feature to increment the `gigachat_client_flow_total` counter for
//!   every attempt/success/failure, labeled by `flow` + `outcome`.

mod metrics;
mod tracing;

pub use metrics::*;
pub use tracing::*;

// self
use crate::_prelude::*;

/// Credential flows observed by the client.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FlowKind {
	/// First token exchange during construction.
	Initial,
	/// Periodic refresh performed by the background loop.
	Background,
	/// Refresh forced by a rejected token.
	Forced,
	/// Authenticated API call.
	Dispatch,
}
impl FlowKind {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			FlowKind::Initial => "initial",
			FlowKind::Background => "background",
			FlowKind::Forced => "forced",
			FlowKind::Dispatch => "dispatch",
		}
	}
}
impl Display for FlowKind {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Outcome labels recorded for each attempt.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FlowOutcome {
	/// Entry to a flow.
	Attempt,
	/// Successful completion.
	Success,
	/// Failure, whether propagated or contained.
	Failure,
}
impl FlowOutcome {
	/// Terminal outcome of a finished flow.
	pub fn of<T, E>(result: &std::result::Result<T, E>) -> Self {
		if result.is_ok() { FlowOutcome::Success } else { FlowOutcome::Failure }
	}

	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			FlowOutcome::Attempt => "attempt",
			FlowOutcome::Success => "success",
			FlowOutcome::Failure => "failure",
		}
	}
}
impl Display for FlowOutcome {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}
