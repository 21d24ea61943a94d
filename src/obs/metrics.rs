// self
use crate::obs::{FlowKind, FlowOutcome};

/// Name of the counter incremented for every flow attempt and outcome.
pub const FLOW_COUNTER: &str = "gigachat_client_flow_total";

/// Increments [`FLOW_COUNTER`] on the global recorder; a no-op without the `metrics`
/// feature.
#[cfg(feature = "metrics")]
pub fn record_flow_outcome(kind: FlowKind, outcome: FlowOutcome) {
	metrics::counter!(FLOW_COUNTER, "flow" => kind.as_str(), "outcome" => outcome.as_str())
		.increment(1);
}

/// Increments [`FLOW_COUNTER`] on the global recorder; a no-op without the `metrics`
/// feature.
#[cfg(not(feature = "metrics"))]
pub fn record_flow_outcome(_: FlowKind, _: FlowOutcome) {}
