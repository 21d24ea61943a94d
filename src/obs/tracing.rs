// crates.io
use tracing::{Instrument, Span, field};
// self
use crate::{
	_prelude::*,
	obs::{self, FlowKind, FlowOutcome},
};

/// Span wrapping one credential flow, tagged with its kind, call site, and outcome.
#[derive(Clone, Debug)]
pub struct FlowSpan {
	kind: FlowKind,
	span: Span,
}
impl FlowSpan {
	/// Opens a `gigachat.flow` span for `kind` at `stage`.
	pub fn new(kind: FlowKind, stage: &'static str) -> Self {
		let span = tracing::info_span!(
			"gigachat.flow",
			flow = kind.as_str(),
			stage,
			outcome = field::Empty,
		);

		Self { kind, span }
	}

	/// Runs `fut` inside the span, counting the attempt and its outcome.
	///
	/// A future dropped before completion records only the attempt.
	pub async fn observe<Fut, T, E>(&self, fut: Fut) -> std::result::Result<T, E>
	where
		Fut: Future<Output = std::result::Result<T, E>>,
	{
		obs::record_flow_outcome(self.kind, FlowOutcome::Attempt);

		let result = fut.instrument(self.span.clone()).await;
		let outcome = FlowOutcome::of(&result);

		self.span.record("outcome", outcome.as_str());
		obs::record_flow_outcome(self.kind, outcome);

		result
	}
}
