// self
use crate::{_prelude::*, obs::EntryFlow};

/// A span builder used by entry flows.
#[derive(Clone, Debug)]
pub struct EntrySpan {
	#[cfg(feature = "tracing")]
	span: tracing::Span,
}
impl EntrySpan {
	/// Creates a new span tagged with the provided flow + stage.
	pub fn new(flow: EntryFlow, stage: &'static str) -> Self {
		#[cfg(feature = "tracing")]
		{
			let span = tracing::info_span!("session_entry.flow", flow = flow.as_str(), stage);

			Self { span }
		}
		#[cfg(not(feature = "tracing"))]
		{
			let _ = (flow, stage);

			Self {}
		}
	}

	/// Enters the span for the rest of the request.
	pub fn entered(self) -> EntrySpanGuard {
		#[cfg(feature = "tracing")]
		{
			EntrySpanGuard { guard: self.span.entered() }
		}
		#[cfg(not(feature = "tracing"))]
		{
			let _ = self;

			EntrySpanGuard {}
		}
	}
}

/// RAII guard returned by [`EntrySpan::entered`].
pub struct EntrySpanGuard {
	#[cfg(feature = "tracing")]
	#[allow(dead_code)]
	guard: tracing::span::EnteredSpan,
}
impl Debug for EntrySpanGuard {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str("EntrySpanGuard(..)")
	}
}
