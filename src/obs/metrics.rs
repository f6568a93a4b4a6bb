// self
use crate::obs::{EntryFlow, EntryOutcome};

/// Records an entry outcome via the global metrics recorder (when enabled).
pub fn record_entry_outcome(flow: EntryFlow, outcome: EntryOutcome) {
	#[cfg(feature = "metrics")]
	{
		metrics::counter!(
			"session_entry_outcome_total",
			"flow" => flow.as_str(),
			"outcome" => outcome.as_str()
		)
		.increment(1);
	}

	#[cfg(not(feature = "metrics"))]
	{
		let _ = (flow, outcome);
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn record_entry_outcome_noop_without_metrics() {
		record_entry_outcome(EntryFlow::Logout, EntryOutcome::Failure);
	}
}
