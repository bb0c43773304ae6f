//! `paysign_call_total` counter.

// self
use crate::obs::{CallKind, CallOutcome};

/// Bumps `paysign_call_total{op, outcome}` on the installed `metrics` recorder.
///
/// Each call records one `attempt` and then exactly one `success` or `failure`.
pub fn record_call_outcome(kind: CallKind, outcome: CallOutcome) {
	#[cfg(feature = "metrics")]
	{
		metrics::counter!(
			"paysign_call_total",
			"op" => kind.as_str(),
			"outcome" => outcome.as_str()
		)
		.increment(1);
	}

	#[cfg(not(feature = "metrics"))]
	{
		let _ = (kind, outcome);
	}
}
