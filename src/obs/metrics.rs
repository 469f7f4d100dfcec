// crates.io
use time::OffsetDateTime;
// self
use crate::obs::{OperationKind, OperationOutcome};

/// Increments `record_store_operation_total{operation, outcome}` (when enabled).
pub fn record_operation_outcome(kind: OperationKind, outcome: OperationOutcome) {
	#[cfg(feature = "metrics")]
	metrics::counter!(
		"record_store_operation_total",
		"operation" => kind.as_str(),
		"outcome" => outcome.as_str()
	)
	.increment(1);
	#[cfg(not(feature = "metrics"))]
	let _ = (kind, outcome);
}

/// Publishes the cached admin token's expiry as a Unix timestamp gauge (when enabled).
pub fn record_token_expiry(expires_at: OffsetDateTime) {
	#[cfg(feature = "metrics")]
	metrics::gauge!("record_store_admin_token_expiry_seconds")
		.set(expires_at.unix_timestamp() as f64);
	#[cfg(not(feature = "metrics"))]
	let _ = expires_at;
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn helpers_noop_without_recorder() {
		record_operation_outcome(OperationKind::View, OperationOutcome::Failure);
		record_operation_outcome(OperationKind::Authenticate, OperationOutcome::Joined);
		record_token_expiry(OffsetDateTime::UNIX_EPOCH);
	}
}
