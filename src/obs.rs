//! Optional observability helpers for record store operations.
//!
//! # Feature Flags
//!
//! - Enable `tracing` (default) to emit structured spans named `record_store.operation` with the
//!   `operation` and `stage` (call site) fields, plus events for token refreshes and failures.
//! - Enable `metrics` to increment the `record_store_operation_total` counter for every
//!   attempt/success/failure, labeled by `operation` + `outcome`. Admin authentication also
//!   reports `cache_hit` and `joined` outcomes and sets the `record_store_admin_token_expiry_seconds`
//!   gauge after each refresh.

mod metrics;
mod tracing;

pub use metrics::*;
pub use tracing::*;

// self
use crate::_prelude::*;

/// Operations issued against the record store.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum OperationKind {
	/// Admin password authentication.
	Authenticate,
	/// Record creation.
	Create,
	/// Record patch.
	Update,
	/// Record deletion.
	Delete,
	/// Paginated record listing.
	List,
	/// Single record fetch.
	View,
	/// Import callback notification.
	ImportCallback,
}
impl OperationKind {
	/// Returns a stable label suitable for span, metric, or error fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			OperationKind::Authenticate => "auth",
			OperationKind::Create => "create",
			OperationKind::Update => "update",
			OperationKind::Delete => "delete",
			OperationKind::List => "list",
			OperationKind::View => "view",
			OperationKind::ImportCallback => "import_callback",
		}
	}
}
impl Display for OperationKind {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Outcome labels recorded for each attempt.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum OperationOutcome {
	/// Entry to a client operation.
	Attempt,
	/// Successful completion.
	Success,
	/// Failure propagated back to the caller.
	Failure,
	/// Admin token served from the cache without any network call.
	CacheHit,
	/// Caller reused the outcome of another caller's in-flight authentication.
	Joined,
}
impl OperationOutcome {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			OperationOutcome::Attempt => "attempt",
			OperationOutcome::Success => "success",
			OperationOutcome::Failure => "failure",
			OperationOutcome::CacheHit => "cache_hit",
			OperationOutcome::Joined => "joined",
		}
	}
}
impl Display for OperationOutcome {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn labels_are_stable() {
		assert_eq!(OperationKind::ImportCallback.to_string(), "import_callback");
		assert_eq!(OperationKind::Authenticate.as_str(), "auth");
		assert_eq!(OperationOutcome::Failure.to_string(), "failure");
		assert_eq!(OperationOutcome::CacheHit.as_str(), "cache_hit");
		assert_eq!(OperationOutcome::Joined.as_str(), "joined");
	}
}
