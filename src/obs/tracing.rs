// self
use crate::{_prelude::*, obs::OperationKind};

/// Type alias that resolves to an instrumented future when tracing is enabled.
#[cfg(feature = "tracing")]
pub type InstrumentedOperation<F> = tracing::instrument::Instrumented<F>;
/// Passthrough future type when tracing is disabled.
#[cfg(not(feature = "tracing"))]
pub type InstrumentedOperation<F> = F;

/// A span builder used by client operations.
#[derive(Clone, Debug)]
pub struct OperationSpan {
	#[cfg(feature = "tracing")]
	span: tracing::Span,
}
impl OperationSpan {
	/// Creates a new span tagged with the provided operation kind + stage.
	pub fn new(kind: OperationKind, stage: &'static str) -> Self {
		#[cfg(feature = "tracing")]
		{
			let span =
				tracing::info_span!("record_store.operation", operation = kind.as_str(), stage);

			Self { span }
		}
		#[cfg(not(feature = "tracing"))]
		{
			let _ = (kind, stage);

			Self {}
		}
	}

	/// Instruments an async block without holding a guard across `.await` points.
	pub fn instrument<Fut>(&self, fut: Fut) -> InstrumentedOperation<Fut>
	where
		Fut: Future,
	{
		#[cfg(feature = "tracing")]
		{
			use tracing::Instrument;

			fut.instrument(self.span.clone())
		}
		#[cfg(not(feature = "tracing"))]
		{
			fut
		}
	}
}

/// Emits a debug event after a successful admin authentication.
pub fn trace_token_refreshed(expires_at: OffsetDateTime) {
	#[cfg(feature = "tracing")]
	tracing::debug!(%expires_at, "admin token refreshed");
	#[cfg(not(feature = "tracing"))]
	let _ = expires_at;
}

/// Emits a debug event when a caller reused the outcome of another caller's authentication.
pub fn trace_auth_joined(success: bool) {
	#[cfg(feature = "tracing")]
	tracing::debug!(success, "joined in-flight admin authentication");
	#[cfg(not(feature = "tracing"))]
	let _ = success;
}

/// Emits a warning event for an operation that failed.
pub fn trace_operation_failure(kind: OperationKind, err: &Error) {
	#[cfg(feature = "tracing")]
	tracing::warn!(
		operation = kind.as_str(),
		status = err.status(),
		error = %err,
		"record store operation failed"
	);
	#[cfg(not(feature = "tracing"))]
	let _ = (kind, err);
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn helpers_noop_without_subscriber() {
		trace_token_refreshed(OffsetDateTime::now_utc());
		trace_auth_joined(true);
		trace_operation_failure(
			OperationKind::Delete,
			&Error::Api { operation: OperationKind::Delete, status: 500, body: String::new() },
		);
	}

	#[cfg(feature = "tracing")]
	#[tokio::test]
	async fn instrument_wraps_future() {
		let span = OperationSpan::new(OperationKind::List, "instrument_wraps_future");
		let value = span.instrument(async { 42 }).await;

		assert_eq!(value, 42);
	}
}
