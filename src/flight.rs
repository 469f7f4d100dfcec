//! Keyed singleflight guards that collapse concurrent identical operations into one.
//!
//! A [`Flight`] pairs an async gate with a landing counter. Callers take a [`FlightTicket`]
//! before checking whatever cached state the flight protects, then [`Flight::board`] it. The first
//! caller through the gate becomes the [`FlightLeader`] and performs the work; callers that were
//! waiting while a leader landed receive the recorded outcome instead of repeating the work. A
//! leader dropped without landing (cancelled or short-circuited) records nothing, and the next
//! waiter takes over.

// std
use std::sync::atomic::{AtomicU64, Ordering};
// crates.io
use async_lock::MutexGuard as AsyncMutexGuard;
// self
use crate::_prelude::*;

/// Registry of flights keyed by a static operation label.
pub struct SingleFlight<T, E> {
	flights: Mutex<HashMap<&'static str, Arc<Flight<T, E>>>>,
}
impl<T, E> SingleFlight<T, E> {
	/// Returns (and creates on demand) the flight for `key`.
	pub fn flight(&self, key: &'static str) -> Arc<Flight<T, E>> {
		let mut flights = self.flights.lock();

		flights.entry(key).or_insert_with(|| Arc::new(Flight::default())).clone()
	}
}
impl<T, E> Default for SingleFlight<T, E> {
	fn default() -> Self {
		Self { flights: Default::default() }
	}
}
impl<T, E> Debug for SingleFlight<T, E> {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("SingleFlight").field("keys", &self.flights.lock().len()).finish()
	}
}

/// Marker recording how many flights had landed when a caller arrived.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FlightTicket(u64);

/// Result of boarding a flight.
pub enum Boarding<'a, T, E> {
	/// Another caller completed the work while this one waited.
	Landed(Result<T, E>),
	/// This caller holds the gate and must perform the work.
	Leader(FlightLeader<'a, T, E>),
}

/// One de-duplicated unit of work.
pub struct Flight<T, E> {
	gate: AsyncMutex<()>,
	landings: AtomicU64,
	last: Mutex<Option<Result<T, E>>>,
}
impl<T, E> Flight<T, E>
where
	T: Clone,
	E: Clone,
{
	/// Issues a ticket. Take it before inspecting the cached state the flight protects.
	pub fn ticket(&self) -> FlightTicket {
		FlightTicket(self.landings.load(Ordering::Acquire))
	}

	/// Waits for the gate, then either hands back the outcome of a flight that landed after
	/// `ticket` was issued or makes the caller the leader.
	pub async fn board(&self, ticket: FlightTicket) -> Boarding<'_, T, E> {
		let gate = self.gate.lock().await;

		let landed = match self.landings.load(Ordering::Acquire) > ticket.0 {
			true => self.last.lock().clone(),
			false => None,
		};

		if let Some(outcome) = landed {
			return Boarding::Landed(outcome);
		}

		Boarding::Leader(FlightLeader { flight: self, _gate: gate })
	}

	/// Number of flights that have landed so far.
	pub fn landings(&self) -> u64 {
		self.landings.load(Ordering::Acquire)
	}
}
impl<T, E> Default for Flight<T, E> {
	fn default() -> Self {
		Self { gate: AsyncMutex::new(()), landings: AtomicU64::new(0), last: Mutex::new(None) }
	}
}

/// Exclusive right to perform the flight's work; releases the gate on drop.
pub struct FlightLeader<'a, T, E> {
	flight: &'a Flight<T, E>,
	_gate: AsyncMutexGuard<'a, ()>,
}
impl<T, E> FlightLeader<'_, T, E>
where
	T: Clone,
	E: Clone,
{
	/// Records the outcome for waiting callers and releases the gate.
	pub fn land(self, outcome: &Result<T, E>) {
		*self.flight.last.lock() = Some(outcome.clone());

		self.flight.landings.fetch_add(1, Ordering::AcqRel);
	}
}
impl<T, E> Debug for FlightLeader<'_, T, E> {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str("FlightLeader(..)")
	}
}
