//! Redacted admin token wrapper and the expiring token state guarded by the client.

// self
use crate::_prelude::*;

/// Validity window assigned to a freshly issued admin token.
pub const DEFAULT_TOKEN_TTL: Duration = Duration::minutes(60);

/// Redacted admin token keeping sensitive material out of logs.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdminToken(String);
impl AdminToken {
	/// Wraps a new token string.
	pub fn new(value: impl Into<String>) -> Self {
		Self(value.into())
	}

	/// Returns the inner token value. Callers must avoid logging this string.
	pub fn expose(&self) -> &str {
		&self.0
	}
}
impl AsRef<str> for AdminToken {
	fn as_ref(&self) -> &str {
		self.expose()
	}
}
impl Debug for AdminToken {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_tuple("AdminToken").field(&"<redacted>").finish()
	}
}
impl Display for AdminToken {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str("<redacted>")
	}
}

/// Current token plus the instant it stops being usable.
///
/// A fresh state has no token and an expiry at the Unix epoch, so the first caller always
/// authenticates.
#[derive(Clone)]
pub struct TokenState {
	token: Option<AdminToken>,
	expires_at: OffsetDateTime,
}
impl TokenState {
	/// Returns the token when `expires_at` is strictly after `instant`.
	pub fn valid_token_at(&self, instant: OffsetDateTime) -> Option<&AdminToken> {
		if self.expires_at > instant { self.token.as_ref() } else { None }
	}

	/// Returns `true` if a token is usable at `instant`.
	pub fn is_valid_at(&self, instant: OffsetDateTime) -> bool {
		self.valid_token_at(instant).is_some()
	}

	/// Expiry instant of the stored token (the Unix epoch when none was issued).
	pub fn expires_at(&self) -> OffsetDateTime {
		self.expires_at
	}

	/// Stores a token issued at `issued_at` that stays valid for `ttl`.
	pub fn install(&mut self, token: AdminToken, issued_at: OffsetDateTime, ttl: Duration) {
		self.token = Some(token);
		self.expires_at = issued_at + ttl;
	}

	/// Drops the token so the next caller re-authenticates.
	pub fn clear(&mut self) {
		self.token = None;
		self.expires_at = OffsetDateTime::UNIX_EPOCH;
	}
}
impl Default for TokenState {
	fn default() -> Self {
		Self { token: None, expires_at: OffsetDateTime::UNIX_EPOCH }
	}
}
impl Debug for TokenState {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("TokenState")
			.field("token", &self.token.as_ref().map(|_| "<redacted>"))
			.field("expires_at", &self.expires_at)
			.finish()
	}
}

#[cfg(test)]
mod tests {
	// crates.io
	use time::macros;
	// self
	use super::*;

	#[test]
	fn token_formatters_redact() {
		let token = AdminToken::new("super-secret");

		assert_eq!(format!("{token:?}"), "AdminToken(\"<redacted>\")");
		assert_eq!(format!("{token}"), "<redacted>");
	}

	#[test]
	fn default_state_is_expired() {
		let state = TokenState::default();

		assert!(!state.is_valid_at(OffsetDateTime::now_utc()));
		assert_eq!(state.expires_at(), OffsetDateTime::UNIX_EPOCH);
	}

	#[test]
	fn validity_window_is_strict() {
		let issued = macros::datetime!(2025-01-01 00:00 UTC);
		let mut state = TokenState::default();

		state.install(AdminToken::new("tok"), issued, DEFAULT_TOKEN_TTL);

		assert_eq!(state.expires_at(), macros::datetime!(2025-01-01 01:00 UTC));
		assert!(state.is_valid_at(macros::datetime!(2025-01-01 00:59:59 UTC)));
		assert!(!state.is_valid_at(macros::datetime!(2025-01-01 01:00 UTC)));
		assert_eq!(
			state
				.valid_token_at(issued)
				.expect("Token should be valid at the issue instant.")
				.expose(),
			"tok"
		);
	}

	#[test]
	fn clear_resets_to_expired() {
		let now = OffsetDateTime::now_utc();
		let mut state = TokenState::default();

		state.install(AdminToken::new("tok"), now, DEFAULT_TOKEN_TTL);
		state.clear();

		assert!(!state.is_valid_at(now));
		assert!(!format!("{state:?}").contains("tok\""));
	}
}
