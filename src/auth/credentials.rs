//! Admin identity + password pair used by the authentication endpoint.

// self
use crate::_prelude::*;

/// Admin account credentials supplied once at client construction.
#[derive(Clone, PartialEq, Eq)]
pub struct AdminCredentials {
	identity: String,
	password: String,
}
impl AdminCredentials {
	/// Creates credentials for the provided identity (email) and password.
	pub fn new(identity: impl Into<String>, password: impl Into<String>) -> Self {
		Self { identity: identity.into(), password: password.into() }
	}

	/// Returns the admin identity.
	pub fn identity(&self) -> &str {
		&self.identity
	}

	/// Returns the admin password. Callers must avoid logging this string.
	pub fn expose_password(&self) -> &str {
		&self.password
	}

	/// Builds the JSON payload expected by the authentication endpoint.
	pub(crate) fn to_auth_body(&self) -> AuthWithPasswordBody<'_> {
		AuthWithPasswordBody { identity: &self.identity, password: &self.password }
	}
}
impl Debug for AdminCredentials {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("AdminCredentials")
			.field("identity", &self.identity)
			.field("password", &"<redacted>")
			.finish()
	}
}

#[derive(Serialize)]
pub(crate) struct AuthWithPasswordBody<'a> {
	identity: &'a str,
	password: &'a str,
}
