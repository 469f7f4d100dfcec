//! Admin credentials, redacted token values, and the cached token state.

pub mod credentials;
pub mod token;

pub use credentials::*;
pub use token::*;
