//! Typed async client for PocketBase-style record stores—admin token caching with singleflight
//! refresh, sparse list queries, and transport-aware errors in one crate built for backend services.

#![deny(clippy::all, missing_docs, unused_crate_dependencies)]

pub mod api;
pub mod auth;
pub mod config;
pub mod error;
pub mod flight;
pub mod http;
pub mod obs;
pub mod query;
#[cfg(any(test, feature = "test"))]
#[doc(hidden)]
pub mod _preludet {
	//! Convenience re-exports and helpers for integration tests; enabled via `cfg(test)` or the
	//! `test` feature.

	pub use crate::_prelude::*;

	// self
	use crate::{
		api::Client,
		config::{ClientConfig, RetryPolicy},
	};

	/// Admin identity used by the integration-test builders.
	pub const TEST_IDENTITY: &str = "admin@example.com";
	/// Admin password used by the integration-test builders.
	pub const TEST_PASSWORD: &str = "admin-password";

	/// Builds a client config for `base_url` with transport retries disabled so failing
	/// requests surface immediately.
	pub fn test_client_config(base_url: &str) -> Result<ClientConfig> {
		Ok(ClientConfig::new(base_url, TEST_IDENTITY, TEST_PASSWORD)?
			.with_retry_policy(RetryPolicy::disabled()))
	}

	/// Constructs a reqwest-backed [`Client`] pointed at a mock server.
	pub fn build_test_client(base_url: &str) -> Result<Client> {
		Client::from_config(test_client_config(base_url)?)
	}
}

mod _prelude {
	pub use std::{
		collections::HashMap,
		error::Error as StdError,
		fmt::{Debug, Display, Formatter, Result as FmtResult},
		future::Future,
		pin::Pin,
		sync::Arc,
		time::Duration as StdDuration,
	};

	pub use async_lock::Mutex as AsyncMutex;
	pub use parking_lot::{Mutex, RwLock};
	pub use reqwest::{Client as ReqwestClient, Error as ReqwestError, Method};
	pub use serde::{Deserialize, Serialize};
	pub use thiserror::Error as ThisError;
	pub use time::{Duration, OffsetDateTime};
	pub use url::Url;

	pub use crate::error::{Error, Result};
}

pub use reqwest;
pub use url;
#[cfg(test)] use {color_eyre as _, httpmock as _};
