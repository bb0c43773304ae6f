//! Access token returned by the token endpoint.

// self
use crate::{_prelude::*, auth::Secret};

/// Bearer credential issued by the platform.
///
/// Only `access_token` and `expires_in` are read from the response; any other fields are
/// ignored. Refreshing before [`expires_in`](Self::expires_in) elapses is up to the caller.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessToken {
	/// Opaque token value.
	#[serde(rename = "access_token")]
	pub token: Secret,
	/// Lifetime in seconds, counted from issuance.
	#[serde(rename = "expires_in")]
	pub expires_in_seconds: u64,
}
impl AccessToken {
	/// Creates a token from its parts.
	pub fn new(token: impl Into<String>, expires_in_seconds: u64) -> Self {
		Self { token: Secret::new(token), expires_in_seconds }
	}

	/// Returns the raw token value. Callers must avoid logging this string.
	pub fn expose(&self) -> &str {
		self.token.expose()
	}

	/// Lifetime as a [`Duration`], saturating at [`Duration::MAX`].
	pub fn expires_in(&self) -> Duration {
		i64::try_from(self.expires_in_seconds).map(Duration::seconds).unwrap_or(Duration::MAX)
	}

	/// `Authorization` header value: `Bearer <token>`.
	pub fn bearer(&self) -> String {
		format!("Bearer {}", self.expose())
	}
}
