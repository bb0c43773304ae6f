//! API key and secret pair supplied once by the caller.

// self
use crate::{
	_prelude::*,
	auth::{Secret, validate_api_key, validate_api_secret},
	error::ConfigError,
};

/// Environment variable holding the API key for [`Credential::from_env`].
pub const API_KEY_ENV: &str = "PAYSIGN_API_KEY";
/// Environment variable holding the API secret for [`Credential::from_env`].
pub const API_SECRET_ENV: &str = "PAYSIGN_API_SECRET";

/// Validated, immutable API credential.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential {
	api_key: String,
	api_secret: Secret,
}
impl Credential {
	/// Validates the API key (UUID) and API secret (base64url, at least 32 decoded bytes).
	pub fn new(api_key: impl Into<String>, api_secret: impl Into<String>) -> Result<Self> {
		let api_key = api_key.into();
		let api_secret = Secret::new(api_secret);

		validate_api_key(&api_key)?;
		validate_api_secret(api_secret.expose())?;

		Ok(Self { api_key, api_secret })
	}

	/// Reads the credential from [`API_KEY_ENV`] and [`API_SECRET_ENV`].
	pub fn from_env() -> Result<Self> {
		let api_key = read_env(API_KEY_ENV)?;
		let api_secret = read_env(API_SECRET_ENV)?;

		Self::new(api_key, api_secret)
	}

	/// API key sent as `X-Auth-Key`.
	pub fn api_key(&self) -> &str {
		&self.api_key
	}

	/// API secret used as the HMAC key; never sent over the wire.
	pub fn api_secret(&self) -> &Secret {
		&self.api_secret
	}
}
impl Debug for Credential {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("Credential")
			.field("api_key", &self.api_key)
			.field("api_secret", &self.api_secret)
			.finish()
	}
}

fn read_env(name: &'static str) -> Result<String> {
	std::env::var(name).map_err(|_| ConfigError::MissingEnv { name }.into())
}

#[cfg(test)]
mod tests {
	// self
	use super::*;
	use crate::auth::Field;

	const API_KEY: &str = "e81d298b-60dd-4f46-9ec9-1dbc72f5b5df";
	const API_SECRET: &str = "GJlN718sQxN1unxbLWHVlcf0FgXw2kMyfRwD0mgTRME=";

	#[test]
	fn credential_validates_both_parts() {
		let credential =
			Credential::new(API_KEY, API_SECRET).expect("Reference credential should be valid.");

		assert_eq!(credential.api_key(), API_KEY);
		assert_eq!(credential.api_secret().expose(), API_SECRET);

		let err = Credential::new("shop-key", API_SECRET)
			.expect_err("A non-UUID API key must be rejected.");

		assert_eq!(err.field(), Some(Field::ApiKey));

		let err = Credential::new(API_KEY, "c29tZXRleHQ=")
			.expect_err("A secret shorter than 32 bytes must be rejected.");

		assert_eq!(err.field(), Some(Field::ApiSecret));
	}

	#[test]
	fn debug_redacts_secret() {
		let credential =
			Credential::new(API_KEY, API_SECRET).expect("Reference credential should be valid.");
		let rendered = format!("{credential:?}");

		assert!(rendered.contains(API_KEY));
		assert!(!rendered.contains(API_SECRET));
	}
}
