//! Platform environments and their endpoint URLs.
//!
//! The sandbox environment is the default. Set `PAYSIGN_PRODUCTION=true` (or `1`) to target
//! production through [`Environment::from_env`].

// std
use std::net::IpAddr;
// crates.io
use url::Host;
// self
use crate::{_prelude::*, error::ConfigError};

/// Environment variable consulted by [`Environment::from_env`].
pub const PRODUCTION_ENV: &str = "PAYSIGN_PRODUCTION";

const SANDBOX_BASE: &str = "https://api.sandbox.paydirekt.de";
const PRODUCTION_BASE: &str = "https://api.paydirekt.de";
const TOKEN_OBTAIN_PATH: &str = "/api/merchantintegration/v1/token/obtain";
const CHECKOUT_PATH: &str = "/api/checkout/v1/checkouts";
const TRANSACTION_REPORTS_PATH: &str = "/api/reporting/v1/reports/transactions";

/// Target platform environment.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Environment {
	#[default]
	/// Integration sandbox.
	Sandbox,
	/// Live platform.
	Production,
}
impl Environment {
	/// Selects production when [`PRODUCTION_ENV`] is `true` or `1`, sandbox otherwise.
	pub fn from_env() -> Self {
		match std::env::var(PRODUCTION_ENV) {
			Ok(value) if is_truthy(&value) => Self::Production,
			_ => Self::Sandbox,
		}
	}

	/// Scheme + host every endpoint of this environment lives under.
	pub const fn base_url(self) -> &'static str {
		match self {
			Self::Sandbox => SANDBOX_BASE,
			Self::Production => PRODUCTION_BASE,
		}
	}
}

/// Endpoint set used by the clients.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Endpoints {
	/// Token obtain endpoint (signed `POST`).
	pub token_obtain: Url,
	/// Checkout collection endpoint.
	pub checkout: Url,
	/// Transaction report endpoint.
	pub transaction_reports: Url,
}
impl Endpoints {
	/// Returns the fixed endpoints of `environment`.
	pub fn for_environment(environment: Environment) -> Result<Self, ConfigError> {
		let base = environment.base_url();

		Ok(Self {
			token_obtain: parse_endpoint("token_obtain", base, TOKEN_OBTAIN_PATH)?,
			checkout: parse_endpoint("checkout", base, CHECKOUT_PATH)?,
			transaction_reports: parse_endpoint(
				"transaction_reports",
				base,
				TRANSACTION_REPORTS_PATH,
			)?,
		})
	}

	/// Endpoints of the environment selected by [`Environment::from_env`].
	pub fn from_env() -> Result<Self, ConfigError> {
		Self::for_environment(Environment::from_env())
	}

	/// Overrides the token endpoint, e.g. for a proxy or a local mock.
	///
	/// The URL must use HTTPS unless it points at a loopback host.
	pub fn with_token_obtain(mut self, url: Url) -> Result<Self, ConfigError> {
		ensure_secure("token_obtain", &url)?;

		self.token_obtain = url;

		Ok(self)
	}
}

fn parse_endpoint(endpoint: &'static str, base: &str, path: &str) -> Result<Url, ConfigError> {
	Url::parse(&format!("{base}{path}"))
		.map_err(|source| ConfigError::InvalidEndpoint { endpoint, source })
}

fn ensure_secure(endpoint: &'static str, url: &Url) -> Result<(), ConfigError> {
	let loopback = match url.host() {
		Some(Host::Domain(domain)) => domain.eq_ignore_ascii_case("localhost"),
		Some(Host::Ipv4(ip)) => IpAddr::V4(ip).is_loopback(),
		Some(Host::Ipv6(ip)) => IpAddr::V6(ip).is_loopback(),
		None => false,
	};

	if url.scheme() == "https" || (url.scheme() == "http" && loopback) {
		Ok(())
	} else {
		Err(ConfigError::InsecureEndpoint { endpoint, url: url.to_string() })
	}
}

fn is_truthy(value: &str) -> bool {
	let value = value.trim();

	value == "1" || value.eq_ignore_ascii_case("true")
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	fn url(value: &str) -> Url {
		Url::parse(value).expect("Fixture URL should parse.")
	}

	#[test]
	fn sandbox_is_default_and_maps_to_sandbox_hosts() {
		let endpoints = Endpoints::for_environment(Environment::default())
			.expect("Sandbox endpoints should parse.");

		assert_eq!(
			endpoints.token_obtain.as_str(),
			"https://api.sandbox.paydirekt.de/api/merchantintegration/v1/token/obtain"
		);
		assert_eq!(
			endpoints.checkout.as_str(),
			"https://api.sandbox.paydirekt.de/api/checkout/v1/checkouts"
		);
		assert_eq!(
			endpoints.transaction_reports.as_str(),
			"https://api.sandbox.paydirekt.de/api/reporting/v1/reports/transactions"
		);
	}

	#[test]
	fn production_endpoints_share_paths() {
		let endpoints = Endpoints::for_environment(Environment::Production)
			.expect("Production endpoints should parse.");

		assert_eq!(
			endpoints.token_obtain.as_str(),
			"https://api.paydirekt.de/api/merchantintegration/v1/token/obtain"
		);
		assert_eq!(endpoints.checkout.host_str(), Some("api.paydirekt.de"));
	}

	#[test]
	fn token_override_requires_https_or_loopback() {
		let endpoints = Endpoints::for_environment(Environment::Sandbox)
			.expect("Sandbox endpoints should parse.");

		endpoints
			.clone()
			.with_token_obtain(url("http://127.0.0.1:8080/token"))
			.expect("Loopback HTTP is allowed.");
		endpoints
			.clone()
			.with_token_obtain(url("http://localhost/token"))
			.expect("localhost HTTP is allowed.");
		endpoints
			.clone()
			.with_token_obtain(url("https://proxy.example.com/token"))
			.expect("HTTPS is allowed.");

		let err = endpoints
			.with_token_obtain(url("http://proxy.example.com/token"))
			.expect_err("Remote plain HTTP must be rejected.");

		assert!(matches!(err, ConfigError::InsecureEndpoint { endpoint: "token_obtain", .. }));
	}

	#[test]
	fn truthy_values() {
		assert!(is_truthy("true"));
		assert!(is_truthy(" TRUE "));
		assert!(is_truthy("1"));
		assert!(!is_truthy("yes"));
		assert!(!is_truthy(""));
	}
}
