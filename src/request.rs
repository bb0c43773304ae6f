//! Prepared-request constructors shared by token acquisition and the domain clients.
//!
//! Requests are assembled from a target URL plus a [`RequestHeaders`] value enumerating the
//! optional headers, then handed to a [`RequestExecutor`](crate::executor::RequestExecutor).

pub mod hal;

pub use hal::*;

// crates.io
use oauth2::http::{
	Method, Request,
	header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE, HeaderName},
	request::Builder,
};
// self
use crate::{_prelude::*, auth::AccessToken, error::ConfigError, http::HttpRequest};

/// `Content-Type` sent with every HAL JSON request.
pub const HAL_JSON_CONTENT_TYPE: &str = "application/hal+json;charset=utf-8";
/// `Accept` sent with every HAL JSON request.
pub const HAL_JSON_ACCEPT: &str = "application/hal+json";

/// Optional headers attached to a prepared request.
#[derive(Clone, Debug, Default)]
pub struct RequestHeaders {
	/// Access token sent as `Authorization: Bearer <token>`.
	pub bearer: Option<AccessToken>,
	/// Adds HAL JSON `Content-Type` and `Accept` headers.
	pub hal_json: bool,
	/// Additional headers appended in order.
	pub extra: Vec<(HeaderName, String)>,
}
impl RequestHeaders {
	/// HAL JSON content headers only.
	pub fn hal_json() -> Self {
		Self { hal_json: true, ..Default::default() }
	}

	/// Headers required by every authenticated platform call: bearer token plus HAL JSON.
	pub fn authorized(token: &AccessToken) -> Self {
		Self { bearer: Some(token.clone()), hal_json: true, ..Default::default() }
	}

	/// Appends an extra header.
	pub fn with_header(mut self, name: HeaderName, value: impl Into<String>) -> Self {
		self.extra.push((name, value.into()));

		self
	}

	fn apply(self, mut builder: Builder) -> Builder {
		if let Some(token) = &self.bearer {
			builder = builder.header(AUTHORIZATION, token.bearer());
		}
		if self.hal_json {
			builder = builder.header(CONTENT_TYPE, HAL_JSON_CONTENT_TYPE).header(ACCEPT, HAL_JSON_ACCEPT);
		}

		for (name, value) in self.extra {
			builder = builder.header(name, value);
		}

		builder
	}
}

/// Prepares a `GET` request with an empty body.
pub fn get(url: &Url, headers: RequestHeaders) -> Result<HttpRequest> {
	let request = headers
		.apply(Request::builder().method(Method::GET).uri(url.as_str()))
		.body(Vec::new())
		.map_err(ConfigError::from)?;

	Ok(request)
}

/// Prepares a `POST` request whose body is `body` encoded as JSON.
pub fn post_json<B>(url: &Url, headers: RequestHeaders, body: &B) -> Result<HttpRequest>
where
	B: ?Sized + Serialize,
{
	let payload =
		serde_json::to_vec(body).map_err(|source| ConfigError::RequestBody { source })?;
	let request = headers
		.apply(Request::builder().method(Method::POST).uri(url.as_str()))
		.body(payload)
		.map_err(ConfigError::from)?;

	Ok(request)
}
