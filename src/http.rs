//! Transport primitives for platform calls.
//!
//! The crate never depends on a concrete HTTP stack. [`HttpTransport`] is the single seam:
//! it sends a prepared [`HttpRequest`] (method, URL, headers, body) and hands back the
//! [`HttpResponse`] status and body. [`ReqwestHttpClient`] is the default implementation.

pub use oauth2::{HttpClientError, HttpRequest, HttpResponse};

// self
use crate::_prelude::*;

/// Abstraction over HTTP transports capable of executing platform requests.
///
/// Implementations must be `Send + Sync + 'static` so a single transport can back any
/// number of executors, and the returned future must be `Send` so calls can hop executors.
/// A transport performs exactly one exchange per call: no retries, no caching, no redirects
/// to other endpoints. Non-success statuses are *not* errors at this layer; they are returned
/// as ordinary responses and classified by [`RequestExecutor`](crate::executor::RequestExecutor).
pub trait HttpTransport
where
	Self: 'static + Send + Sync,
{
	/// Concrete error emitted by the underlying transport.
	type TransportError: 'static + Send + Sync + StdError;

	/// Sends `request` and resolves to the raw response.
	fn send(
		&self,
		request: HttpRequest,
	) -> impl Future<Output = Result<HttpResponse, HttpClientError<Self::TransportError>>> + Send;
}

/// Thin wrapper around [`ReqwestClient`] so shared HTTP behavior lives in one place.
///
/// Signed requests must reach the endpoint they were signed for, so configure any custom
/// [`ReqwestClient`] to disable redirect following; [`ReqwestHttpClient::without_redirects`]
/// does this for you.
#[cfg(feature = "reqwest")]
#[derive(Clone, Debug, Default)]
pub struct ReqwestHttpClient(pub ReqwestClient);
#[cfg(feature = "reqwest")]
impl ReqwestHttpClient {
	/// Wraps an existing reqwest [`ReqwestClient`].
	pub fn with_client(client: ReqwestClient) -> Self {
		Self(client)
	}

	/// Builds a client that never follows redirects.
	pub fn without_redirects() -> Result<Self> {
		let client = ReqwestClient::builder()
			.redirect(reqwest::redirect::Policy::none())
			.build()
			.map_err(crate::error::ConfigError::from)?;

		Ok(Self(client))
	}
}
#[cfg(feature = "reqwest")]
impl AsRef<ReqwestClient> for ReqwestHttpClient {
	fn as_ref(&self) -> &ReqwestClient {
		&self.0
	}
}
#[cfg(feature = "reqwest")]
impl HttpTransport for ReqwestHttpClient {
	type TransportError = ReqwestError;

	fn send(
		&self,
		request: HttpRequest,
	) -> impl Future<Output = Result<HttpResponse, HttpClientError<Self::TransportError>>> + Send
	{
		let client = self.0.clone();

		async move {
			let request = reqwest::Request::try_from(request).map_err(Box::new)?;
			let response = client.execute(request).await.map_err(Box::new)?;
			let status = response.status();
			let headers = response.headers().to_owned();
			let mut converted =
				HttpResponse::new(response.bytes().await.map_err(Box::new)?.to_vec());

			*converted.status_mut() = status;
			*converted.headers_mut() = headers;

			Ok(converted)
		}
	}
}
