//! Demonstrates plugging a non-reqwest transport into the executor.
//!
//! 1. Implement [`HttpTransport`] for your own client type.
//! 2. Report failures through the matching [`HttpClientError`] variant.
//! 3. Wrap the transport in a [`RequestExecutor`] and hand it to [`TokenClient::new`].
//! 4. Inspect the typed [`Error`] returned for transport and status failures.

// std
use std::{
	error::Error as StdError,
	fmt::{Display, Formatter, Result as FmtResult},
};
// crates.io
use color_eyre::Result;
// self
use paysign::{
	auth::Credential,
	config::{Endpoints, Environment},
	error::Error,
	executor::RequestExecutor,
	http::{HttpClientError, HttpRequest, HttpResponse, HttpTransport},
	oauth2::http::StatusCode,
	token::TokenClient,
};

const API_KEY: &str = "e81d298b-60dd-4f46-9ec9-1dbc72f5b5df";
const API_SECRET: &str = "GJlN718sQxN1unxbLWHVlcf0FgXw2kMyfRwD0mgTRME=";

#[tokio::main]
async fn main() -> Result<()> {
	color_eyre::install()?;

	let endpoints = Endpoints::for_environment(Environment::Sandbox)?;
	let credential = Credential::new(API_KEY, API_SECRET)?;

	for behavior in [
		MockBehavior::Success,
		MockBehavior::Rejected,
		MockBehavior::TransportError(MockTransportError::DnsFailure {
			host: "api.sandbox.paydirekt.de",
		}),
		MockBehavior::Other("upstream connection closed"),
	] {
		let client = TokenClient::new(
			endpoints.token_obtain.clone(),
			credential.clone(),
			RequestExecutor::new(MockHttpClient { behavior }),
		);

		match client.obtain_access_token().await {
			Ok(token) => println!("Mock transport issued a token: {}.", token.expose()),
			Err(Error::Status(e)) =>
				println!("Platform rejected the request with {} message(s): {e}", e.messages.len()),
			Err(e) => println!("Transport failure surfaced as: {e}"),
		}
	}

	Ok(())
}

#[derive(Clone, Debug)]
enum MockTransportError {
	DnsFailure { host: &'static str },
}
impl Display for MockTransportError {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		match self {
			Self::DnsFailure { host } => write!(f, "DNS lookup failed for {host}"),
		}
	}
}
impl StdError for MockTransportError {}

#[derive(Clone, Debug)]
enum MockBehavior {
	Success,
	Rejected,
	TransportError(MockTransportError),
	Other(&'static str),
}

struct MockHttpClient {
	behavior: MockBehavior,
}
impl HttpTransport for MockHttpClient {
	type TransportError = MockTransportError;

	async fn send(
		&self,
		request: HttpRequest,
	) -> Result<HttpResponse, HttpClientError<Self::TransportError>> {
		assert!(request.headers().contains_key("x-auth-code"), "Requests arrive signed.");

		match self.behavior.clone() {
			MockBehavior::Success => Ok(HttpResponse::new(
				b"{\"access_token\":\"mock-access\",\"expires_in\":900}".to_vec(),
			)),
			MockBehavior::Rejected => {
				let mut response = HttpResponse::new(
					b"{\"messages\":[{\"severity\":\"ERROR\",\"code\":\"auth.invalid\"}]}".to_vec(),
				);

				*response.status_mut() = StatusCode::UNAUTHORIZED;

				Ok(response)
			},
			// The `Reqwest` variant boxes any transport error type, not only reqwest's.
			MockBehavior::TransportError(error) => Err(HttpClientError::Reqwest(Box::new(error))),
			MockBehavior::Other(message) => Err(HttpClientError::Other(message.to_owned())),
		}
	}
}
