//! Shared fixtures for integration tests.

#![allow(dead_code)]

// std
use std::sync::Arc;
// crates.io
use parking_lot::Mutex;
// self
use paysign::{
	auth::Credential,
	executor::RequestExecutor,
	http::{HttpClientError, HttpRequest, HttpResponse, HttpTransport},
	oauth2::http::{HeaderMap, Method, StatusCode},
	token::TokenClient,
	url::Url,
};

pub const API_KEY: &str = "e81d298b-60dd-4f46-9ec9-1dbc72f5b5df";
pub const API_SECRET: &str = "JrXRHCnUegQJAYSJ5J6OvEuOUOpy2q2-MHPoH_IECRY=";
pub const TOKEN_PATH: &str = "/api/merchantintegration/v1/token/obtain";

pub fn credential() -> Credential {
	Credential::new(API_KEY, API_SECRET).expect("Fixture credential should be valid.")
}

pub fn endpoint(base: &str, path: &str) -> Url {
	Url::parse(&format!("{base}{path}")).expect("Fixture endpoint should parse.")
}

/// Snapshot of a request seen by [`RecordingTransport`].
#[derive(Clone, Debug)]
pub struct RecordedRequest {
	pub method: Method,
	pub uri: String,
	pub headers: HeaderMap,
	pub body: Vec<u8>,
}
impl RecordedRequest {
	pub fn header(&self, name: &str) -> &str {
		self.headers
			.get(name)
			.unwrap_or_else(|| panic!("Header {name} should be present."))
			.to_str()
			.expect("Header value should be visible ASCII.")
	}

	pub fn json(&self) -> serde_json::Value {
		serde_json::from_slice(&self.body).expect("Request body should be JSON.")
	}
}

/// Canned reply handed back by [`RecordingTransport`].
#[derive(Clone, Debug)]
pub enum Reply {
	Response { status: u16, body: Vec<u8> },
	Io(std::io::ErrorKind),
	Other(String),
}

/// Transport that records every request and answers with a fixed reply.
#[derive(Clone, Debug)]
pub struct RecordingTransport {
	reply: Reply,
	requests: Arc<Mutex<Vec<RecordedRequest>>>,
}
impl RecordingTransport {
	pub fn respond(status: u16, body: impl Into<Vec<u8>>) -> Self {
		Self::with_reply(Reply::Response { status, body: body.into() })
	}

	pub fn with_reply(reply: Reply) -> Self {
		Self { reply, requests: Default::default() }
	}

	pub fn requests(&self) -> Vec<RecordedRequest> {
		self.requests.lock().clone()
	}

	pub fn single_request(&self) -> RecordedRequest {
		let requests = self.requests();

		assert_eq!(requests.len(), 1, "Exactly one request should have been sent.");

		requests.into_iter().next().expect("One request was asserted above.")
	}
}
impl HttpTransport for RecordingTransport {
	type TransportError = std::io::Error;

	async fn send(
		&self,
		request: HttpRequest,
	) -> Result<HttpResponse, HttpClientError<Self::TransportError>> {
		self.requests.lock().push(RecordedRequest {
			method: request.method().clone(),
			uri: request.uri().to_string(),
			headers: request.headers().clone(),
			body: request.body().clone(),
		});

		match &self.reply {
			Reply::Response { status, body } => {
				let mut response = HttpResponse::new(body.clone());

				*response.status_mut() =
					StatusCode::from_u16(*status).expect("Fixture status should be valid.");

				Ok(response)
			},
			Reply::Io(kind) => Err(HttpClientError::Io(std::io::Error::new(*kind, "fixture"))),
			Reply::Other(message) => Err(HttpClientError::Other(message.clone())),
		}
	}
}

pub fn recording_token_client(
	transport: &RecordingTransport,
) -> TokenClient<RecordingTransport> {
	TokenClient::new(
		endpoint("https://api.example.com", TOKEN_PATH),
		credential(),
		RequestExecutor::new(transport.clone()),
	)
}
