//! Signed access-token acquisition.
//!
//! [`TokenClient::obtain_access_token`] performs the whole exchange in a fixed order: read the
//! clock once, draw a fresh request id and nonce, sign `requestId:timestamp:apiKey:nonce` with
//! the API secret, then `POST` the signed request and decode the [`AccessToken`]. Every call
//! uses a never-before-seen request id and nonce; replay protection itself is enforced by the
//! platform. Failures are surfaced as-is and never retried.

// crates.io
use oauth2::http::header::HeaderName;
// self
use crate::{
	_prelude::*,
	auth::{AccessToken, Credential, Field, SigningContext, ValidationError},
	executor::RequestExecutor,
	http::{HttpRequest, HttpTransport},
	obs::{self, CallKind, CallOutcome, CallSpan},
	request::{self, RequestHeaders},
};
#[cfg(feature = "reqwest")]
use crate::{config::Endpoints, http::ReqwestHttpClient};

/// Grant type sent with every token request.
pub const GRANT_TYPE_API_KEY: &str = "api_key";

/// `X-Date` header: RFC 1123 GMT date of the signing instant.
pub const X_DATE: &str = "x-date";
/// `X-Request-ID` header: request id used in the signing string.
pub const X_REQUEST_ID: &str = "x-request-id";
/// `X-Auth-Key` header: API key.
pub const X_AUTH_KEY: &str = "x-auth-key";
/// `X-Auth-Code` header: HMAC signature.
pub const X_AUTH_CODE: &str = "x-auth-code";

#[cfg(feature = "reqwest")]
/// Token client specialized for the crate's default reqwest transport.
pub type ReqwestTokenClient = TokenClient<ReqwestHttpClient>;

/// Body of a token request.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObtainTokenRequest {
	/// Always [`GRANT_TYPE_API_KEY`].
	pub grant_type: String,
	/// Nonce that was also used in the signing string.
	pub random_nonce: String,
}
impl ObtainTokenRequest {
	/// Creates an `api_key` grant request for `random_nonce`.
	pub fn new(random_nonce: impl Into<String>) -> Self {
		Self { grant_type: GRANT_TYPE_API_KEY.into(), random_nonce: random_nonce.into() }
	}
}

/// Obtains access tokens from the platform's token endpoint.
pub struct TokenClient<C>
where
	C: HttpTransport,
{
	endpoint: Url,
	credential: Credential,
	executor: RequestExecutor<C>,
}
impl<C> TokenClient<C>
where
	C: HttpTransport,
{
	/// Creates a client for `endpoint` sending through `executor`.
	pub fn new(endpoint: Url, credential: Credential, executor: RequestExecutor<C>) -> Self {
		Self { endpoint, credential, executor }
	}

	/// Token endpoint this client posts to.
	pub fn endpoint(&self) -> &Url {
		&self.endpoint
	}

	/// Credential used to sign requests.
	pub fn credential(&self) -> &Credential {
		&self.credential
	}

	/// Executor shared with other platform calls.
	pub fn executor(&self) -> &RequestExecutor<C> {
		&self.executor
	}

	/// Builds the signed token request for `context` without sending it.
	///
	/// `X-Date` and the signing timestamp are both rendered from `context.timestamp`.
	/// `context.api_key` must equal the credential's API key.
	pub fn signed_request(&self, context: &SigningContext) -> Result<HttpRequest> {
		if context.api_key != self.credential.api_key() {
			return Err(ValidationError::CredentialMismatch { field: Field::ApiKey }.into());
		}

		let signature = context.sign(self.credential.api_secret())?;
		let headers = RequestHeaders::hal_json()
			.with_header(HeaderName::from_static(X_DATE), context.http_date()?)
			.with_header(HeaderName::from_static(X_REQUEST_ID), context.request_id.clone())
			.with_header(HeaderName::from_static(X_AUTH_KEY), context.api_key.clone())
			.with_header(HeaderName::from_static(X_AUTH_CODE), signature.into_inner());
		let body = ObtainTokenRequest::new(context.nonce.clone());

		request::post_json(&self.endpoint, headers, &body)
	}

	/// Signs and sends a fresh token request, then decodes the [`AccessToken`].
	pub async fn obtain_access_token(&self) -> Result<AccessToken> {
		const KIND: CallKind = CallKind::TokenObtain;

		let span = CallSpan::new(KIND, "obtain_access_token");

		obs::record_call_outcome(KIND, CallOutcome::Attempt);

		let result = span
			.instrument(async move {
				let context = SigningContext::capture(self.credential.api_key());
				let request = self.signed_request(&context)?;

				obs::event!(debug, request_id = %context.request_id, "Requesting access token.");

				self.executor.execute::<AccessToken>(request).await
			})
			.await;

		obs::record_call_outcome(KIND, CallOutcome::of(&result));

		result
	}
}
#[cfg(feature = "reqwest")]
impl TokenClient<ReqwestHttpClient> {
	/// Creates a client for the token endpoint of `endpoints` on a redirect-free reqwest transport.
	pub fn from_endpoints(endpoints: &Endpoints, credential: Credential) -> Result<Self> {
		let executor = RequestExecutor::new(ReqwestHttpClient::without_redirects()?);

		Ok(Self::new(endpoints.token_obtain.clone(), credential, executor))
	}
}
impl<C> Clone for TokenClient<C>
where
	C: HttpTransport,
{
	fn clone(&self) -> Self {
		Self {
			endpoint: self.endpoint.clone(),
			credential: self.credential.clone(),
			executor: self.executor.clone(),
		}
	}
}
impl<C> Debug for TokenClient<C>
where
	C: HttpTransport,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("TokenClient")
			.field("endpoint", &self.endpoint.as_str())
			.field("credential", &self.credential)
			.field("executor", &self.executor)
			.finish()
	}
}
