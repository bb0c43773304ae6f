//! Request execution and response classification.
//!
//! [`RequestExecutor`] sends a prepared request through an [`HttpTransport`] and classifies
//! the outcome:
//!
//! - transport failures become [`TransportError`];
//! - 200, 201, and 204 are successes and return the body untouched;
//! - any other status becomes a [`StatusError`] carrying the status code and whatever
//!   [`ErrorMessage`]s the body holds (an unparseable body yields an empty list, never a
//!   masked failure);
//! - [`RequestExecutor::execute`] additionally decodes a success body and reports shape
//!   mismatches as [`DeserializationError`].

// self
use crate::{
	_prelude::*,
	error::{ConfigError, DeserializationError, StatusError, TransportError},
	http::{HttpClientError, HttpRequest, HttpResponse, HttpTransport},
	obs::{self, CallKind, CallOutcome, CallSpan},
};
#[cfg(feature = "reqwest")] use crate::http::ReqwestHttpClient;

/// Statuses treated as success.
pub const SUCCESS_STATUSES: [u16; 3] = [200, 201, 204];

#[cfg(feature = "reqwest")]
/// Executor specialized for the crate's default reqwest transport.
pub type ReqwestExecutor = RequestExecutor<ReqwestHttpClient>;

/// Severity attached to a platform error message.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ErrorSeverity {
	/// The request failed.
	Error,
	/// The request was processed with warnings.
	Warn,
	/// Informational detail.
	Info,
}

/// Message detailing why the platform rejected a request.
///
/// Every field is optional so one sparse message never discards its siblings.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ErrorMessage {
	/// Severity of the message, when the platform sent one.
	pub severity: Option<ErrorSeverity>,
	/// Distinct error code.
	pub code: Option<String>,
	/// Path of the offending request element.
	pub path: Option<String>,
	/// Reason code of the error.
	pub reason_code: Option<String>,
	/// Unique log reference for support requests.
	pub logref: Option<String>,
}

#[derive(Deserialize)]
struct ErrorMessages {
	messages: Vec<ErrorMessage>,
}

/// Returns `true` for the statuses the platform uses to signal success.
pub fn is_success(status: u16) -> bool {
	SUCCESS_STATUSES.contains(&status)
}

/// Best-effort parse of a `{"messages": [...]}` error body; anything else yields an empty list.
pub fn parse_error_messages(body: &[u8]) -> Vec<ErrorMessage> {
	match serde_json::from_slice::<ErrorMessages>(body) {
		Ok(container) => container.messages,
		Err(e) => {
			obs::event!(warn, error = %e, body_len = body.len(), "Failed to parse error messages.");
			#[cfg(not(feature = "tracing"))]
			let _ = e;

			Vec::new()
		},
	}
}

/// Sends prepared requests and classifies their outcome. Never retries, never caches.
pub struct RequestExecutor<C>
where
	C: HttpTransport,
{
	transport: Arc<C>,
}
impl<C> RequestExecutor<C>
where
	C: HttpTransport,
{
	/// Creates an executor on top of the provided transport.
	pub fn new(transport: impl Into<Arc<C>>) -> Self {
		Self { transport: transport.into() }
	}

	/// Underlying transport.
	pub fn transport(&self) -> &C {
		&self.transport
	}

	/// Executes `request` and returns the raw body of a 200/201/204 response unmodified.
	pub async fn execute_raw(&self, request: HttpRequest) -> Result<Vec<u8>> {
		const KIND: CallKind = CallKind::Execute;

		let span = CallSpan::new(KIND, "execute_raw");

		obs::record_call_outcome(KIND, CallOutcome::Attempt);

		let result = span.instrument(self.dispatch(request)).await.map(HttpResponse::into_body);

		obs::record_call_outcome(KIND, CallOutcome::of(&result));

		result
	}

	/// Executes `request` and decodes a success body as JSON into `T`.
	pub async fn execute<T>(&self, request: HttpRequest) -> Result<T>
	where
		T: DeserializeOwned,
	{
		const KIND: CallKind = CallKind::Execute;

		let span = CallSpan::new(KIND, "execute");

		obs::record_call_outcome(KIND, CallOutcome::Attempt);

		let result = span
			.instrument(async move {
				let response = self.dispatch(request).await?;

				decode_body::<T>(response.status().as_u16(), response.body())
			})
			.await;

		obs::record_call_outcome(KIND, CallOutcome::of(&result));

		result
	}

	async fn dispatch(&self, request: HttpRequest) -> Result<HttpResponse> {
		#[cfg(feature = "tracing")]
		let (method, uri) = (request.method().clone(), request.uri().to_string());
		let response = self.transport.send(request).await.map_err(|e| {
			obs::event!(error, %method, %uri, error = %e, "Request to the platform failed.");

			map_transport_error(e)
		})?;
		let status = response.status().as_u16();

		if is_success(status) {
			obs::event!(debug, %method, %uri, status, "Platform call succeeded.");

			return Ok(response);
		}

		let messages = parse_error_messages(response.body());

		obs::event!(
			warn,
			%method,
			%uri,
			status,
			messages = messages.len(),
			"Platform rejected the request."
		);

		Err(StatusError { status, messages }.into())
	}
}
impl<C> Clone for RequestExecutor<C>
where
	C: HttpTransport,
{
	fn clone(&self) -> Self {
		Self { transport: Arc::clone(&self.transport) }
	}
}
#[cfg(feature = "reqwest")]
impl Default for RequestExecutor<ReqwestHttpClient> {
	fn default() -> Self {
		Self::new(ReqwestHttpClient::default())
	}
}
impl<C> Debug for RequestExecutor<C>
where
	C: HttpTransport,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("RequestExecutor")
			.field("transport", &std::any::type_name::<C>())
			.finish()
	}
}

fn decode_body<T>(status: u16, body: &[u8]) -> Result<T>
where
	T: DeserializeOwned,
{
	let mut deserializer = serde_json::Deserializer::from_slice(body);

	serde_path_to_error::deserialize(&mut deserializer).map_err(|source| {
		let target = std::any::type_name::<T>();

		obs::event!(error, target, status, error = %source, "Failed to deserialize response body.");

		DeserializationError { target, status, source }.into()
	})
}

fn map_transport_error<E>(err: HttpClientError<E>) -> Error
where
	E: 'static + Send + Sync + StdError,
{
	match err {
		HttpClientError::Reqwest(inner) => TransportError::network(*inner).into(),
		HttpClientError::Http(inner) => ConfigError::from(inner).into(),
		HttpClientError::Io(inner) => TransportError::Io(inner).into(),
		HttpClientError::Other(message) => TransportError::Other { message }.into(),
		other => TransportError::Other { message: other.to_string() }.into(),
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn only_documented_statuses_are_success() {
		for status in [200, 201, 204] {
			assert!(is_success(status), "{status} should be a success.");
		}
		for status in [202, 203, 206, 301, 400, 401, 404, 500] {
			assert!(!is_success(status), "{status} should be a failure.");
		}
	}

	#[test]
	fn error_messages_parse_from_container() {
		let body = br#"{"messages":[
			{"severity":"ERROR","code":"request.invalid","path":"$.amount","reasonCode":"AMOUNT","logref":"abc"},
			{"severity":"WARN"},
			{"severity":"INFO","code":"info"}
		]}"#;
		let messages = parse_error_messages(body);

		assert_eq!(messages.len(), 3);
		assert_eq!(messages[0].severity, Some(ErrorSeverity::Error));
		assert_eq!(messages[0].reason_code.as_deref(), Some("AMOUNT"));
		assert_eq!(messages[0].logref.as_deref(), Some("abc"));
		assert_eq!(messages[1].severity, Some(ErrorSeverity::Warn));
		assert_eq!(messages[1].code, None);
		assert_eq!(messages[2].severity, Some(ErrorSeverity::Info));
	}

	#[test]
	fn message_without_severity_keeps_its_siblings() {
		let body = br#"{"messages":[
			{"severity":"ERROR","code":"a"},
			{"code":"b","logref":"x"},
			{"severity":null,"path":"$.c"}
		]}"#;
		let messages = parse_error_messages(body);

		assert_eq!(messages.len(), 3);
		assert_eq!(messages[0].severity, Some(ErrorSeverity::Error));
		assert_eq!(messages[0].code.as_deref(), Some("a"));
		assert_eq!(messages[1].severity, None);
		assert_eq!(messages[1].code.as_deref(), Some("b"));
		assert_eq!(messages[1].logref.as_deref(), Some("x"));
		assert_eq!(messages[2].severity, None);
		assert_eq!(messages[2].path.as_deref(), Some("$.c"));
	}

	#[test]
	fn unparseable_error_bodies_yield_empty_list() {
		assert!(parse_error_messages(b"").is_empty());
		assert!(parse_error_messages(b"<html>Bad Gateway</html>").is_empty());
		assert!(parse_error_messages(br#"{"errors":[]}"#).is_empty());
		assert!(parse_error_messages(br#"{"messages":[{"severity":"FATAL"}]}"#).is_empty());
	}

	#[test]
	fn decode_reports_target_and_path() {
		#[derive(Debug, Deserialize)]
		struct Shape {
			#[allow(dead_code)]
			inner: Inner,
		}
		#[derive(Debug, Deserialize)]
		struct Inner {
			#[allow(dead_code)]
			count: u32,
		}

		let err = decode_body::<Shape>(200, br#"{"inner":{"count":"many"}}"#)
			.expect_err("A string count must not decode into u32.");

		match err {
			Error::Deserialization(e) => {
				assert_eq!(e.status, 200);
				assert_eq!(e.source.path().to_string(), "inner.count");
				assert!(e.target.ends_with("Shape"));
			},
			other => panic!("Unexpected error variant: {other:?}."),
		}
	}

	#[test]
	fn transport_errors_are_never_swallowed() {
		let err = map_transport_error::<std::io::Error>(HttpClientError::Io(std::io::Error::new(
			std::io::ErrorKind::ConnectionReset,
			"reset",
		)));

		assert!(matches!(err, Error::Transport(TransportError::Io(_))));

		let err = map_transport_error::<std::io::Error>(HttpClientError::Reqwest(Box::new(
			std::io::Error::other("dns"),
		)));

		assert!(matches!(err, Error::Transport(TransportError::Network { .. })));

		let err = map_transport_error::<std::io::Error>(HttpClientError::Other("closed".into()));

		assert!(matches!(err, Error::Transport(TransportError::Other { .. })));
	}
}
