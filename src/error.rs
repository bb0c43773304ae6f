//! Crate-level error taxonomy shared by signing, request execution, and token acquisition.

// self
use crate::{
	_prelude::*,
	auth::{Field, ValidationError},
	executor::ErrorMessage,
};

/// Crate-wide result type alias returning [`Error`] by default.
pub type Result<T, E = Error> = std::result::Result<T, E>;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Canonical error exposed by public APIs.
#[derive(Debug, ThisError)]
pub enum Error {
	/// Local configuration problem.
	#[error(transparent)]
	Config(#[from] ConfigError),
	/// Malformed signing input; raised before any network access.
	#[error(transparent)]
	Validation(#[from] ValidationError),
	/// Network-level failure while talking to the platform.
	#[error(transparent)]
	Transport(#[from] TransportError),
	/// Platform answered with a status outside 200/201/204.
	#[error(transparent)]
	Status(#[from] StatusError),
	/// Platform answered with a success status but the body has an unexpected shape.
	#[error(transparent)]
	Deserialization(#[from] DeserializationError),
}
impl Error {
	/// HTTP status code carried by the error, when the platform produced one.
	pub fn status(&self) -> Option<u16> {
		match self {
			Self::Status(e) => Some(e.status),
			Self::Deserialization(e) => Some(e.status),
			_ => None,
		}
	}

	/// Offending input field for validation failures.
	pub fn field(&self) -> Option<Field> {
		match self {
			Self::Validation(e) => Some(e.field()),
			_ => None,
		}
	}
}

/// Configuration failures raised while preparing clients or requests.
#[derive(Debug, ThisError)]
pub enum ConfigError {
	/// HTTP client could not be constructed.
	#[error("HTTP client could not be constructed.")]
	HttpClientBuild {
		/// Underlying transport builder failure.
		#[source]
		source: BoxError,
	},
	/// HTTP request construction failed.
	#[error(transparent)]
	HttpRequest(#[from] oauth2::http::Error),
	/// Request body could not be encoded as JSON.
	#[error("Request body could not be serialized.")]
	RequestBody {
		/// Underlying encoder failure.
		#[source]
		source: serde_json::Error,
	},
	/// Endpoint URL cannot be parsed.
	#[error("The {endpoint} endpoint URL is invalid.")]
	InvalidEndpoint {
		/// Which endpoint failed validation.
		endpoint: &'static str,
		/// Underlying parsing failure.
		#[source]
		source: url::ParseError,
	},
	/// Endpoint does not use HTTPS and is not a loopback address.
	#[error("The {endpoint} endpoint must use HTTPS: {url}.")]
	InsecureEndpoint {
		/// Which endpoint failed validation.
		endpoint: &'static str,
		/// Endpoint URL that failed validation.
		url: String,
	},
	/// Required environment variable is absent or not valid unicode.
	#[error("Environment variable `{name}` is not set.")]
	MissingEnv {
		/// Variable name.
		name: &'static str,
	},
}
impl ConfigError {
	/// Wraps a transport's builder failure inside [`ConfigError`].
	pub fn http_client_build(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::HttpClientBuild { source: Box::new(src) }
	}
}
#[cfg(feature = "reqwest")]
impl From<ReqwestError> for ConfigError {
	fn from(e: ReqwestError) -> Self {
		Self::http_client_build(e)
	}
}

/// Transport-level failures (network, IO). Never retried internally.
#[derive(Debug, ThisError)]
pub enum TransportError {
	/// Underlying HTTP client reported a network failure.
	#[error("Network error occurred while calling the platform.")]
	Network {
		/// Transport-specific network error.
		#[source]
		source: BoxError,
	},
	/// Underlying IO failure surfaced during transport.
	#[error("I/O error occurred while calling the platform.")]
	Io(#[from] std::io::Error),
	/// Transport failed without a structured error value.
	#[error("HTTP client error occurred while calling the platform: {message}.")]
	Other {
		/// Transport-supplied description.
		message: String,
	},
}
impl TransportError {
	/// Wraps a transport-specific network error.
	pub fn network(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::Network { source: Box::new(src) }
	}
}
#[cfg(feature = "reqwest")]
impl From<ReqwestError> for TransportError {
	fn from(e: ReqwestError) -> Self {
		Self::network(e)
	}
}

/// Non-success response. The message list is best-effort and may be empty.
#[derive(Debug, ThisError)]
#[error("Platform responded with status {status} and {} error message(s).", .messages.len())]
pub struct StatusError {
	/// HTTP status code.
	pub status: u16,
	/// Messages parsed from the error body; empty when the body was not parseable.
	pub messages: Vec<ErrorMessage>,
}

/// Success response whose body does not fit the requested type.
#[derive(Debug, ThisError)]
#[error("Response body does not match `{target}` at `{}`.", .source.path())]
pub struct DeserializationError {
	/// Rust type the body was decoded into.
	pub target: &'static str,
	/// HTTP status code of the (successful) response.
	pub status: u16,
	/// Structured parsing failure including the JSON path.
	#[source]
	pub source: serde_path_to_error::Error<serde_json::Error>,
}
