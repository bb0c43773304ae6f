//! HMAC-SHA256 request signing.
//!
//! The platform authenticates a client without the API secret ever crossing the wire. The
//! client builds a canonical signing string
//!
//! ```text
//! requestId:yyyyMMddHHmmss:apiKey:nonce
//! ```
//!
//! (timestamp rendered in GMT), computes HMAC-SHA256 over its UTF-8 bytes keyed with the
//! base64url-decoded API secret, and sends the padded base64url digest as `X-Auth-Code`.
//! The signature is a pure function of those five inputs, so identical inputs always yield
//! an identical signature.

// crates.io
use base64::{Engine, engine::general_purpose::URL_SAFE};
use hmac::{Hmac, Mac};
use sha2::Sha256;
use time::{UtcOffset, macros::format_description};
use uuid::Uuid;
// self
use crate::{
	_prelude::*,
	auth::{
		Field, Secret, ValidationError, create_nonce, decode_api_secret, validate_api_key,
		validate_nonce, validate_request_id, validate_timestamp,
	},
};

type HmacSha256 = Hmac<Sha256>;

/// Padded base64url HMAC-SHA256 signature, sent as `X-Auth-Code`.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Signature(String);
impl Signature {
	/// Returns the encoded signature.
	pub fn as_str(&self) -> &str {
		&self.0
	}

	/// Consumes the wrapper and returns the encoded signature.
	pub fn into_inner(self) -> String {
		self.0
	}
}
impl AsRef<str> for Signature {
	fn as_ref(&self) -> &str {
		&self.0
	}
}
impl Display for Signature {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(&self.0)
	}
}

/// Inputs for one signing operation, created fresh per request.
///
/// Both the signing timestamp and the `X-Date` header are derived from the single
/// [`timestamp`](Self::timestamp) captured here, so they can never disagree.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SigningContext {
	/// Request identifier, also sent as `X-Request-ID`.
	pub request_id: String,
	/// The one instant this request is signed at.
	pub timestamp: OffsetDateTime,
	/// API key, also sent as `X-Auth-Key`.
	pub api_key: String,
	/// Single-use random nonce, also sent in the request body.
	pub nonce: String,
}
impl SigningContext {
	/// Assembles a context from explicit parts.
	pub fn new(
		request_id: impl Into<String>,
		timestamp: OffsetDateTime,
		api_key: impl Into<String>,
		nonce: impl Into<String>,
	) -> Self {
		Self {
			request_id: request_id.into(),
			timestamp,
			api_key: api_key.into(),
			nonce: nonce.into(),
		}
	}

	/// Reads the clock once, then draws a fresh v4 request id and a fresh nonce.
	pub fn capture(api_key: impl Into<String>) -> Self {
		let timestamp = OffsetDateTime::now_utc();

		Self::new(Uuid::new_v4().to_string(), timestamp, api_key, create_nonce())
	}

	/// Signing timestamp (`yyyyMMddHHmmss`, GMT).
	pub fn timestamp_string(&self) -> Result<String, ValidationError> {
		format_timestamp(self.timestamp)
	}

	/// RFC 1123 `X-Date` header value for the same instant.
	pub fn http_date(&self) -> Result<String, ValidationError> {
		format_http_date(self.timestamp)
	}

	/// Canonical signing string for this context.
	pub fn signing_string(&self) -> Result<String, ValidationError> {
		build_signing_string(&self.request_id, self.timestamp, &self.api_key, &self.nonce)
	}

	/// Signs this context with the API secret.
	pub fn sign(&self, api_secret: &Secret) -> Result<Signature, ValidationError> {
		sign(&self.signing_string()?, api_secret.expose())
	}
}

/// Formats an instant as the 14-digit GMT signing timestamp `yyyyMMddHHmmss`.
pub fn format_timestamp(timestamp: OffsetDateTime) -> Result<String, ValidationError> {
	timestamp
		.to_offset(UtcOffset::UTC)
		.format(format_description!("[year][month][day][hour][minute][second]"))
		.map_err(|_| ValidationError::Unformattable { field: Field::Timestamp })
}

/// Formats an instant as an RFC 1123 date in GMT, e.g. `Mon, 1 Feb 2016 09:49:42 GMT`.
///
/// The day of month is not zero-padded; hours, minutes, and seconds always take two digits.
pub fn format_http_date(timestamp: OffsetDateTime) -> Result<String, ValidationError> {
	timestamp
		.to_offset(UtcOffset::UTC)
		.format(format_description!(
			"[weekday repr:short], [day padding:none] [month repr:short] [year] [hour]:[minute]:[second] GMT"
		))
		.map_err(|_| ValidationError::Unformattable { field: Field::Timestamp })
}

/// Builds the signing string `requestId:yyyyMMddHHmmss:apiKey:nonce` for an instant.
pub fn build_signing_string(
	request_id: &str,
	timestamp: OffsetDateTime,
	api_key: &str,
	nonce: &str,
) -> Result<String, ValidationError> {
	build_signing_string_at(request_id, &format_timestamp(timestamp)?, api_key, nonce)
}

/// Builds the signing string from an already formatted `yyyyMMddHHmmss` timestamp.
pub fn build_signing_string_at(
	request_id: &str,
	timestamp: &str,
	api_key: &str,
	nonce: &str,
) -> Result<String, ValidationError> {
	validate_request_id(request_id)?;
	validate_timestamp(timestamp)?;
	validate_api_key(api_key)?;
	validate_nonce(nonce)?;

	let signing_string = format!("{request_id}:{timestamp}:{api_key}:{nonce}");

	crate::obs::event!(debug, request_id, signing_string, "Built signing string.");

	Ok(signing_string)
}

/// Computes the padded base64url HMAC-SHA256 of `signing_string` keyed with the decoded
/// `api_secret`.
pub fn sign(signing_string: &str, api_secret: &str) -> Result<Signature, ValidationError> {
	let key = decode_api_secret(api_secret)?;
	let mut mac = HmacSha256::new_from_slice(&key)
		.map_err(|_| ValidationError::Undecodable { field: Field::ApiSecret })?;

	mac.update(signing_string.as_bytes());

	Ok(Signature(URL_SAFE.encode(mac.finalize().into_bytes())))
}

/// Builds the signing string and signs it in one step.
pub fn signature(
	request_id: &str,
	timestamp: OffsetDateTime,
	api_key: &str,
	api_secret: &str,
	nonce: &str,
) -> Result<Signature, ValidationError> {
	sign(&build_signing_string(request_id, timestamp, api_key, nonce)?, api_secret)
}

#[cfg(test)]
mod tests {
	// crates.io
	use time::macros::datetime;
	// self
	use super::*;

	const REQUEST_ID: &str = "f3fea5f3-60af-496f-ac3e-dbb10924e87a";
	const API_KEY: &str = "e81d298b-60dd-4f46-9ec9-1dbc72f5b5df";
	const API_SECRET: &str = "JrXRHCnUegQJAYSJ5J6OvEuOUOpy2q2-MHPoH_IECRY=";
	const NONCE: &str = "Qg5f0Q3ly1Cwh5M9zcw57jwHI_HPoKbjdHLurXGpPg0yazdC6OWPpwnYi22bnB6S";
	const SIGNING_STRING: &str = "f3fea5f3-60af-496f-ac3e-dbb10924e87a:20160201094942:e81d298b-60dd-4f46-9ec9-1dbc72f5b5df:Qg5f0Q3ly1Cwh5M9zcw57jwHI_HPoKbjdHLurXGpPg0yazdC6OWPpwnYi22bnB6S";

	fn reference_instant() -> OffsetDateTime {
		datetime!(2016-02-01 09:49:42.433 UTC)
	}

	#[test]
	fn signature_matches_reference_vector() {
		let signature = signature(REQUEST_ID, reference_instant(), API_KEY, API_SECRET, NONCE)
			.expect("Reference inputs should sign.");

		assert_eq!(signature.as_str(), "ps9MooGiTeTXIkPkUWbHG4rlF3wuTJuZ9qcMe-Y41xE=");
	}

	#[test]
	fn signing_string_is_colon_joined_in_fixed_order() {
		let signing_string = build_signing_string(REQUEST_ID, reference_instant(), API_KEY, NONCE)
			.expect("Reference inputs should build a signing string.");

		assert_eq!(signing_string, SIGNING_STRING);
		assert_eq!(
			build_signing_string_at(REQUEST_ID, "20160201094942", API_KEY, NONCE)
				.expect("Preformatted timestamp should be accepted."),
			SIGNING_STRING
		);
	}

	#[test]
	fn signing_is_deterministic() {
		let first = sign(SIGNING_STRING, API_SECRET).expect("Signing should succeed.");
		let second = sign(SIGNING_STRING, API_SECRET).expect("Signing should succeed.");

		assert_eq!(first, second);
		assert!(first.as_str().ends_with('='), "Signatures keep their padding.");
		assert!(!first.as_str().contains(['+', '/']), "Signatures use the URL-safe alphabet.");
	}

	#[test]
	fn timestamps_are_rendered_in_gmt() {
		let shifted = reference_instant().to_offset(time::macros::offset!(+02:00));

		assert_eq!(format_timestamp(shifted).expect("Instant should format."), "20160201094942");
		assert_eq!(
			format_http_date(shifted).expect("Instant should format."),
			"Mon, 1 Feb 2016 09:49:42 GMT"
		);
	}

	#[test]
	fn http_date_keeps_two_digit_days() {
		assert_eq!(
			format_http_date(time::macros::datetime!(2024-11-23 07:05:09 UTC))
				.expect("Instant should format."),
			"Sat, 23 Nov 2024 07:05:09 GMT"
		);
	}

	#[test]
	fn short_secret_is_rejected_before_hashing() {
		assert_eq!(
			sign(SIGNING_STRING, "c29tZXRleHQ="),
			Err(ValidationError::TooShort { field: Field::ApiSecret, min: 32, actual: 8 })
		);
		assert_eq!(
			signature(REQUEST_ID, reference_instant(), API_KEY, "c29tZXRleHQ=", NONCE)
				.map_err(|e| e.field()),
			Err(Field::ApiSecret)
		);
	}

	#[test]
	fn malformed_fields_are_reported_by_name() {
		let at = reference_instant();

		assert_eq!(
			build_signing_string("f3fea5f3", at, API_KEY, NONCE).map_err(|e| e.field()),
			Err(Field::RequestId)
		);
		assert_eq!(
			build_signing_string(REQUEST_ID, at, "not-a-uuid", NONCE).map_err(|e| e.field()),
			Err(Field::ApiKey)
		);
		assert_eq!(
			build_signing_string(REQUEST_ID, at, API_KEY, "short").map_err(|e| e.field()),
			Err(Field::Nonce)
		);
		assert_eq!(
			build_signing_string_at(REQUEST_ID, "2016020109494", API_KEY, NONCE)
				.map_err(|e| e.field()),
			Err(Field::Timestamp)
		);
	}

	#[test]
	fn captured_context_is_fresh_and_signable() {
		let first = SigningContext::capture(API_KEY);
		let second = SigningContext::capture(API_KEY);

		assert_ne!(first.request_id, second.request_id);
		assert_ne!(first.nonce, second.nonce);

		let signing_string = first.signing_string().expect("Captured context should be valid.");
		let timestamp = first.timestamp_string().expect("Captured instant should format.");

		assert_eq!(
			signing_string,
			format!("{}:{timestamp}:{API_KEY}:{}", first.request_id, first.nonce)
		);
		first.sign(&Secret::new(API_SECRET)).expect("Captured context should sign.");
	}
}
