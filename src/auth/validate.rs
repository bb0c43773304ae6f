//! Field validators applied before any signing or network work.
//!
//! Each validator is a pure predicate over one input and reports failures tagged with the
//! [`Field`] they concern, so callers can tell a malformed API key from a malformed nonce
//! without parsing messages.

// crates.io
use base64::{
	Engine,
	alphabet,
	engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig},
};
use zeroize::Zeroizing;
// self
use crate::_prelude::*;

/// Minimum nonce length in characters.
pub const NONCE_MIN_LEN: usize = 10;
/// Maximum nonce length in characters.
pub const NONCE_MAX_LEN: usize = 64;
/// Minimum decoded API secret length in bytes.
pub const API_SECRET_MIN_BYTES: usize = 32;
/// Exact length of a `yyyyMMddHHmmss` timestamp string.
pub const TIMESTAMP_LEN: usize = 14;

/// URL-safe alphabet that accepts padded and unpadded input alike.
pub(crate) const URL_SAFE_LENIENT: GeneralPurpose = GeneralPurpose::new(
	&alphabet::URL_SAFE,
	GeneralPurposeConfig::new()
		.with_decode_padding_mode(DecodePaddingMode::Indifferent)
		.with_decode_allow_trailing_bits(true),
);

/// Signing input that failed validation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Field {
	/// `X-Request-ID` UUID.
	RequestId,
	/// API key UUID.
	ApiKey,
	/// Random nonce.
	Nonce,
	/// Base64url API secret.
	ApiSecret,
	/// `yyyyMMddHHmmss` signing timestamp.
	Timestamp,
}
impl Field {
	/// Returns a stable label suitable for messages and log fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			Field::RequestId => "requestId",
			Field::ApiKey => "apiKey",
			Field::Nonce => "randomNonce",
			Field::ApiSecret => "apiSecret",
			Field::Timestamp => "timestamp",
		}
	}
}
impl Display for Field {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Error returned when a signing input is malformed.
///
/// Messages never echo the offending value because some fields carry secret material.
#[derive(Clone, Debug, PartialEq, Eq, ThisError)]
pub enum ValidationError {
	/// The value was empty or whitespace.
	#[error("{field} must be set.")]
	Empty {
		/// Offending field.
		field: Field,
	},
	/// The value is not a lowercase, hyphenated UUID of version 1-5.
	#[error("{field} must be a valid UUID.")]
	NotUuid {
		/// Offending field.
		field: Field,
	},
	/// The value length is outside the permitted range.
	#[error("{field} length must be within {min}..={max}, but was {actual}.")]
	Length {
		/// Offending field.
		field: Field,
		/// Minimum permitted length.
		min: usize,
		/// Maximum permitted length.
		max: usize,
		/// Observed length.
		actual: usize,
	},
	/// The value contains characters outside the base64url alphabet.
	#[error("{field} must be base64url encoded.")]
	NotBase64Url {
		/// Offending field.
		field: Field,
	},
	/// The value uses the right alphabet but is not decodable.
	#[error("{field} cannot be decoded as base64url.")]
	Undecodable {
		/// Offending field.
		field: Field,
	},
	/// The decoded value is too short to be used as a key.
	#[error("{field} must decode to at least {min} bytes, but decoded to {actual}.")]
	TooShort {
		/// Offending field.
		field: Field,
		/// Minimum permitted byte count.
		min: usize,
		/// Observed byte count.
		actual: usize,
	},
	/// The instant cannot be rendered in the required format.
	#[error("{field} cannot be formatted.")]
	Unformattable {
		/// Offending field.
		field: Field,
	},
	/// The value differs from the one bound to the signing credential.
	#[error("{field} does not belong to the signing credential.")]
	CredentialMismatch {
		/// Offending field.
		field: Field,
	},
}
impl ValidationError {
	/// Returns the field the error concerns.
	pub fn field(&self) -> Field {
		match self {
			Self::Empty { field }
			| Self::NotUuid { field }
			| Self::Length { field, .. }
			| Self::NotBase64Url { field }
			| Self::Undecodable { field }
			| Self::TooShort { field, .. }
			| Self::Unformattable { field }
			| Self::CredentialMismatch { field } => *field,
		}
	}
}

/// Checks for a lowercase hyphenated UUID: `xxxxxxxx-xxxx-[1-5]xxx-[89ab]xxx-xxxxxxxxxxxx`.
pub fn is_uuid(value: &str) -> bool {
	let bytes = value.as_bytes();

	if bytes.len() != 36 {
		return false;
	}

	bytes.iter().enumerate().all(|(i, b)| match i {
		8 | 13 | 18 | 23 => *b == b'-',
		14 => (b'1'..=b'5').contains(b),
		19 => matches!(b, b'8' | b'9' | b'a' | b'b'),
		_ => matches!(b, b'0'..=b'9' | b'a'..=b'f'),
	})
}

/// Checks for one or more base64url characters followed by at most two `=` padding characters.
pub fn is_base64url(value: &str) -> bool {
	let body = value.trim_end_matches('=');
	let padding = value.len() - body.len();

	!body.is_empty()
		&& padding <= 2
		&& body.bytes().all(|b| b.is_ascii_alphanumeric() || b == b'-' || b == b'_')
}

/// Validates the request identifier.
pub fn validate_request_id(request_id: &str) -> Result<(), ValidationError> {
	validate_uuid(Field::RequestId, request_id)
}

/// Validates the API key.
pub fn validate_api_key(api_key: &str) -> Result<(), ValidationError> {
	validate_uuid(Field::ApiKey, api_key)
}

/// Validates a random nonce.
pub fn validate_nonce(nonce: &str) -> Result<(), ValidationError> {
	let field = Field::Nonce;

	ensure_present(field, nonce)?;

	if !(NONCE_MIN_LEN..=NONCE_MAX_LEN).contains(&nonce.len()) {
		return Err(ValidationError::Length {
			field,
			min: NONCE_MIN_LEN,
			max: NONCE_MAX_LEN,
			actual: nonce.len(),
		});
	}
	if !is_base64url(nonce) {
		return Err(ValidationError::NotBase64Url { field });
	}

	Ok(())
}

/// Validates the API secret, including its decoded key length.
pub fn validate_api_secret(api_secret: &str) -> Result<(), ValidationError> {
	decode_api_secret(api_secret).map(drop)
}

/// Validates a preformatted `yyyyMMddHHmmss` timestamp string.
pub fn validate_timestamp(timestamp: &str) -> Result<(), ValidationError> {
	let field = Field::Timestamp;

	ensure_present(field, timestamp)?;

	if timestamp.len() != TIMESTAMP_LEN {
		return Err(ValidationError::Length {
			field,
			min: TIMESTAMP_LEN,
			max: TIMESTAMP_LEN,
			actual: timestamp.len(),
		});
	}

	Ok(())
}

/// Validates and decodes the API secret into raw key bytes that are wiped on drop.
pub(crate) fn decode_api_secret(api_secret: &str) -> Result<Zeroizing<Vec<u8>>, ValidationError> {
	let field = Field::ApiSecret;

	ensure_present(field, api_secret)?;

	if !is_base64url(api_secret) {
		return Err(ValidationError::NotBase64Url { field });
	}

	let key = URL_SAFE_LENIENT
		.decode(api_secret)
		.map(Zeroizing::new)
		.map_err(|_| ValidationError::Undecodable { field })?;

	if key.len() < API_SECRET_MIN_BYTES {
		return Err(ValidationError::TooShort {
			field,
			min: API_SECRET_MIN_BYTES,
			actual: key.len(),
		});
	}

	Ok(key)
}

fn validate_uuid(field: Field, value: &str) -> Result<(), ValidationError> {
	ensure_present(field, value)?;

	if !is_uuid(value) {
		return Err(ValidationError::NotUuid { field });
	}

	Ok(())
}

fn ensure_present(field: Field, value: &str) -> Result<(), ValidationError> {
	if value.trim().is_empty() {
		return Err(ValidationError::Empty { field });
	}

	Ok(())
}
