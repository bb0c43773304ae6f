//! Standard-base64 SHA-256 digests.
//!
//! Some payloads carry hashed personal data instead of the clear value (for example a
//! customer's e-mail address). The platform expects the padded standard-alphabet base64
//! encoding of the SHA-256 digest of the UTF-8 bytes.

// crates.io
use base64::{Engine, engine::general_purpose::STANDARD};
use sha2::{Digest, Sha256};

/// Returns the padded standard base64 encoding of `SHA-256(value)`.
pub fn sha256_base64(value: &str) -> String {
	STANDARD.encode(Sha256::digest(value.as_bytes()))
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn digest_matches_reference_values() {
		assert_eq!(sha256_base64("max@muster.de"), "6JL4VUgVxkq2m+a9I6ScfW2ofJP5y6wsvSaHIsX+iLs=");
		assert_eq!(sha256_base64(""), "47DEQpj8HBSa+/TImW+5JCeuQeRkm5NMpJWZG3hSuFU=");
	}
}
