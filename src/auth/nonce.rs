//! Single-use random nonces drawn from a process-wide CSPRNG.

// crates.io
use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};
use rand::{RngCore, SeedableRng, rngs::StdRng};
use zeroize::Zeroize;
// self
use crate::_prelude::*;

/// Raw random bytes per nonce; encodes to exactly [`NONCE_LEN`] characters.
const NONCE_BYTES: usize = 48;
const WARM_UP_BYTES: usize = 64;

/// Length of every nonce returned by [`create_nonce`].
pub const NONCE_LEN: usize = 64;

// Seeded from the OS on first use. A missing OS entropy source is fatal, not a per-call error.
static SECURE_RANDOM: LazyLock<Mutex<StdRng>> = LazyLock::new(|| {
	let mut rng = StdRng::from_os_rng();
	let mut warm_up = [0_u8; WARM_UP_BYTES];

	rng.fill_bytes(&mut warm_up);
	warm_up.zeroize();

	Mutex::new(rng)
});

/// Initializes the shared random source ahead of the first [`create_nonce`] call.
pub fn warm_up() {
	LazyLock::force(&SECURE_RANDOM);
}

/// Creates a 64-character unpadded base64url nonce from 48 fresh random bytes.
pub fn create_nonce() -> String {
	let mut raw = [0_u8; NONCE_BYTES];

	SECURE_RANDOM.lock().fill_bytes(&mut raw);

	let nonce = URL_SAFE_NO_PAD.encode(raw.as_slice());

	raw.zeroize();

	nonce
}
