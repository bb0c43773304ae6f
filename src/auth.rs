//! Credentials, nonces, the HMAC signing scheme, and the access tokens it unlocks.

pub mod access_token;
pub mod credential;
pub mod nonce;
pub mod secret;
pub mod signing;
pub mod validate;

pub use access_token::*;
pub use credential::*;
pub use nonce::*;
pub use secret::*;
pub use signing::*;
pub use validate::*;
