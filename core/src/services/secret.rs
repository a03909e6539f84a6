//! Secret generation, keyed hashing, and timing-safe verification
//!
//! Shared by the OTP and reset engines. Secrets are never stored in the
//! clear: the store only ever sees `hash_secret` output.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use constant_time_eq::constant_time_eq;
use rand::rngs::OsRng;
use rand::{Rng, RngCore};
use sha2::{Digest, Sha256};

/// Length of a registration OTP code in decimal digits
pub const OTP_CODE_LENGTH: usize = 6;

/// Raw entropy of a reset token before encoding
const RESET_TOKEN_BYTES: usize = 32;

/// Generate a uniformly random 6-digit OTP code
///
/// Uses the OS CSPRNG. Leading zeros are preserved: the value space is
/// [0, 1_000_000) rendered as a fixed-width decimal string.
pub fn generate_otp_code() -> String {
    let mut rng = OsRng;
    let n: u32 = rng.gen_range(0..1_000_000);
    format!("{:06}", n)
}

/// Generate an opaque password-reset token
///
/// 32 random bytes, URL-safe base64 without padding, so the token can
/// travel inside a reset link untouched.
pub fn generate_reset_token() -> String {
    let mut buf = [0u8; RESET_TOKEN_BYTES];
    OsRng.fill_bytes(&mut buf);
    URL_SAFE_NO_PAD.encode(buf)
}

/// One-way hash of a secret keyed with the service secret
///
/// SHA-256 over `value || secret`, lower-case hex. The service secret
/// keeps leaked store contents from being brute-forced offline against
/// the tiny OTP value space.
pub fn hash_secret(value: &str, secret: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(value.as_bytes());
    hasher.update(secret.as_bytes());
    hex::encode(hasher.finalize())
}

/// Check a candidate secret against a stored hash in constant time
pub fn verify_secret(candidate: &str, stored_hash: &str, secret: &str) -> bool {
    let computed = hash_secret(candidate, secret);
    constant_time_eq(computed.as_bytes(), stored_hash.as_bytes())
}
