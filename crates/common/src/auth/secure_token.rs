//! Cryptographically strong random tokens
//!
//! Every secret this service mints (cookie signing key, anti-forgery state,
//! session identifiers) comes from the operating system CSPRNG. A failing
//! entropy source is reported, never papered over with a weaker generator.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use rand::rngs::OsRng;
use rand::RngCore;
use teamlink_domain::constants::{SESSION_ID_BYTES, STATE_BYTES};
use teamlink_domain::TeamLinkError;

/// Error raised when the OS random source cannot deliver bytes
#[derive(Debug)]
pub struct EntropyError(rand::Error);

impl std::fmt::Display for EntropyError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "OS random source unavailable: {}", self.0)
    }
}

impl std::error::Error for EntropyError {}

impl From<EntropyError> for TeamLinkError {
    fn from(err: EntropyError) -> Self {
        Self::Entropy(err.to_string())
    }
}

/// Fill a fresh buffer of `n` bytes from the OS CSPRNG.
///
/// # Errors
/// Returns [`EntropyError`] if the OS random source fails.
pub fn random_bytes(n: usize) -> Result<Vec<u8>, EntropyError> {
    let mut buf = vec![0u8; n];
    OsRng.try_fill_bytes(&mut buf).map_err(EntropyError)?;
    Ok(buf)
}

/// Generate `n` random bytes encoded as URL-safe base64 (no padding).
///
/// # Errors
/// Returns [`EntropyError`] if the OS random source fails.
pub fn generate_secure_key(n: usize) -> Result<String, EntropyError> {
    random_bytes(n).map(|bytes| URL_SAFE_NO_PAD.encode(bytes))
}

/// Anti-forgery `state` for one login attempt (32 bytes, 43 chars).
///
/// # Errors
/// Returns [`EntropyError`] if the OS random source fails.
pub fn generate_state() -> Result<String, EntropyError> {
    generate_secure_key(STATE_BYTES)
}

/// Opaque session identifier: 16 random bytes, hex encoded.
///
/// # Errors
/// Returns [`EntropyError`] if the OS random source fails.
pub fn generate_session_id() -> Result<String, EntropyError> {
    random_bytes(SESSION_ID_BYTES).map(hex::encode)
}

/// Compare an issued state with the one returned by the provider.
///
/// Runs in time independent of where the inputs first differ.
#[must_use]
pub fn validate_state(expected: &str, actual: &str) -> bool {
    let (a, b) = (expected.as_bytes(), actual.as_bytes());
    if a.len() != b.len() {
        return false;
    }
    a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}
