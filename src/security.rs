use anyhow::{anyhow, Result};
use subtle::ConstantTimeEq;

/// Number of random bytes behind a CSRF token (64 hex characters).
const CSRF_TOKEN_BYTES: usize = 32;

/// Constant-time string comparison to prevent timing attacks
/// Use this for comparing session and anti-forgery tokens
pub fn constant_time_compare(a: &str, b: &str) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.as_bytes().ct_eq(b.as_bytes()).into()
}

/// Generate a fresh anti-forgery token: 32 random bytes, lowercase hex.
pub fn generate_csrf_token() -> Result<String> {
    let mut bytes = [0u8; CSRF_TOKEN_BYTES];
    getrandom::getrandom(&mut bytes)
        .map_err(|e| anyhow!("Failed to read system randomness: {}", e))?;
    Ok(hex::encode(bytes))
}
