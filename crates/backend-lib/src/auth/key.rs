//! Process-wide HMAC signing secret.
use serde::Deserialize;
use std::fmt;
use zeroize::Zeroize;

/// Shortest secret accepted without a warning (HS256 output size)
pub const RECOMMENDED_KEY_LEN: usize = 32;

/// Secret shared read-only by the issuer and the guard.
///
/// Wiped from memory on drop and never printed.
#[derive(Clone, Default, Deserialize)]
#[serde(transparent)]
pub struct SigningKey(String);

impl SigningKey {
    pub fn new(secret: impl Into<String>) -> Self {
        Self(secret.into())
    }

    pub fn as_bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }

    pub fn is_empty(&self) -> bool {
        self.0.trim().is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }
}

impl Drop for SigningKey {
    fn drop(&mut self) {
        self.0.zeroize();
    }
}

impl fmt::Debug for SigningKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SigningKey(<redacted>)")
    }
}
