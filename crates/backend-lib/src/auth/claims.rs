//! Claim set carried by a session token.
use super::identity::Subject;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Claims the issuer controls; identity claims with these names are dropped
pub const RESERVED_CLAIMS: [&str; 5] = ["sub", "iat", "exp", "jti", "nbf"];

/// Session token claims
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (identity id)
    pub sub: Subject,
    /// Issued at, unix seconds
    #[serde(default)]
    pub iat: u64,
    /// Expiry, unix seconds
    pub exp: u64,
    /// Token id
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub jti: Option<String>,
    /// Caller-supplied claims
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Claims {
    /// Valid strictly before `exp`
    pub fn is_expired_at(&self, now: u64) -> bool {
        now >= self.exp
    }
}
