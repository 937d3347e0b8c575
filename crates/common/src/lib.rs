// ================
// common/src/lib.rs
// ================
//! Common types and structures
//! exchanged between the gatekeeper server and its clients.
//! This module defines the login/session payloads and the error envelope.

use serde::{Deserialize, Serialize};

/// Credentials submitted to `POST /login`
///
/// Accepted both as JSON and as an urlencoded form.
#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct LoginRequest {
    /// Login identifier (an email address)
    #[serde(default)]
    pub email: String,
    /// Plaintext password
    #[serde(default)]
    pub password: String,
}

/// Response to a successful login
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct LoginResponse {
    /// Signed session token, also set as an HTTP-only cookie
    pub token: String,
    /// Always `Bearer`
    pub token_type: String,
    /// Unix timestamp (seconds) after which the token is rejected
    pub expires_at: u64,
}

/// Verified session returned by `GET /me`
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct SessionInfo {
    /// Subject of the token (numeric or string id)
    pub subject: serde_json::Value,
    /// Issuance time, unix seconds
    pub issued_at: u64,
    /// Expiry time, unix seconds
    pub expires_at: u64,
    /// Any additional claims carried by the token
    #[serde(default)]
    pub claims: serde_json::Map<String, serde_json::Value>,
}

/// Error envelope returned by every failing endpoint
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct ErrorBody {
    pub error: ErrorDetail,
}

/// Machine-readable code plus a human message
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
}
