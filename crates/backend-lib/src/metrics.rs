// ==============
// crates/backend-lib/src/metrics.rs

//! Central place for metric keys
pub const LOGIN_SUCCESS: &str = "auth.login.success";
pub const LOGIN_FAILURE: &str = "auth.login.failure";
pub const TOKEN_ISSUED: &str = "auth.token.issued";
pub const GUARD_ACCEPTED: &str = "auth.guard.accepted";
pub const GUARD_REJECTED: &str = "auth.guard.rejected";
