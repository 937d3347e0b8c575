// crates/backend-lib/src/middleware/mod.rs

//! Middleware for the gatekeeper HTTP edge.

pub mod session;

pub use session::{extract_token, require_session};
