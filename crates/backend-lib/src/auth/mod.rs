// ============================
// crates/backend-lib/src/auth/mod.rs
// ============================
//! Authentication core: credential verification and session tokens.

pub mod claims;
pub mod clock;
pub mod identity;
pub mod key;
pub mod password;
pub mod token;
pub mod verifier;

pub use claims::Claims;
pub use clock::{Clock, ManualClock, SystemClock};
pub use identity::{normalize_identifier, Identity, Subject};
pub use key::SigningKey;
pub use password::{hash_password, verify_password, HashScheme};
pub use token::{TokenGuard, TokenIssuer, DEFAULT_TOKEN_TTL, HMAC_FAMILY, MAX_TOKEN_TTL};
pub use verifier::CredentialVerifier;
