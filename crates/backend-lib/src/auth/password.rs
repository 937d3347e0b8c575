// ============================
// crates/backend-lib/src/auth/password.rs
// ============================
//! Password hashing and verification.
use argon2::Argon2;
use scrypt::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Params, Scrypt,
};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Hash algorithm used when a store writes a new secret
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "algorithm", rename_all = "lowercase")]
pub enum HashScheme {
    Scrypt {
        #[serde(default = "default_scrypt_log_n")]
        log_n: u8,
    },
    Argon2,
    Bcrypt {
        #[serde(default = "default_bcrypt_cost")]
        cost: u32,
    },
}

/// bcrypt only reads this many bytes of a secret
pub const BCRYPT_MAX_SECRET_LEN: usize = 72;

fn default_scrypt_log_n() -> u8 {
    Params::RECOMMENDED_LOG_N
}

fn default_bcrypt_cost() -> u32 {
    bcrypt::DEFAULT_COST
}

impl Default for HashScheme {
    fn default() -> Self {
        HashScheme::Scrypt {
            log_n: default_scrypt_log_n(),
        }
    }
}

/// Hash a password with the given scheme
pub fn hash_password(plain: &str, scheme: HashScheme) -> anyhow::Result<String> {
    let hash = match scheme {
        HashScheme::Scrypt { log_n } => {
            let salt = SaltString::generate(&mut OsRng);
            let params = Params::new(log_n, Params::RECOMMENDED_R, Params::RECOMMENDED_P, Params::RECOMMENDED_LEN)
                .map_err(|e| anyhow::anyhow!("invalid scrypt params: {e}"))?;
            Scrypt
                .hash_password_customized(plain.as_bytes(), None, None, params, &salt)?
                .to_string()
        }
        HashScheme::Argon2 => {
            let salt = SaltString::generate(&mut OsRng);
            Argon2::default()
                .hash_password(plain.as_bytes(), &salt)?
                .to_string()
        }
        HashScheme::Bcrypt { cost } => {
            if plain.len() > BCRYPT_MAX_SECRET_LEN {
                anyhow::bail!("bcrypt secrets are limited to {BCRYPT_MAX_SECRET_LEN} bytes");
            }
            bcrypt::hash(plain, cost)?
        }
    };
    Ok(hash)
}

/// Verify a password against a stored hash.
///
/// bcrypt hashes are recognised by their `$2?$` prefix, everything else must be
/// a PHC string produced by scrypt or argon2. An unparseable hash never verifies.
/// A secret longer than bcrypt reads never matches a bcrypt hash.
pub fn verify_password(hash: &str, plain: &str) -> bool {
    if is_bcrypt_hash(hash) {
        if plain.len() > BCRYPT_MAX_SECRET_LEN {
            debug!("secret exceeds the bcrypt input limit");
            return false;
        }
        return match bcrypt::verify(plain, hash) {
            Ok(ok) => ok,
            Err(e) => {
                debug!("bcrypt verify error: {e}");
                false
            }
        };
    }

    let parsed_hash = match PasswordHash::new(hash) {
        Ok(h) => h,
        Err(e) => {
            debug!("unparseable password hash: {e}");
            return false;
        }
    };
    let verifiers: [&dyn PasswordVerifier; 2] = [&Scrypt, &Argon2::default()];
    parsed_hash.verify_password(&verifiers, plain).is_ok()
}

fn is_bcrypt_hash(hash: &str) -> bool {
    ["$2a$", "$2b$", "$2x$", "$2y$"]
        .iter()
        .any(|prefix| hash.starts_with(prefix))
}
