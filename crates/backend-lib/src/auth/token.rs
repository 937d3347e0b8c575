// ============================
// crates/backend-lib/src/auth/token.rs
// ============================
/*! Signed session tokens.
The issuer mints compact HMAC-signed JWTs for verified identities; the guard
checks them on every protected request. Both only share the read-only key. */
use super::claims::{Claims, RESERVED_CLAIMS};
use super::clock::{Clock, SystemClock};
use super::identity::Identity;
use super::key::{SigningKey, RECOMMENDED_KEY_LEN};
use crate::error::AuthError;
use crate::metrics::{GUARD_ACCEPTED, GUARD_REJECTED, TOKEN_ISSUED};
use jsonwebtoken::{decode, decode_header, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use metrics::counter;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, warn};
use uuid::Uuid;

/// Algorithms the guard accepts
pub const HMAC_FAMILY: [Algorithm; 3] = [Algorithm::HS256, Algorithm::HS384, Algorithm::HS512];

/// Token validity window (24 hours)
pub const DEFAULT_TOKEN_TTL: Duration = Duration::from_secs(60 * 60 * 24);

/// Longest lifetime the issuer accepts (one year)
pub const MAX_TOKEN_TTL: Duration = Duration::from_secs(60 * 60 * 24 * 365);

/// Mints session tokens
#[derive(Clone)]
pub struct TokenIssuer {
    key: EncodingKey,
    header: Header,
    ttl: Duration,
    clock: Arc<dyn Clock>,
}

impl TokenIssuer {
    /** Create an issuer
    # Errors
    `AuthError::Signing` if the key is blank, the algorithm is not HMAC or the
    lifetime is zero or longer than `MAX_TOKEN_TTL`. Callers treat this as
    fatal at startup. */
    pub fn new(key: &SigningKey, algorithm: Algorithm, ttl: Duration) -> Result<Self, AuthError> {
        if key.is_empty() {
            return Err(AuthError::Signing("signing key is not configured".to_string()));
        }
        if !HMAC_FAMILY.contains(&algorithm) {
            return Err(AuthError::Signing(format!(
                "{algorithm:?} is not an HMAC algorithm"
            )));
        }
        if ttl.as_secs() == 0 {
            return Err(AuthError::Signing("token lifetime must be at least one second".to_string()));
        }
        if ttl > MAX_TOKEN_TTL {
            return Err(AuthError::Signing(format!(
                "token lifetime must not exceed {} seconds",
                MAX_TOKEN_TTL.as_secs()
            )));
        }
        if key.len() < RECOMMENDED_KEY_LEN {
            warn!(
                "signing key is shorter than {RECOMMENDED_KEY_LEN} bytes; use a longer random secret"
            );
        }

        Ok(Self {
            key: EncodingKey::from_secret(key.as_bytes()),
            header: Header::new(algorithm),
            ttl,
            clock: Arc::new(SystemClock),
        })
    }

    /// Replace the time source
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Claim set for `identity` as of now
    pub fn claims_for(&self, identity: &Identity) -> Result<Claims, AuthError> {
        let now = self.clock.now();
        let exp = now.checked_add(self.ttl.as_secs()).ok_or_else(|| {
            error!(now, "token expiry overflows the timestamp range");
            AuthError::Signing("token expiry out of range".to_string())
        })?;
        let extra = identity
            .claims
            .iter()
            .filter(|(name, _)| !RESERVED_CLAIMS.contains(&name.as_str()))
            .map(|(name, value)| (name.clone(), value.clone()))
            .collect();

        Ok(Claims {
            sub: identity.id.clone(),
            iat: now,
            exp,
            jti: Some(Uuid::new_v4().to_string()),
            extra,
        })
    }

    /// Sign a token for `identity`
    pub fn issue(&self, identity: &Identity) -> Result<String, AuthError> {
        self.issue_with_claims(identity).map(|(token, _)| token)
    }

    /// Sign a token for `identity`, also returning the claims it carries
    pub fn issue_with_claims(&self, identity: &Identity) -> Result<(String, Claims), AuthError> {
        let claims = self.claims_for(identity)?;
        let token = encode(&self.header, &claims, &self.key).map_err(|e| {
            error!("failed to sign session token: {e}");
            AuthError::Signing(e.to_string())
        })?;

        counter!(TOKEN_ISSUED).increment(1);
        debug!(subject = %claims.sub, exp = claims.exp, "issued session token");
        Ok((token, claims))
    }
}

/// Admits or denies a request based on its session token
#[derive(Clone)]
pub struct TokenGuard {
    key: DecodingKey,
    validation: Validation,
    clock: Arc<dyn Clock>,
}

impl TokenGuard {
    pub fn new(key: &SigningKey) -> Result<Self, AuthError> {
        if key.is_empty() {
            return Err(AuthError::Signing("signing key is not configured".to_string()));
        }

        let mut validation = Validation::new(Algorithm::HS256);
        validation.algorithms = HMAC_FAMILY.to_vec();
        validation.set_required_spec_claims(&["exp"]);
        // Expiry is checked against our own clock, without leeway.
        validation.validate_exp = false;
        validation.validate_aud = false;
        validation.leeway = 0;

        Ok(Self {
            key: DecodingKey::from_secret(key.as_bytes()),
            validation,
            clock: Arc::new(SystemClock),
        })
    }

    /// Replace the time source
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Validate a token and return its claims.
    ///
    /// Every failure is `AuthError::Unauthenticated`; the reason is only logged.
    pub fn authorize(&self, token: &str) -> Result<Claims, AuthError> {
        let result = self.check(token.trim());
        match &result {
            Ok(_) => counter!(GUARD_ACCEPTED).increment(1),
            Err(_) => counter!(GUARD_REJECTED).increment(1),
        }
        result
    }

    fn check(&self, token: &str) -> Result<Claims, AuthError> {
        if token.is_empty() {
            debug!("no session token presented");
            return Err(AuthError::Unauthenticated);
        }

        let header = decode_header(token).map_err(|e| {
            debug!("malformed session token: {e}");
            AuthError::Unauthenticated
        })?;
        if !HMAC_FAMILY.contains(&header.alg) {
            warn!(alg = ?header.alg, "rejected session token with unexpected algorithm");
            return Err(AuthError::Unauthenticated);
        }

        let claims = decode::<Claims>(token, &self.key, &self.validation)
            .map_err(|e| {
                debug!("session token rejected: {e}");
                AuthError::Unauthenticated
            })?
            .claims;

        if claims.is_expired_at(self.clock.now()) {
            debug!(subject = %claims.sub, exp = claims.exp, "session token expired");
            return Err(AuthError::Unauthenticated);
        }
        Ok(claims)
    }
}
