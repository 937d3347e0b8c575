//! Credential verification against a credential store.
use super::identity::Identity;
use super::password::{hash_password, verify_password, HashScheme};
use crate::error::{AuthError, StoreError};
use crate::metrics::{LOGIN_FAILURE, LOGIN_SUCCESS};
use crate::store::CredentialStore;
use metrics::counter;
use std::sync::{Arc, OnceLock};
use tracing::{debug, error, warn};

/// Secret hashed once to build the decoy hash
const DECOY_SECRET: &str = "gatekeeper-decoy-secret";

/// Resolves an identifier and checks the secret against the stored hash
#[derive(Clone)]
pub struct CredentialVerifier {
    store: Arc<dyn CredentialStore>,
    scheme: HashScheme,
    decoy: Arc<OnceLock<String>>,
}

impl CredentialVerifier {
    /// `scheme` should match the one the store hashes with, so that a miss
    /// costs the same as a wrong secret.
    pub fn new(store: Arc<dyn CredentialStore>, scheme: HashScheme) -> Self {
        Self {
            store,
            scheme,
            decoy: Arc::new(OnceLock::new()),
        }
    }

    /// Authenticate an identifier/secret pair.
    ///
    /// Every failure is `AuthError::InvalidCredentials`, whether the identifier
    /// is unknown, the secret is wrong or the store misbehaved.
    pub async fn authenticate(&self, identifier: &str, secret: &str) -> Result<Identity, AuthError> {
        let result = self.check(identifier, secret).await;
        match &result {
            Ok(identity) => {
                counter!(LOGIN_SUCCESS).increment(1);
                debug!(subject = %identity.id, "credentials accepted");
            }
            Err(_) => {
                counter!(LOGIN_FAILURE).increment(1);
                warn!("credentials rejected");
            }
        }
        result
    }

    async fn check(&self, identifier: &str, secret: &str) -> Result<Identity, AuthError> {
        if identifier.trim().is_empty() || secret.is_empty() {
            return Err(AuthError::InvalidCredentials);
        }

        let identity = match self.store.find_by_identifier(identifier).await {
            Ok(identity) => Some(identity),
            Err(StoreError::NotFound) => None,
            Err(e) => {
                error!("credential store lookup failed: {e}");
                None
            }
        };

        // A miss still pays for one verification, against the decoy hash.
        let stored = identity.as_ref().map(|identity| identity.secret_hash.clone());
        let decoy = self.decoy.clone();
        let scheme = self.scheme;
        let secret = secret.to_string();
        // Hash verification is CPU bound; keep it off the async workers.
        let matches = tokio::task::spawn_blocking(move || match stored {
            Some(hash) => verify_password(&hash, &secret),
            None => {
                let decoy = decoy.get_or_init(|| decoy_hash(scheme));
                verify_password(decoy, &secret);
                false
            }
        })
        .await
        .unwrap_or_else(|e| {
            error!("password verification task failed: {e}");
            false
        });

        match identity {
            Some(identity) if matches => Ok(identity),
            _ => Err(AuthError::InvalidCredentials),
        }
    }
}

fn decoy_hash(scheme: HashScheme) -> String {
    hash_password(DECOY_SECRET, scheme).unwrap_or_else(|e| {
        error!("failed to build decoy hash: {e}");
        String::new()
    })
}
