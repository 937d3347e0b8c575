// ============================
// crates/backend-lib/src/store.rs
// ============================
//! Credential store abstraction with an in-memory implementation.
//!
//! Stores own identities and their hashes. Hashing on write happens here and
//! nowhere else; the auth core only ever verifies.
use crate::auth::identity::{normalize_identifier, Identity, Subject};
use crate::auth::password::{hash_password, HashScheme};
use crate::config::SeedIdentity;
use crate::error::StoreError;
use async_trait::async_trait;
use dashmap::{mapref::entry::Entry, DashMap};
use serde_json::{Map, Value};
use std::{fs, path::Path, sync::Arc};
use tracing::info;

/// Read side of a credential store, as consumed by the verifier
#[async_trait]
pub trait CredentialStore: Send + Sync {
    /// Look up exactly one identity by its (normalized) identifier
    async fn find_by_identifier(&self, identifier: &str) -> Result<Identity, StoreError>;
}

/// Concurrent in-memory credential store
#[derive(Clone, Default)]
pub struct MemoryCredentialStore {
    identities: Arc<DashMap<String, Identity>>,
    scheme: HashScheme,
}

impl MemoryCredentialStore {
    pub fn new(scheme: HashScheme) -> Self {
        Self {
            identities: Arc::new(DashMap::new()),
            scheme,
        }
    }

    /// Load identity records from a JSON array file.
    ///
    /// Each record carries `id`, `email`, `password_hash` and optional `claims`.
    pub fn load_json<P: AsRef<Path>>(path: P, scheme: HashScheme) -> Result<Self, StoreError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)?;
        let records: Vec<Identity> = serde_json::from_str(&content)?;

        let store = Self::new(scheme);
        for record in records {
            store.insert_hashed(record)?;
        }
        info!("loaded {} identities from {}", store.len(), path.display());
        Ok(store)
    }

    /// Register a new identity, hashing `secret` with the store's scheme
    pub fn insert(
        &self,
        id: impl Into<Subject>,
        identifier: &str,
        secret: &str,
        claims: Map<String, Value>,
    ) -> Result<Identity, StoreError> {
        if secret.is_empty() {
            return Err(StoreError::InvalidRecord("empty secret".to_string()));
        }
        let secret_hash =
            hash_password(secret, self.scheme).map_err(|e| StoreError::Hash(e.to_string()))?;

        let mut identity = Identity::new(id, identifier, secret_hash);
        identity.claims = claims;
        self.insert_hashed(identity.clone())?;
        Ok(identity)
    }

    /// Register an identity whose secret is already hashed
    pub fn insert_hashed(&self, mut identity: Identity) -> Result<(), StoreError> {
        identity.identifier = normalize_identifier(&identity.identifier);
        if identity.identifier.is_empty() {
            return Err(StoreError::InvalidRecord("empty identifier".to_string()));
        }
        if identity.secret_hash.is_empty() {
            return Err(StoreError::InvalidRecord(format!(
                "missing secret hash for {}",
                identity.identifier
            )));
        }

        match self.identities.entry(identity.identifier.clone()) {
            Entry::Occupied(_) => Err(StoreError::Duplicate(identity.identifier)),
            Entry::Vacant(slot) => {
                slot.insert(identity);
                Ok(())
            }
        }
    }

    /// Insert the bootstrap identity if the store is still empty.
    ///
    /// Returns whether anything was inserted.
    pub fn seed(&self, seed: &SeedIdentity) -> Result<bool, StoreError> {
        if !self.is_empty() {
            return Ok(false);
        }
        let identity = self.insert(seed.id.clone(), &seed.email, &seed.password, seed.claims.clone())?;
        info!(identifier = %identity.identifier, "seeded bootstrap identity");
        Ok(true)
    }

    pub fn len(&self) -> usize {
        self.identities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.identities.is_empty()
    }
}

#[async_trait]
impl CredentialStore for MemoryCredentialStore {
    async fn find_by_identifier(&self, identifier: &str) -> Result<Identity, StoreError> {
        self.identities
            .get(&normalize_identifier(identifier))
            .map(|entry| entry.value().clone())
            .ok_or(StoreError::NotFound)
    }
}
