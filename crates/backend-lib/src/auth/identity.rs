//! Identities handed to the core by a credential store.
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// Unique id of an identity; becomes the `sub` claim
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Subject {
    Id(u64),
    Name(String),
}

impl fmt::Display for Subject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Subject::Id(id) => write!(f, "{id}"),
            Subject::Name(name) => f.write_str(name),
        }
    }
}

impl From<u64> for Subject {
    fn from(id: u64) -> Self {
        Subject::Id(id)
    }
}

impl From<&str> for Subject {
    fn from(name: &str) -> Self {
        Subject::Name(name.to_string())
    }
}

impl From<String> for Subject {
    fn from(name: String) -> Self {
        Subject::Name(name)
    }
}

/// An authenticatable principal as returned by the credential store.
///
/// `secret_hash` is a PHC string (scrypt, argon2) or a bcrypt hash. The
/// plaintext secret never lives here.
#[derive(Clone, PartialEq, Serialize, Deserialize)]
pub struct Identity {
    pub id: Subject,
    #[serde(alias = "email")]
    pub identifier: String,
    #[serde(alias = "password_hash")]
    pub secret_hash: String,
    /// Extra claims to embed in issued tokens
    #[serde(default)]
    pub claims: Map<String, Value>,
}

impl Identity {
    pub fn new(id: impl Into<Subject>, identifier: &str, secret_hash: String) -> Self {
        Self {
            id: id.into(),
            identifier: normalize_identifier(identifier),
            secret_hash,
            claims: Map::new(),
        }
    }

    pub fn with_claim(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.claims.insert(key.to_string(), value.into());
        self
    }
}

impl fmt::Debug for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Identity")
            .field("id", &self.id)
            .field("identifier", &self.identifier)
            .field("secret_hash", &"<redacted>")
            .field("claims", &self.claims)
            .finish()
    }
}

/// Lookup key form of an identifier: trimmed and lowercased
pub fn normalize_identifier(identifier: &str) -> String {
    identifier.trim().to_lowercase()
}
