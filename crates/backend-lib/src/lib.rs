// ============================
// crates/backend-lib/src/lib.rs
// ============================
//! Core functionality for the gatekeeper authentication server.
//!
//! The `auth` module holds the credential verifier and the session token
//! issuer/guard; everything else is the HTTP edge around them.

pub mod auth;
pub mod config;
pub mod error;
pub mod handlers;
pub mod metrics;
pub mod middleware;
pub mod router;
pub mod store;
pub mod validation;

use crate::auth::{Clock, CredentialVerifier, SystemClock, TokenGuard, TokenIssuer};
use crate::config::Settings;
use crate::error::AppError;
use crate::store::CredentialStore;
use std::sync::Arc;

/// Application state shared across all handlers
pub struct AppState {
    /// Credential verifier
    pub verifier: CredentialVerifier,
    /// Session token issuer
    pub issuer: TokenIssuer,
    /// Session token guard
    pub guard: TokenGuard,
    /// Validated settings
    pub settings: Settings,
}

impl AppState {
    /// Create a new application state
    ///
    /// Fails when the settings are invalid or the signing key is unusable.
    pub fn new(store: Arc<dyn CredentialStore>, settings: Settings) -> Result<Self, AppError> {
        Self::with_clock(store, settings, Arc::new(SystemClock))
    }

    /// Create a new application state with an explicit time source
    pub fn with_clock(
        store: Arc<dyn CredentialStore>,
        settings: Settings,
        clock: Arc<dyn Clock>,
    ) -> Result<Self, AppError> {
        settings
            .validate()
            .map_err(|e| AppError::Config(e.to_string()))?;

        let issuer = TokenIssuer::new(
            &settings.auth.signing_key,
            settings.auth.algorithm,
            settings.auth.token_ttl(),
        )?
        .with_clock(clock.clone());
        let guard = TokenGuard::new(&settings.auth.signing_key)?.with_clock(clock);

        Ok(Self {
            verifier: CredentialVerifier::new(store, settings.store.password_scheme),
            issuer,
            guard,
            settings,
        })
    }
}
