// ============================
// crates/backend-lib/src/router.rs
// ============================
//! HTTP router.
use crate::handlers::{health, login, logout, me};
use crate::middleware::require_session;
use crate::AppState;
use axum::{
    middleware::from_fn_with_state,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

/// Create the router with the auth endpoints
pub fn create_router(state: Arc<AppState>) -> Router {
    create_router_with(state, Router::new())
}

/// Create the router, placing `protected` behind the session gate
/// together with `/me`
pub fn create_router_with(state: Arc<AppState>, protected: Router<Arc<AppState>>) -> Router {
    let protected = protected
        .route("/me", get(me))
        .route_layer(from_fn_with_state(state.clone(), require_session));

    Router::new()
        .route("/login", post(login))
        .route("/logout", get(logout).post(logout))
        .route("/health", get(health))
        .merge(protected)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
