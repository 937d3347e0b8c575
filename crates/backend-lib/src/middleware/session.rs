//! Session gate for protected routes.
use crate::error::{AppError, AuthError};
use crate::AppState;
use axum::{
    body::Body,
    extract::State,
    http::{
        header::{AUTHORIZATION, COOKIE, LOCATION},
        HeaderMap, Request, StatusCode,
    },
    middleware::Next,
    response::{IntoResponse, Response},
};
use std::sync::Arc;
use tracing::debug;

/// Require a valid session token before running the inner handler.
///
/// On success the verified `Claims` are inserted into the request extensions.
/// On failure the request is answered with 401, or with a redirect when
/// `auth.login_redirect` is configured.
pub async fn require_session(
    State(state): State<Arc<AppState>>,
    mut request: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    let verdict = match extract_token(request.headers(), &state.settings.auth.cookie_name) {
        Some(token) => state.guard.authorize(&token),
        None => Err(AuthError::Unauthenticated),
    };

    match verdict {
        Ok(claims) => {
            request.extensions_mut().insert(claims);
            Ok(next.run(request).await)
        }
        Err(err) => {
            debug!(path = %request.uri().path(), "request denied without valid session");
            match &state.settings.auth.login_redirect {
                Some(target) => Ok((StatusCode::FOUND, [(LOCATION, target.clone())]).into_response()),
                None => Err(err.into()),
            }
        }
    }
}

/// Find the session token: the named cookie first, then a bearer header
pub fn extract_token(headers: &HeaderMap, cookie_name: &str) -> Option<String> {
    let from_cookie = headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, value)| *name == cookie_name && !value.is_empty())
        .map(|(_, value)| value.to_string());

    from_cookie.or_else(|| {
        headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.strip_prefix("Bearer "))
            .map(str::trim)
            .filter(|token| !token.is_empty())
            .map(str::to_string)
    })
}
