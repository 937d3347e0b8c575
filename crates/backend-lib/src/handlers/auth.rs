// ============================
// crates/backend-lib/src/handlers/auth.rs
// ============================
//! Login, logout and session introspection endpoints.
use crate::auth::{Claims, Subject};
use crate::config::AuthSettings;
use crate::error::AppError;
use crate::validation::validate_login;
use crate::AppState;
use axum::{
    extract::{FromRequest, Request, State},
    http::{
        header::{CONTENT_TYPE, LOCATION, SET_COOKIE},
        StatusCode,
    },
    response::{IntoResponse, Response},
    Extension, Form, Json,
};
use gatekeeper_common::{LoginRequest, LoginResponse, SessionInfo};
use serde_json::Value;
use std::sync::Arc;
use tracing::info;

/// `POST /login`: verify credentials, set the session cookie, return the token
pub async fn login(
    State(state): State<Arc<AppState>>,
    request: Request,
) -> Result<Response, AppError> {
    let credentials = read_login(request).await?;
    validate_login(&credentials).map_err(|e| AppError::InvalidInput(e.to_string()))?;

    let identity = state
        .verifier
        .authenticate(&credentials.email, &credentials.password)
        .await?;
    let (token, claims) = state.issuer.issue_with_claims(&identity)?;
    info!(subject = %claims.sub, "login succeeded");

    let cookie = session_cookie(&state.settings.auth, &token);
    let body = LoginResponse {
        token,
        token_type: "Bearer".to_string(),
        expires_at: claims.exp,
    };
    Ok(([(SET_COOKIE, cookie)], Json(body)).into_response())
}

/// `GET|POST /logout`: tell the client to drop its cookie.
///
/// Tokens are stateless; nothing changes on the server.
pub async fn logout(State(state): State<Arc<AppState>>) -> Response {
    let cookie = clear_cookie(&state.settings.auth);
    match &state.settings.auth.login_redirect {
        Some(target) => (
            StatusCode::FOUND,
            [(SET_COOKIE, cookie), (LOCATION, target.clone())],
        )
            .into_response(),
        None => (StatusCode::NO_CONTENT, [(SET_COOKIE, cookie)]).into_response(),
    }
}

/// `GET /me`: the verified claims of the current session
pub async fn me(Extension(claims): Extension<Claims>) -> Json<SessionInfo> {
    let subject = match claims.sub {
        Subject::Id(id) => Value::from(id),
        Subject::Name(name) => Value::from(name),
    };
    Json(SessionInfo {
        subject,
        issued_at: claims.iat,
        expires_at: claims.exp,
        claims: claims.extra,
    })
}

/// `GET /health`
pub async fn health() -> &'static str {
    "ok"
}

/// Accept the credentials as an urlencoded form or as JSON
async fn read_login(request: Request) -> Result<LoginRequest, AppError> {
    let is_form = request
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|ct| ct.starts_with("application/x-www-form-urlencoded"));

    if is_form {
        let Form(body) = Form::<LoginRequest>::from_request(request, &())
            .await
            .map_err(|e| AppError::InvalidInput(e.body_text()))?;
        Ok(body)
    } else {
        let Json(body) = Json::<LoginRequest>::from_request(request, &())
            .await
            .map_err(|e| AppError::InvalidInput(e.body_text()))?;
        Ok(body)
    }
}

/// `Set-Cookie` value carrying a fresh token
pub fn session_cookie(settings: &AuthSettings, token: &str) -> String {
    format!(
        "{}={}; Path=/; Max-Age={}; HttpOnly; SameSite=Lax{}",
        settings.cookie_name,
        token,
        settings.token_ttl_secs,
        if settings.cookie_secure { "; Secure" } else { "" }
    )
}

/// `Set-Cookie` value that removes the session cookie
pub fn clear_cookie(settings: &AuthSettings) -> String {
    format!(
        "{}=; Path=/; Max-Age=0; HttpOnly; SameSite=Lax{}",
        settings.cookie_name,
        if settings.cookie_secure { "; Secure" } else { "" }
    )
}
