use crate::test_utils::{body_json, setup_test_state, test_settings, START};
use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    routing::get,
    Router,
};
use gatekeeper::{router, AppState};
use gatekeeper_common::LoginResponse;
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use tower::ServiceExt;

fn json_login(email: &str, password: &str) -> Request<Body> {
    Request::builder()
        .method(Method::POST)
        .uri("/login")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(
            json!({ "email": email, "password": password }).to_string(),
        ))
        .unwrap()
}

fn get_with(uri: &str, name: header::HeaderName, value: String) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .header(name, value)
        .body(Body::empty())
        .unwrap()
}

fn get_plain(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

async fn login_token(app: &Router) -> String {
    let response = app.clone().oneshot(json_login("a@b.com", "pw1")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body: LoginResponse = serde_json::from_value(body_json(response).await).unwrap();
    body.token
}

#[tokio::test]
async fn test_login_sets_cookie_and_returns_token() {
    let (state, _clock) = setup_test_state(test_settings());
    let app = router::create_router(state);

    let response = app.oneshot(json_login("A@B.com", "pw1")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let cookie = response
        .headers()
        .get(header::SET_COOKIE)
        .unwrap()
        .to_str()
        .unwrap()
        .to_string();
    assert!(cookie.starts_with("jwt="));
    assert!(cookie.contains("HttpOnly"));
    assert!(cookie.contains("Max-Age=86400"));

    let body = body_json(response).await;
    assert_eq!(body["token_type"], "Bearer");
    assert_eq!(body["expires_at"], START + 24 * 60 * 60);
    let token = body["token"].as_str().unwrap();
    assert!(cookie.contains(token));
}

#[tokio::test]
async fn test_form_login_is_accepted() {
    let (state, _clock) = setup_test_state(test_settings());
    let app = router::create_router(state);

    let request = Request::builder()
        .method(Method::POST)
        .uri("/login")
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from("email=a%40b.com&password=pw1"))
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_bad_credentials_get_identical_responses() {
    let (state, _clock) = setup_test_state(test_settings());
    let app = router::create_router(state);

    let wrong = app.clone().oneshot(json_login("a@b.com", "pw2")).await.unwrap();
    let unknown = app.oneshot(json_login("ghost@b.com", "pw1")).await.unwrap();

    assert_eq!(wrong.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(unknown.status(), StatusCode::UNAUTHORIZED);
    assert!(wrong.headers().get(header::SET_COOKIE).is_none());

    let wrong = body_json(wrong).await;
    let unknown = body_json(unknown).await;
    assert_eq!(wrong, unknown);
    assert_eq!(wrong["error"]["code"], "AUTH_001");
    assert_eq!(wrong["error"]["message"], "Invalid credentials");
}

#[tokio::test]
async fn test_malformed_login_is_bad_request() {
    let (state, _clock) = setup_test_state(test_settings());
    let app = router::create_router(state);

    for request in [
        json_login("a@b.com", ""),
        json_login("not-an-email", "pw1"),
        Request::builder()
            .method(Method::POST)
            .uri("/login")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from("{not json"))
            .unwrap(),
    ] {
        let response = app.clone().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(response).await["error"]["code"], "VAL_001");
    }
}

#[tokio::test]
async fn test_me_with_cookie_and_bearer() {
    let (state, _clock) = setup_test_state(test_settings());
    let app = router::create_router(state);
    let token = login_token(&app).await;

    let response = app
        .clone()
        .oneshot(get_with("/me", header::COOKIE, format!("jwt={token}")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["subject"], 7);
    assert_eq!(body["issued_at"], START);
    assert_eq!(body["claims"]["role"], "admin");

    let response = app
        .oneshot(get_with("/me", header::AUTHORIZATION, format!("Bearer {token}")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_me_requires_valid_unexpired_token() {
    let (state, clock) = setup_test_state(test_settings());
    let app = router::create_router(state);

    let response = app.clone().oneshot(get_plain("/me")).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(body_json(response).await["error"]["code"], "AUTH_002");

    let token = login_token(&app).await;
    clock.advance(Duration::from_secs(24 * 60 * 60));

    let response = app
        .oneshot(get_with("/me", header::COOKIE, format!("jwt={token}")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_unsigned_token_is_rejected_at_the_edge() {
    let (state, _clock) = setup_test_state(test_settings());
    let app = router::create_router(state);
    let token = login_token(&app).await;

    // Keep the payload, swap in an "alg: none" header and drop the signature.
    let payload = token.split('.').nth(1).unwrap();
    let forged = format!("eyJhbGciOiJub25lIiwidHlwIjoiSldUIn0.{payload}.");

    let response = app
        .oneshot(get_with("/me", header::COOKIE, format!("jwt={forged}")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_logout_clears_cookie() {
    let (state, _clock) = setup_test_state(test_settings());
    let app = router::create_router(state);

    let response = app.oneshot(get_plain("/logout")).await.unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    let cookie = response.headers().get(header::SET_COOKIE).unwrap();
    assert!(cookie.to_str().unwrap().starts_with("jwt=;"));
    assert!(cookie.to_str().unwrap().contains("Max-Age=0"));
}

#[tokio::test]
async fn test_login_redirect_mode() {
    let mut settings = test_settings();
    settings.auth.login_redirect = Some("/login".to_string());
    let (state, _clock) = setup_test_state(settings);
    let app = router::create_router(state);

    let response = app.clone().oneshot(get_plain("/me")).await.unwrap();
    assert_eq!(response.status(), StatusCode::FOUND);
    assert_eq!(response.headers().get(header::LOCATION).unwrap(), "/login");

    let response = app.oneshot(get_plain("/logout")).await.unwrap();
    assert_eq!(response.status(), StatusCode::FOUND);
    assert_eq!(response.headers().get(header::LOCATION).unwrap(), "/login");
}

#[tokio::test]
async fn test_caller_routes_are_gated() {
    let (state, _clock) = setup_test_state(test_settings());
    let protected: Router<Arc<AppState>> = Router::new().route("/calendar", get(|| async { "events" }));
    let app = router::create_router_with(state, protected);

    let response = app.clone().oneshot(get_plain("/calendar")).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let token = login_token(&app).await;
    let response = app
        .clone()
        .oneshot(get_with("/calendar", header::COOKIE, format!("jwt={token}")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app.oneshot(get_plain("/health")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}
