use crate::test_utils::{scenario_store, FAST_SCHEME, START, TEST_SIGNING_KEY};
use gatekeeper::auth::{
    CredentialVerifier, ManualClock, SigningKey, Subject, TokenGuard, TokenIssuer,
    DEFAULT_TOKEN_TTL,
};
use gatekeeper::error::AuthError;
use jsonwebtoken::Algorithm;
use std::sync::Arc;
use std::time::Duration;

struct Core {
    verifier: CredentialVerifier,
    issuer: TokenIssuer,
    guard: TokenGuard,
    clock: Arc<ManualClock>,
}

fn core() -> Core {
    let key = SigningKey::new(TEST_SIGNING_KEY);
    let clock = Arc::new(ManualClock::new(START));
    Core {
        verifier: CredentialVerifier::new(Arc::new(scenario_store()), FAST_SCHEME),
        issuer: TokenIssuer::new(&key, Algorithm::HS256, DEFAULT_TOKEN_TTL)
            .unwrap()
            .with_clock(clock.clone()),
        guard: TokenGuard::new(&key).unwrap().with_clock(clock.clone()),
        clock,
    }
}

#[tokio::test]
async fn test_authenticate_issue_authorize_expire() {
    let core = core();

    let identity = core.verifier.authenticate("a@b.com", "pw1").await.unwrap();
    assert_eq!(identity.id, Subject::Id(7));

    let token = core.issuer.issue(&identity).unwrap();
    let claims = core.guard.authorize(&token).unwrap();
    assert_eq!(claims.sub, Subject::Id(7));
    assert_eq!(claims.extra["role"], "admin");

    core.clock.advance(Duration::from_secs(24 * 60 * 60 + 1));
    assert_eq!(
        core.guard.authorize(&token).unwrap_err(),
        AuthError::Unauthenticated
    );
}

#[tokio::test]
async fn test_failures_are_indistinguishable() {
    let core = core();

    let wrong_secret = core.verifier.authenticate("a@b.com", "pw2").await.unwrap_err();
    let unknown = core.verifier.authenticate("ghost@b.com", "pw1").await.unwrap_err();
    let empty = core.verifier.authenticate("", "").await.unwrap_err();

    assert_eq!(wrong_secret, AuthError::InvalidCredentials);
    assert_eq!(wrong_secret, unknown);
    assert_eq!(unknown, empty);
}

#[tokio::test]
async fn test_concurrent_logins_and_checks() {
    let core = Arc::new(core());

    let handles: Vec<_> = (0..16)
        .map(|i| {
            let core = core.clone();
            tokio::spawn(async move {
                let secret = if i % 2 == 0 { "pw1" } else { "nope" };
                match core.verifier.authenticate("a@b.com", secret).await {
                    Ok(identity) => {
                        let token = core.issuer.issue(&identity).unwrap();
                        core.guard.authorize(&token).is_ok()
                    }
                    Err(err) => {
                        assert_eq!(err, AuthError::InvalidCredentials);
                        false
                    }
                }
            })
        })
        .collect();

    let mut accepted = 0;
    for handle in handles {
        if handle.await.unwrap() {
            accepted += 1;
        }
    }
    assert_eq!(accepted, 8);
}
