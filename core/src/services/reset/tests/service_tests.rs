//! Unit tests for the password-reset engine

use std::sync::Arc;
use std::time::Duration;

use crate::errors::{DomainError, ThrottleReason};
use crate::services::reset::service::build_reset_url;
use crate::services::reset::{ResetConfig, ResetService};

use super::mocks::{MockResetMailer, MockResetStore};

fn config_without_cooldown() -> ResetConfig {
    ResetConfig {
        cooldown: Duration::ZERO,
        ..ResetConfig::default()
    }
}

fn service(
    store: Arc<MockResetStore>,
    mailer: Arc<MockResetMailer>,
    config: ResetConfig,
) -> ResetService<MockResetStore, MockResetMailer> {
    ResetService::new(store, mailer, config)
}

#[tokio::test]
async fn test_request_then_verify_resolves_email_once() {
    let store = Arc::new(MockResetStore::new());
    let mailer = Arc::new(MockResetMailer::new(false));
    let svc = service(store.clone(), mailer.clone(), ResetConfig::default());

    svc.request_reset(" User@Test.com", None).await.unwrap();
    let token = mailer.last_token("user@test.com").expect("token delivered");

    let email = svc.verify_reset(&token).await.unwrap();
    assert_eq!(email, "user@test.com");

    // Single use: the token record is gone.
    assert_eq!(store.token_count(), 0);
    let second = svc.verify_reset(&token).await;
    assert!(matches!(second, Err(DomainError::VerificationFailed)));
}

#[tokio::test]
async fn test_verify_trims_token_and_rejects_empty() {
    let store = Arc::new(MockResetStore::new());
    let mailer = Arc::new(MockResetMailer::new(false));
    let svc = service(store, mailer.clone(), ResetConfig::default());

    svc.request_reset("user@test.com", None).await.unwrap();
    let token = mailer.last_token("user@test.com").unwrap();

    let padded = format!("  {}  ", token);
    assert_eq!(svc.verify_reset(&padded).await.unwrap(), "user@test.com");

    let empty = svc.verify_reset("   ").await;
    assert!(matches!(empty, Err(DomainError::VerificationFailed)));
}

#[tokio::test]
async fn test_verify_clears_throttle_state() {
    let store = Arc::new(MockResetStore::new());
    let mailer = Arc::new(MockResetMailer::new(false));
    let svc = service(store.clone(), mailer.clone(), ResetConfig::default());

    svc.request_reset("user@test.com", None).await.unwrap();
    assert!(store.has_cooldown("user@test.com"));
    assert_eq!(store.send_count("user@test.com"), 1);

    let token = mailer.last_token("user@test.com").unwrap();
    svc.verify_reset(&token).await.unwrap();

    // Consumption frees the identity for an immediate fresh request.
    assert!(!store.has_cooldown("user@test.com"));
    assert_eq!(store.send_count("user@test.com"), 0);
    svc.request_reset("user@test.com", None).await.unwrap();
}

#[tokio::test]
async fn test_second_request_hits_cooldown() {
    let store = Arc::new(MockResetStore::new());
    let mailer = Arc::new(MockResetMailer::new(false));
    let svc = service(store, mailer, ResetConfig::default());

    svc.request_reset("user@test.com", None).await.unwrap();
    let result = svc.request_reset("user@test.com", None).await;

    match result {
        Err(DomainError::Throttled { reason, retry_after }) => {
            assert_eq!(reason, ThrottleReason::Cooldown);
            assert!(retry_after > Duration::ZERO);
        }
        other => panic!("expected cooldown throttle, got {:?}", other),
    }
}

#[tokio::test]
async fn test_third_request_hits_rate_limit_and_keeps_its_slot() {
    let store = Arc::new(MockResetStore::new());
    let mailer = Arc::new(MockResetMailer::new(false));
    let config = ResetConfig {
        rate_limit: 2,
        rate_window: Duration::from_secs(60),
        ..config_without_cooldown()
    };
    let svc = service(store.clone(), mailer, config);

    svc.request_reset("user@test.com", None).await.unwrap();
    svc.request_reset("user@test.com", None).await.unwrap();
    let third = svc.request_reset("user@test.com", None).await;

    match third {
        Err(DomainError::Throttled { reason, .. }) => {
            assert_eq!(reason, ThrottleReason::RateLimit);
        }
        other => panic!("expected rate-limit throttle, got {:?}", other),
    }
    assert_eq!(store.send_count("user@test.com"), 3);
}

#[tokio::test]
async fn test_delivery_failure_unwinds_everything() {
    let store = Arc::new(MockResetStore::new());
    let failing_mailer = Arc::new(MockResetMailer::new(true));
    let svc = service(store.clone(), failing_mailer, ResetConfig::default());

    let result = svc.request_reset("user@test.com", None).await;
    assert!(matches!(result, Err(DomainError::DeliveryFailed)));

    // The token that was never delivered must not be redeemable, and no
    // phantom throttle state may block the retry.
    assert_eq!(store.token_count(), 0);
    assert!(!store.has_cooldown("user@test.com"));
    assert_eq!(store.send_count("user@test.com"), 0);

    // A fresh request right away goes through.
    let working_mailer = Arc::new(MockResetMailer::new(false));
    let svc = service(store.clone(), working_mailer.clone(), ResetConfig::default());
    svc.request_reset("user@test.com", None).await.unwrap();
    let token = working_mailer.last_token("user@test.com").unwrap();
    assert_eq!(svc.verify_reset(&token).await.unwrap(), "user@test.com");
}

#[tokio::test]
async fn test_token_write_failure_clears_rate_slot() {
    let store = Arc::new(MockResetStore::new());
    let mailer = Arc::new(MockResetMailer::new(false));
    let svc = service(store.clone(), mailer, ResetConfig::default());

    store.fail_on("set_token");
    let result = svc.request_reset("user@test.com", None).await;

    match result {
        Err(DomainError::Store { op, .. }) => assert_eq!(op, "store token"),
        other => panic!("expected wrapped store error, got {:?}", other),
    }
    assert_eq!(store.send_count("user@test.com"), 0);
    assert!(!store.has_cooldown("user@test.com"));
}

#[tokio::test]
async fn test_cooldown_write_failure_unwinds_token() {
    let store = Arc::new(MockResetStore::new());
    let mailer = Arc::new(MockResetMailer::new(false));
    let svc = service(store.clone(), mailer, ResetConfig::default());

    store.fail_on("set_cooldown");
    let result = svc.request_reset("user@test.com", None).await;

    match result {
        Err(DomainError::Store { op, .. }) => assert_eq!(op, "set cooldown"),
        other => panic!("expected wrapped store error, got {:?}", other),
    }
    assert_eq!(store.token_count(), 0);
    assert_eq!(store.send_count("user@test.com"), 0);
}

#[tokio::test]
async fn test_reset_url_reaches_mailer() {
    let store = Arc::new(MockResetStore::new());
    let mailer = Arc::new(MockResetMailer::new(false));
    let config = ResetConfig {
        url_template: "https://example.com/reset/{token}".to_string(),
        ..ResetConfig::default()
    };
    let svc = service(store, mailer.clone(), config);

    svc.request_reset("user@test.com", None).await.unwrap();
    let sent = mailer.sent.lock().unwrap();
    assert_eq!(
        sent[0].reset_url,
        format!("https://example.com/reset/{}", sent[0].token)
    );
    assert_eq!(sent[0].ttl, Duration::from_secs(900));
}

#[tokio::test]
async fn test_app_name_override_reaches_mailer() {
    let store = Arc::new(MockResetStore::new());
    let mailer = Arc::new(MockResetMailer::new(false));
    let svc = service(store, mailer.clone(), ResetConfig::default());

    svc.request_reset("user@test.com", Some("Acme")).await.unwrap();
    assert_eq!(mailer.sent.lock().unwrap()[0].app_name, "Acme");
}

#[test]
fn test_build_reset_url_variants() {
    assert_eq!(build_reset_url("", "tok"), "");
    assert_eq!(
        build_reset_url("https://a.example/reset/{token}", "tok"),
        "https://a.example/reset/tok"
    );
    assert_eq!(
        build_reset_url("https://a.example/reset", "tok"),
        "https://a.example/reset?token=tok"
    );
    assert_eq!(
        build_reset_url("https://a.example/reset?lang=en", "tok"),
        "https://a.example/reset?lang=en&token=tok"
    );
}
