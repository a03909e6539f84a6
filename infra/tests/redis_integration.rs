//! Integration tests for the Redis-backed secret store
//!
//! These tests require a running Redis instance to execute.
//! Run with: cargo test -p sg_infra --test redis_integration -- --ignored

use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;

use sg_core::services::otp::{OtpConfig, OtpMailer, OtpService, OtpStore};
use sg_core::services::reset::{ResetConfig, ResetMailer, ResetService, ResetStore};
use sg_infra::cache::{CacheConfig, OtpRedisStore, RedisClient, ResetRedisStore};

async fn client() -> RedisClient {
    let config = CacheConfig::from_env();
    RedisClient::new(config).await.expect("Failed to connect to Redis")
}

/// Capture delivered secrets instead of relaying them
#[derive(Default)]
struct RecordingMailer {
    secrets: Mutex<Vec<String>>,
}

impl RecordingMailer {
    fn last(&self) -> Option<String> {
        self.secrets.lock().unwrap().last().cloned()
    }
}

#[async_trait]
impl OtpMailer for RecordingMailer {
    async fn send_otp(&self, _to: &str, code: &str, _app_name: &str) -> Result<(), String> {
        self.secrets.lock().unwrap().push(code.to_string());
        Ok(())
    }
}

#[async_trait]
impl ResetMailer for RecordingMailer {
    async fn send_password_reset(
        &self,
        _to: &str,
        token: &str,
        _app_name: &str,
        _reset_url: &str,
        _ttl: Duration,
    ) -> Result<(), String> {
        self.secrets.lock().unwrap().push(token.to_string());
        Ok(())
    }
}

#[tokio::test]
#[ignore] // Requires Redis server
async fn test_client_set_get_delete() {
    let client = client().await;
    let key = "test:sendguard:roundtrip";

    client.set_with_expiry(key, "value", 60).await.unwrap();
    assert_eq!(client.get(key).await.unwrap(), Some("value".to_string()));

    assert!(client.delete(key).await.unwrap());
    assert_eq!(client.get(key).await.unwrap(), None);
    // Deleting an absent key is not an error.
    assert!(!client.delete(key).await.unwrap());
}

#[tokio::test]
#[ignore] // Requires Redis server
async fn test_client_increment_sets_ttl_once() {
    let client = client().await;
    let key = "test:sendguard:counter";
    let _ = client.delete(key).await;

    assert_eq!(client.increment(key, Some(60)).await.unwrap(), 1);
    assert_eq!(client.increment(key, Some(60)).await.unwrap(), 2);

    let ttl = client.ttl(key).await.unwrap().expect("counter has a TTL");
    assert!(ttl > 0 && ttl <= 60);

    let _ = client.delete(key).await;
}

#[tokio::test]
#[ignore] // Requires Redis server
async fn test_client_ttl_of_absent_key_is_none() {
    let client = client().await;
    assert_eq!(client.ttl("test:sendguard:absent").await.unwrap(), None);
}

#[tokio::test]
#[ignore] // Requires Redis server
async fn test_otp_engine_against_redis() {
    let store = Arc::new(OtpRedisStore::new(client().await));
    let mailer = Arc::new(RecordingMailer::default());
    let config = OtpConfig {
        cooldown: Duration::ZERO,
        ..OtpConfig::default()
    };
    let svc = OtpService::new(store.clone(), mailer.clone(), config);

    let email = "integration-otp@test.com";
    let _ = store.clear_send_count(email).await;
    let _ = store.delete_code(email).await;
    let _ = store.clear_attempts(email).await;

    svc.send_register_otp(email, None).await.unwrap();
    let code = mailer.last().expect("code delivered");

    svc.verify_register_otp(email, &code).await.unwrap();
    assert!(svc.verify_register_otp(email, &code).await.is_err());

    let _ = store.clear_send_count(email).await;
}

#[tokio::test]
#[ignore] // Requires Redis server
async fn test_reset_engine_against_redis() {
    let store = Arc::new(ResetRedisStore::new(client().await));
    let mailer = Arc::new(RecordingMailer::default());
    let config = ResetConfig {
        cooldown: Duration::ZERO,
        ..ResetConfig::default()
    };
    let svc = ResetService::new(store.clone(), mailer.clone(), config);

    let email = "integration-reset@test.com";
    let _ = store.clear_send_count(email).await;
    let _ = store.clear_cooldown(email).await;

    svc.request_reset(email, None).await.unwrap();
    let token = mailer.last().expect("token delivered");

    assert_eq!(svc.verify_reset(&token).await.unwrap(), email);
    assert!(svc.verify_reset(&token).await.is_err());
}
