//! Redis-backed store adapter for the OTP engine
//!
//! Key layout, all under the normalized email:
//! - `otp:register:{email}` - hashed active code
//! - `otp:attempt:{email}` - failed-verification counter
//! - `otp:cooldown:{email}` - resend cooldown marker
//! - `otp:rate:{email}` - sliding send counter

use std::time::Duration;

use async_trait::async_trait;
use tracing::debug;

use sg_core::services::otp::OtpStore;
use sg_shared::utils::email;

use super::redis_client::RedisClient;

const CODE_KEY_PREFIX: &str = "otp:register:";
const ATTEMPT_KEY_PREFIX: &str = "otp:attempt:";
const COOLDOWN_KEY_PREFIX: &str = "otp:cooldown:";
const RATE_KEY_PREFIX: &str = "otp:rate:";

/// Redis implementation of the OTP engine's store seam
#[derive(Clone)]
pub struct OtpRedisStore {
    client: RedisClient,
}

impl OtpRedisStore {
    pub fn new(client: RedisClient) -> Self {
        Self { client }
    }

    fn code_key(email: &str) -> String {
        format!("{}{}", CODE_KEY_PREFIX, email)
    }

    fn attempt_key(email: &str) -> String {
        format!("{}{}", ATTEMPT_KEY_PREFIX, email)
    }

    fn cooldown_key(email: &str) -> String {
        format!("{}{}", COOLDOWN_KEY_PREFIX, email)
    }

    fn rate_key(email: &str) -> String {
        format!("{}{}", RATE_KEY_PREFIX, email)
    }
}

#[async_trait]
impl OtpStore for OtpRedisStore {
    async fn set_code(&self, email: &str, hashed: &str, ttl: Duration) -> Result<(), String> {
        debug!(email = %email::mask(email), "storing hashed OTP code");
        self.client
            .set_with_expiry(&Self::code_key(email), hashed, ttl.as_secs())
            .await
            .map_err(|e| e.to_string())
    }

    async fn get_code(&self, email: &str) -> Result<Option<String>, String> {
        self.client
            .get(&Self::code_key(email))
            .await
            .map_err(|e| e.to_string())
    }

    async fn delete_code(&self, email: &str) -> Result<(), String> {
        self.client
            .delete(&Self::code_key(email))
            .await
            .map(|_| ())
            .map_err(|e| e.to_string())
    }

    async fn increment_attempts(&self, email: &str, ttl: Duration) -> Result<u64, String> {
        let count = self
            .client
            .increment(&Self::attempt_key(email), Some(ttl.as_secs()))
            .await
            .map_err(|e| e.to_string())?;
        Ok(count.max(0) as u64)
    }

    async fn attempt_count(&self, email: &str) -> Result<u64, String> {
        let stored = self
            .client
            .get(&Self::attempt_key(email))
            .await
            .map_err(|e| e.to_string())?;
        Ok(stored.and_then(|v| v.parse::<u64>().ok()).unwrap_or(0))
    }

    async fn clear_attempts(&self, email: &str) -> Result<(), String> {
        self.client
            .delete(&Self::attempt_key(email))
            .await
            .map(|_| ())
            .map_err(|e| e.to_string())
    }

    async fn set_cooldown(&self, email: &str, ttl: Duration) -> Result<(), String> {
        self.client
            .set_with_expiry(&Self::cooldown_key(email), "1", ttl.as_secs())
            .await
            .map_err(|e| e.to_string())
    }

    async fn cooldown_ttl(&self, email: &str) -> Result<Duration, String> {
        let ttl = self
            .client
            .ttl(&Self::cooldown_key(email))
            .await
            .map_err(|e| e.to_string())?;
        Ok(Duration::from_secs(ttl.unwrap_or(0).max(0) as u64))
    }

    async fn clear_cooldown(&self, email: &str) -> Result<(), String> {
        self.client
            .delete(&Self::cooldown_key(email))
            .await
            .map(|_| ())
            .map_err(|e| e.to_string())
    }

    async fn increment_send_count(
        &self,
        email: &str,
        window: Duration,
    ) -> Result<(u64, Duration), String> {
        let key = Self::rate_key(email);
        let count = self
            .client
            .increment(&key, Some(window.as_secs()))
            .await
            .map_err(|e| e.to_string())?;
        let remaining = self.client.ttl(&key).await.map_err(|e| e.to_string())?;
        Ok((
            count.max(0) as u64,
            Duration::from_secs(remaining.unwrap_or(0).max(0) as u64),
        ))
    }

    async fn clear_send_count(&self, email: &str) -> Result<(), String> {
        self.client
            .delete(&Self::rate_key(email))
            .await
            .map(|_| ())
            .map_err(|e| e.to_string())
    }
}
