//! Redis-backed store adapter for the password-reset engine
//!
//! Key layout:
//! - `reset:token:{hash}` - token hash resolving to the owning email
//! - `reset:cooldown:{email}` - request cooldown marker
//! - `reset:rate:{email}` - sliding request counter
//!
//! The token itself never reaches Redis, only its keyed hash.

use std::time::Duration;

use async_trait::async_trait;
use tracing::debug;

use sg_core::services::reset::ResetStore;
use sg_shared::utils::email;

use super::redis_client::RedisClient;

const TOKEN_KEY_PREFIX: &str = "reset:token:";
const COOLDOWN_KEY_PREFIX: &str = "reset:cooldown:";
const RATE_KEY_PREFIX: &str = "reset:rate:";

/// Redis implementation of the reset engine's store seam
#[derive(Clone)]
pub struct ResetRedisStore {
    client: RedisClient,
}

impl ResetRedisStore {
    pub fn new(client: RedisClient) -> Self {
        Self { client }
    }

    fn token_key(hash: &str) -> String {
        format!("{}{}", TOKEN_KEY_PREFIX, hash)
    }

    fn cooldown_key(email: &str) -> String {
        format!("{}{}", COOLDOWN_KEY_PREFIX, email)
    }

    fn rate_key(email: &str) -> String {
        format!("{}{}", RATE_KEY_PREFIX, email)
    }
}

#[async_trait]
impl ResetStore for ResetRedisStore {
    async fn set_token(&self, hash: &str, email: &str, ttl: Duration) -> Result<(), String> {
        debug!(email = %email::mask(email), "storing reset token hash");
        self.client
            .set_with_expiry(&Self::token_key(hash), email, ttl.as_secs())
            .await
            .map_err(|e| e.to_string())
    }

    async fn email_by_token(&self, hash: &str) -> Result<Option<String>, String> {
        self.client
            .get(&Self::token_key(hash))
            .await
            .map_err(|e| e.to_string())
    }

    async fn delete_token(&self, hash: &str) -> Result<(), String> {
        self.client
            .delete(&Self::token_key(hash))
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_layout() {
        assert_eq!(
            ResetRedisStore::token_key("abc123"),
            "reset:token:abc123"
        );
        assert_eq!(
            ResetRedisStore::cooldown_key("user@test.com"),
            "reset:cooldown:user@test.com"
        );
        assert_eq!(
            ResetRedisStore::rate_key("user@test.com"),
            "reset:rate:user@test.com"
        );
    }
}
