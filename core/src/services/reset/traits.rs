//! Trait seams between the reset engine and its collaborators

use std::time::Duration;

use async_trait::async_trait;

/// Expiring-store operations the reset engine relies on
///
/// Token records are keyed by the token hash and resolve to the owning
/// email; cooldown and rate records are keyed by the normalized email.
/// Absent records are a valid empty state, never an error. Counter
/// increments must be atomic under concurrent callers.
#[async_trait]
pub trait ResetStore: Send + Sync {
    /// Map a token hash to its email for `ttl`
    async fn set_token(&self, hash: &str, email: &str, ttl: Duration) -> Result<(), String>;
    /// Resolve a token hash; `None` when unknown or expired
    async fn email_by_token(&self, hash: &str) -> Result<Option<String>, String>;
    /// Delete a token record; deleting an absent record is not an error
    async fn delete_token(&self, hash: &str) -> Result<(), String>;

    /// Arm the request cooldown marker
    async fn set_cooldown(&self, email: &str, ttl: Duration) -> Result<(), String>;
    /// Remaining cooldown; zero when no marker is present
    async fn cooldown_ttl(&self, email: &str) -> Result<Duration, String>;
    /// Drop the cooldown marker
    async fn clear_cooldown(&self, email: &str) -> Result<(), String>;

    /// Atomically bump the send counter, arming `window` as TTL on first
    /// increment; returns the new count and the remaining window
    async fn increment_send_count(
        &self,
        email: &str,
        window: Duration,
    ) -> Result<(u64, Duration), String>;
    /// Drop the send counter
    async fn clear_send_count(&self, email: &str) -> Result<(), String>;
}

/// Delivery gateway for password-reset mail
#[async_trait]
pub trait ResetMailer: Send + Sync {
    /// Send the plaintext token and its reset link to the destination;
    /// `reset_url` is empty when no link template is configured and `ttl`
    /// is the token lifetime, for display in the message
    async fn send_password_reset(
        &self,
        to: &str,
        token: &str,
        app_name: &str,
        reset_url: &str,
        ttl: Duration,
    ) -> Result<(), String>;
}
