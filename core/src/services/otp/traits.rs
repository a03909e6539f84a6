//! Trait seams between the OTP engine and its collaborators

use std::time::Duration;

use async_trait::async_trait;

/// Expiring-store operations the OTP engine relies on
///
/// Keys are derived from the normalized email by the implementation.
/// Absent records are a valid empty state (`Ok(None)` / zero TTL), never
/// an error. Counter increments must be atomic under concurrent callers;
/// the window TTL is applied when an increment lands on 1, and applying
/// it twice is harmless.
#[async_trait]
pub trait OtpStore: Send + Sync {
    /// Write (or overwrite) the hashed code for an email
    async fn set_code(&self, email: &str, hashed: &str, ttl: Duration) -> Result<(), String>;
    /// Fetch the stored hash; `None` when absent or expired
    async fn get_code(&self, email: &str) -> Result<Option<String>, String>;
    /// Delete the stored hash; deleting an absent record is not an error
    async fn delete_code(&self, email: &str) -> Result<(), String>;

    /// Atomically bump the failed-verification counter, arming `ttl` on
    /// first increment; returns the new count
    async fn increment_attempts(&self, email: &str, ttl: Duration) -> Result<u64, String>;
    /// Current attempt count, 0 when absent
    async fn attempt_count(&self, email: &str) -> Result<u64, String>;
    /// Drop the attempt counter
    async fn clear_attempts(&self, email: &str) -> Result<(), String>;

    /// Arm the resend cooldown marker
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

/// Delivery gateway for registration OTP mail
#[async_trait]
pub trait OtpMailer: Send + Sync {
    /// Send the plaintext code to its destination
    async fn send_otp(&self, to: &str, code: &str, app_name: &str) -> Result<(), String>;
}
