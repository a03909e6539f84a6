//! Password-reset engine implementation

use std::sync::Arc;
use std::time::Duration;

use sg_shared::utils::email;
use tracing::{info, warn};

use crate::errors::{DomainError, DomainResult, ThrottleReason};
use crate::services::secret;

use super::config::ResetConfig;
use super::traits::{ResetMailer, ResetStore};

/// Password-reset engine
///
/// Same throttle layering as the OTP engine, but with strict unwind on
/// every failure past the token write: a reset token is a complete
/// bearer credential, so one that never reached its owner must not stay
/// redeemable.
pub struct ResetService<S: ResetStore, M: ResetMailer> {
    store: Arc<S>,
    mailer: Arc<M>,
    config: ResetConfig,
}

impl<S: ResetStore, M: ResetMailer> ResetService<S, M> {
    /// Create a new reset engine over a store and a delivery gateway
    pub fn new(store: Arc<S>, mailer: Arc<M>, config: ResetConfig) -> Self {
        Self {
            store,
            mailer,
            config,
        }
    }

    /// Issue and deliver a password-reset token
    ///
    /// Write order is token record first, then cooldown marker, then
    /// delivery. Each failure unwinds everything written before it
    /// (best-effort, failures logged); only the rate-counter slot of a
    /// throttled request is intentionally kept.
    pub async fn request_reset(&self, email: &str, app_name: Option<&str>) -> DomainResult<()> {
        let email = email::normalize(email);
        if email.is_empty() {
            return Err(DomainError::InvalidInput);
        }
        if self.config.secret.is_empty() {
            return Err(DomainError::NotConfigured);
        }

        let remaining = self
            .store
            .cooldown_ttl(&email)
            .await
            .map_err(|detail| DomainError::store("check cooldown", detail))?;
        if remaining > Duration::ZERO {
            warn!(
                email = %email::mask(&email),
                retry_after_secs = remaining.as_secs(),
                event = "reset_request_throttled",
                "reset request rejected by cooldown"
            );
            return Err(DomainError::Throttled {
                reason: ThrottleReason::Cooldown,
                retry_after: remaining,
            });
        }

        if self.config.rate_limit > 0 && self.config.rate_window > Duration::ZERO {
            let (count, retry_after) = self
                .store
                .increment_send_count(&email, self.config.rate_window)
                .await
                .map_err(|detail| DomainError::store("rate limit", detail))?;
            if count > u64::from(self.config.rate_limit) {
                warn!(
                    email = %email::mask(&email),
                    count,
                    limit = self.config.rate_limit,
                    event = "reset_request_throttled",
                    "reset request rejected by rate limit"
                );
                return Err(DomainError::Throttled {
                    reason: ThrottleReason::RateLimit,
                    retry_after,
                });
            }
        }

        let token = secret::generate_reset_token();
        let hash = secret::hash_secret(&token, &self.config.secret);

        if let Err(detail) = self.store.set_token(&hash, &email, self.config.ttl).await {
            self.clear_send_count_logged(&email).await;
            return Err(DomainError::store("store token", detail));
        }

        if self.config.cooldown > Duration::ZERO {
            if let Err(detail) = self.store.set_cooldown(&email, self.config.cooldown).await {
                self.delete_token_logged(&hash, &email).await;
                self.clear_send_count_logged(&email).await;
                return Err(DomainError::store("set cooldown", detail));
            }
        }

        let reset_url = build_reset_url(&self.config.url_template, &token);
        let app_name = app_name.unwrap_or(&self.config.app_name);
        if let Err(error) = self
            .mailer
            .send_password_reset(&email, &token, app_name, &reset_url, self.config.ttl)
            .await
        {
            warn!(
                email = %email::mask(&email),
                error = %error,
                event = "reset_delivery_failed",
                "reset delivery failed; unwinding issued token"
            );
            self.delete_token_logged(&hash, &email).await;
            self.clear_cooldown_logged(&email).await;
            self.clear_send_count_logged(&email).await;
            return Err(DomainError::DeliveryFailed);
        }

        info!(
            email = %email::mask(&email),
            event = "reset_requested",
            "reset token issued and delivered"
        );
        Ok(())
    }

    /// Consume a reset token, resolving the email it was issued for
    ///
    /// Single-use: a hit deletes the record and clears the email's
    /// throttle state so the owner can immediately request a fresh token
    /// if needed. Unknown and expired tokens are indistinguishable to the
    /// caller.
    pub async fn verify_reset(&self, token: &str) -> DomainResult<String> {
        if self.config.secret.is_empty() {
            return Err(DomainError::NotConfigured);
        }
        let token = token.trim();
        if token.is_empty() {
            return Err(DomainError::VerificationFailed);
        }

        let hash = secret::hash_secret(token, &self.config.secret);
        let resolved = self
            .store
            .email_by_token(&hash)
            .await
            .map_err(|detail| DomainError::store("get token", detail))?;
        let email = match resolved {
            Some(email) => email,
            None => {
                warn!(event = "reset_verify_failed", "unknown or expired token");
                return Err(DomainError::VerificationFailed);
            }
        };

        self.delete_token_logged(&hash, &email).await;
        self.clear_cooldown_logged(&email).await;
        self.clear_send_count_logged(&email).await;

        info!(
            email = %email::mask(&email),
            event = "reset_consumed",
            "reset token verified and consumed"
        );
        Ok(email)
    }

    /// Best-effort delete of a token record that must not stay live
    async fn delete_token_logged(&self, hash: &str, email: &str) {
        if let Err(detail) = self.store.delete_token(hash).await {
            warn!(
                email = %email::mask(email),
                error = %detail,
                "failed to delete token record"
            );
        }
    }

    async fn clear_cooldown_logged(&self, email: &str) {
        if let Err(detail) = self.store.clear_cooldown(email).await {
            warn!(
                email = %email::mask(email),
                error = %detail,
                "failed to clear cooldown marker"
            );
        }
    }

    async fn clear_send_count_logged(&self, email: &str) {
        if let Err(detail) = self.store.clear_send_count(email).await {
            warn!(
                email = %email::mask(email),
                error = %detail,
                "failed to clear send counter"
            );
        }
    }
}

/// Build the user-facing reset URL from the configured template
///
/// `{token}` placeholders are substituted; templates without one get the
/// token appended as a query parameter. No template means no URL: the
/// mail then carries the raw token.
pub(crate) fn build_reset_url(template: &str, token: &str) -> String {
    if template.is_empty() {
        return String::new();
    }
    if template.contains("{token}") {
        return template.replace("{token}", token);
    }
    if template.contains('?') {
        return format!("{}&token={}", template, token);
    }
    format!("{}?token={}", template, token)
}
