//! OTP engine implementation

use std::sync::Arc;
use std::time::Duration;

use sg_shared::utils::email;
use tracing::{info, warn};

use crate::errors::{DomainError, DomainResult, ThrottleReason};
use crate::services::secret;

use super::config::OtpConfig;
use super::traits::{OtpMailer, OtpStore};

/// Registration OTP engine
///
/// Each call is a short sequence of independent store round-trips; there
/// is no in-process locking. Two concurrent sends for the same email can
/// both pass the cooldown check before either arms the marker, issuing
/// two codes in a narrow window. That race is accepted as bounded-impact
/// rather than guarded with a distributed lock: the second code simply
/// overwrites the first.
pub struct OtpService<S: OtpStore, M: OtpMailer> {
    store: Arc<S>,
    mailer: Arc<M>,
    config: OtpConfig,
}

impl<S: OtpStore, M: OtpMailer> OtpService<S, M> {
    /// Create a new OTP engine over a store and a delivery gateway
    pub fn new(store: Arc<S>, mailer: Arc<M>, config: OtpConfig) -> Self {
        Self {
            store,
            mailer,
            config,
        }
    }

    /// Issue and deliver a registration code
    ///
    /// Throttle layers run first: an armed cooldown marker rejects the
    /// send outright, then the sliding send counter is incremented and
    /// checked. A rejected send keeps its slot in the rate window; the
    /// increment is deliberately not undone.
    ///
    /// `app_name` overrides the configured display name for this request.
    ///
    /// A delivery failure leaves the freshly stored hash and cooldown in
    /// place: the plaintext never left the process, the hash cannot be
    /// guessed, and both expire on their own.
    pub async fn send_register_otp(
        &self,
        email: &str,
        app_name: Option<&str>,
    ) -> DomainResult<()> {
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
                event = "otp_send_throttled",
                "OTP send rejected by cooldown"
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
                    event = "otp_send_throttled",
                    "OTP send rejected by rate limit"
                );
                return Err(DomainError::Throttled {
                    reason: ThrottleReason::RateLimit,
                    retry_after,
                });
            }
        }

        let code = secret::generate_otp_code();
        let hashed = secret::hash_secret(&code, &self.config.secret);

        self.store
            .set_code(&email, &hashed, self.config.ttl)
            .await
            .map_err(|detail| DomainError::store("store code", detail))?;

        // A fresh code starts with a clean attempt ledger.
        if let Err(detail) = self.store.clear_attempts(&email).await {
            warn!(
                email = %email::mask(&email),
                error = %detail,
                "failed to clear attempt counter for fresh code"
            );
        }

        if self.config.cooldown > Duration::ZERO {
            self.store
                .set_cooldown(&email, self.config.cooldown)
                .await
                .map_err(|detail| DomainError::store("set cooldown", detail))?;
        }

        let app_name = app_name.unwrap_or(&self.config.app_name);
        if let Err(error) = self.mailer.send_otp(&email, &code, app_name).await {
            warn!(
                email = %email::mask(&email),
                error = %error,
                event = "otp_delivery_failed",
                "OTP delivery failed; stored hash left to expire"
            );
            return Err(DomainError::DeliveryFailed);
        }

        info!(
            email = %email::mask(&email),
            event = "otp_sent",
            "registration OTP issued and delivered"
        );
        Ok(())
    }

    /// Verify a registration code, consuming it on success
    ///
    /// The attempt counter is incremented before the comparison so that
    /// every call burns an attempt, whatever the outcome. Not-found and
    /// mismatch both surface as `VerificationFailed`; the caller learns
    /// nothing about which check failed.
    pub async fn verify_register_otp(&self, email: &str, code: &str) -> DomainResult<()> {
        let email = email::normalize(email);
        if email.is_empty() {
            return Err(DomainError::InvalidInput);
        }
        if self.config.secret.is_empty() {
            return Err(DomainError::NotConfigured);
        }

        let stored = self
            .store
            .get_code(&email)
            .await
            .map_err(|detail| DomainError::store("get code", detail))?;
        let stored_hash = match stored {
            Some(hash) => hash,
            None => {
                warn!(
                    email = %email::mask(&email),
                    event = "otp_verify_failed",
                    "no active code for email"
                );
                return Err(DomainError::VerificationFailed);
            }
        };

        let attempts = self
            .store
            .increment_attempts(&email, self.config.ttl)
            .await
            .map_err(|detail| DomainError::store("count attempt", detail))?;

        if !secret::verify_secret(code, &stored_hash, &self.config.secret) {
            warn!(
                email = %email::mask(&email),
                attempts,
                event = "otp_verify_failed",
                "code mismatch"
            );
            return Err(DomainError::VerificationFailed);
        }

        // Consumed. Leftover state is cleanup, not an outcome.
        if let Err(detail) = self.store.delete_code(&email).await {
            warn!(
                email = %email::mask(&email),
                error = %detail,
                "failed to delete consumed code"
            );
        }
        if let Err(detail) = self.store.clear_attempts(&email).await {
            warn!(
                email = %email::mask(&email),
                error = %detail,
                "failed to clear attempt counter"
            );
        }

        info!(
            email = %email::mask(&email),
            event = "otp_verified",
            "registration OTP verified and consumed"
        );
        Ok(())
    }

    /// Failed-verification count for an email, 0 when no counter exists
    ///
    /// Lockout policy (how many failures are too many) belongs to the
    /// caller; the engine only counts.
    pub async fn failed_attempts(&self, email: &str) -> DomainResult<u64> {
        let email = email::normalize(email);
        if email.is_empty() {
            return Err(DomainError::InvalidInput);
        }
        self.store
            .attempt_count(&email)
            .await
            .map_err(|detail| DomainError::store("read attempts", detail))
    }
}
