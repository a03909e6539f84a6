//! Domain-specific error types and error handling.

use std::fmt;
use std::time::Duration;

use thiserror::Error;

/// Why a send was throttled
///
/// Callers branch on this discriminant to build their retry messaging;
/// both variants are recoverable by waiting out `retry_after`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThrottleReason {
    /// A previous send is still inside its minimum spacing window
    Cooldown,
    /// The sliding send counter for the identity is over its limit
    RateLimit,
}

impl fmt::Display for ThrottleReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ThrottleReason::Cooldown => write!(f, "cooldown"),
            ThrottleReason::RateLimit => write!(f, "rate_limit"),
        }
    }
}

/// Core domain errors for the secret-lifecycle engines
///
/// Domain failures are always one of the named kinds; store transport
/// failures travel in `Store` with a short operation tag and are never
/// reclassified, so callers can tell infrastructure trouble from a
/// legitimately rejected request.
#[derive(Error, Debug)]
pub enum DomainError {
    /// Identifier was empty after normalization
    #[error("invalid or empty identifier")]
    InvalidInput,

    /// Send rejected by the cooldown or rate-limit layer
    #[error("throttled ({reason}), retry after {retry_after:?}")]
    Throttled {
        reason: ThrottleReason,
        retry_after: Duration,
    },

    /// Service wiring is incomplete (e.g. no hashing secret)
    #[error("service is not configured")]
    NotConfigured,

    /// The delivery gateway rejected the message; engine state was
    /// rolled back where the flow requires it, so the caller may simply
    /// issue a new request
    #[error("delivery failed")]
    DeliveryFailed,

    /// Wrong code, or a wrong/expired/unknown token. Deliberately
    /// undifferentiated to avoid handing an enumeration oracle to the
    /// caller.
    #[error("verification failed")]
    VerificationFailed,

    /// Store transport failure, tagged with the operation that hit it
    #[error("{op}: {detail}")]
    Store { op: &'static str, detail: String },
}

pub type DomainResult<T> = Result<T, DomainError>;

impl DomainError {
    /// Helper for wrapping a store transport failure with its operation tag
    pub(crate) fn store(op: &'static str, detail: String) -> Self {
        DomainError::Store { op, detail }
    }
}
