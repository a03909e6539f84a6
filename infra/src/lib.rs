//! # Infrastructure Layer
//!
//! This crate implements the infrastructure layer for SendGuard. It
//! provides the concrete collaborators the domain engines are wired to:
//!
//! - **Cache**: Redis-backed expiring secret store adapters
//! - **Mail**: SMTP delivery gateway for OTP and reset messages

/// Cache module - Redis client and store adapters
pub mod cache;

/// Mail module - SMTP delivery gateway
pub mod mail;

use sg_shared::CacheConfig;

use cache::{OtpRedisStore, RedisClient, ResetRedisStore};
use mail::SmtpMailer;

/// Infrastructure-specific error types
#[derive(Debug, thiserror::Error)]
pub enum InfrastructureError {
    /// Redis cache error
    #[error("Cache error: {0}")]
    Cache(#[from] redis::RedisError),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Mail delivery error
    #[error("Mail error: {0}")]
    Mail(String),
}

/// Bundled infrastructure collaborators for the two engines
pub struct Infrastructure {
    pub otp_store: OtpRedisStore,
    pub reset_store: ResetRedisStore,
    pub mailer: SmtpMailer,
}

/// Initialize infrastructure collaborators from the environment
///
/// Loads a `.env` file when present, connects the Redis client, and
/// builds the SMTP mailer. Both store adapters share one multiplexed
/// connection.
pub async fn initialize() -> Result<Infrastructure, InfrastructureError> {
    dotenvy::dotenv().ok();

    tracing::info!("Initializing infrastructure services...");

    let cache_config = CacheConfig::from_env();
    let client = RedisClient::new(cache_config).await?;
    let mailer = SmtpMailer::from_env()?;

    tracing::info!("Infrastructure services initialized");

    Ok(Infrastructure {
        otp_store: OtpRedisStore::new(client.clone()),
        reset_store: ResetRedisStore::new(client),
        mailer,
    })
}
