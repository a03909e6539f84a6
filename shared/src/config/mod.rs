//! Configuration module
//!
//! Configuration types for the external collaborators:
//! - `cache` - Redis connection settings
//! - `smtp` - SMTP delivery credentials and subjects
//!
//! Service-level settings (TTLs, throttle windows, hashing secrets) live
//! next to the services that consume them in `sg_core`.

pub mod cache;
pub mod smtp;

pub use cache::CacheConfig;
pub use smtp::SmtpConfig;

/// Environment variable helpers shared by the `from_env` constructors.
pub mod env {
    use std::time::Duration;

    /// Read a duration given as integer seconds, falling back on missing
    /// or unparseable values.
    pub fn duration_secs(key: &str, default_secs: u64) -> Duration {
        let secs = std::env::var(key)
            .ok()
            .and_then(|v| v.trim().parse::<u64>().ok())
            .unwrap_or(default_secs);
        Duration::from_secs(secs)
    }

    /// Read an unsigned integer variable with a default.
    pub fn u32_var(key: &str, default: u32) -> u32 {
        std::env::var(key)
            .ok()
            .and_then(|v| v.trim().parse::<u32>().ok())
            .unwrap_or(default)
    }

    /// Read a trimmed string variable with a default.
    pub fn string_var(key: &str, default: &str) -> String {
        match std::env::var(key) {
            Ok(v) if !v.trim().is_empty() => v.trim().to_string(),
            _ => default.to_string(),
        }
    }

}
