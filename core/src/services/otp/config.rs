//! Configuration for the OTP engine

use std::time::Duration;

use sg_shared::config::env;

/// Configuration for the OTP engine
#[derive(Debug, Clone)]
pub struct OtpConfig {
    /// Lifetime of an issued code (and of its attempt counter)
    pub ttl: Duration,
    /// Minimum spacing between two sends to the same email
    pub cooldown: Duration,
    /// Maximum sends per rate window; 0 disables the sliding counter
    pub rate_limit: u32,
    /// Length of the sliding rate window; zero disables the counter
    pub rate_window: Duration,
    /// Service secret keying the stored hash
    pub secret: String,
    /// Display name used in delivered mail unless overridden per request
    pub app_name: String,
}

impl Default for OtpConfig {
    fn default() -> Self {
        let ttl = Duration::from_secs(300);
        Self {
            ttl,
            cooldown: Duration::from_secs(60),
            rate_limit: 5,
            rate_window: ttl,
            secret: "otp-secret".to_string(),
            app_name: "YourApp".to_string(),
        }
    }
}

impl OtpConfig {
    /// Load from `OTP_*` environment variables, with the rate window
    /// defaulting to the code TTL.
    pub fn from_env() -> Self {
        let ttl = env::duration_secs("OTP_TTL", 300);
        Self {
            ttl,
            cooldown: env::duration_secs("OTP_COOLDOWN", 60),
            rate_limit: env::u32_var("OTP_RATE_LIMIT", 5),
            rate_window: env::duration_secs("OTP_RATE_WINDOW", ttl.as_secs()),
            secret: env::string_var("OTP_SECRET", "otp-secret"),
            app_name: env::string_var("APP_NAME", "YourApp"),
        }
    }
}
