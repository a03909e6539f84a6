//! Configuration for the password-reset engine

use std::time::Duration;

use sg_shared::config::env;

/// Configuration for the password-reset engine
#[derive(Debug, Clone)]
pub struct ResetConfig {
    /// Lifetime of an issued token
    pub ttl: Duration,
    /// Minimum spacing between two requests for the same email
    pub cooldown: Duration,
    /// Maximum requests per rate window; 0 disables the sliding counter
    pub rate_limit: u32,
    /// Length of the sliding rate window; zero disables the counter
    pub rate_window: Duration,
    /// Service secret keying the stored token hash
    pub secret: String,
    /// Reset link template; `{token}` is substituted, otherwise the token
    /// is appended as a query parameter. Empty means "mail the raw token".
    pub url_template: String,
    /// Display name used in delivered mail unless overridden per request
    pub app_name: String,
}

impl Default for ResetConfig {
    fn default() -> Self {
        let ttl = Duration::from_secs(900);
        Self {
            ttl,
            cooldown: Duration::from_secs(60),
            rate_limit: 5,
            rate_window: ttl,
            secret: "reset-secret".to_string(),
            url_template: String::new(),
            app_name: "YourApp".to_string(),
        }
    }
}

impl ResetConfig {
    /// Load from `RESET_*` environment variables, with the rate window
    /// defaulting to the token TTL and `RESET_URL` accepted as a legacy
    /// alias for the link template.
    pub fn from_env() -> Self {
        let ttl = env::duration_secs("RESET_TTL", 900);
        let url_template = match env::string_var("RESET_URL_TEMPLATE", "") {
            template if !template.is_empty() => template,
            _ => env::string_var("RESET_URL", ""),
        };
        Self {
            ttl,
            cooldown: env::duration_secs("RESET_COOLDOWN", 60),
            rate_limit: env::u32_var("RESET_RATE_LIMIT", 5),
            rate_window: env::duration_secs("RESET_RATE_WINDOW", ttl.as_secs()),
            secret: env::string_var("RESET_SECRET", "reset-secret"),
            url_template,
            app_name: env::string_var("APP_NAME", "YourApp"),
        }
    }
}
