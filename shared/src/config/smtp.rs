//! SMTP delivery configuration module

use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::env;

const DEFAULT_SMTP_PORT: u16 = 587;

/// SMTP relay configuration for outbound secret delivery
///
/// Credentials are required; `from_env` refuses to build a half-configured
/// sender so that delivery failures surface at startup rather than on the
/// first send.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SmtpConfig {
    /// SMTP relay hostname
    pub host: String,

    /// SMTP relay port
    pub port: u16,

    /// Relay username ("apikey" for API-key style relays)
    pub username: String,

    /// Relay password or API key
    pub password: String,

    /// From header, either a bare address or `Name <addr>` form
    pub from: String,

    /// Subject line for registration OTP mail
    pub otp_subject: String,

    /// Subject line for password reset mail
    pub reset_subject: String,

    /// Code lifetime quoted in OTP mail bodies ("expires in N minutes")
    pub otp_ttl: Duration,
}

impl SmtpConfig {
    /// Load from `SMTP_*` environment variables.
    ///
    /// Returns an error naming the missing variable when host, password,
    /// or from-address are absent.
    pub fn from_env() -> Result<Self, String> {
        let host = env::string_var("SMTP_HOST", "");
        let password = env::string_var("SMTP_PASS", "");
        let from = env::string_var("SMTP_FROM", "");

        if host.is_empty() {
            return Err("SMTP_HOST is not set".to_string());
        }
        if password.is_empty() {
            return Err("SMTP_PASS is not set".to_string());
        }
        if from.is_empty() {
            return Err("SMTP_FROM is not set".to_string());
        }

        let port = std::env::var("SMTP_PORT")
            .ok()
            .and_then(|v| v.trim().parse::<u16>().ok())
            .unwrap_or(DEFAULT_SMTP_PORT);

        Ok(Self {
            host,
            port,
            username: env::string_var("SMTP_USER", "apikey"),
            password,
            from,
            otp_subject: env::string_var("SMTP_SUBJECT", "Your Registration OTP"),
            reset_subject: env::string_var("SMTP_RESET_SUBJECT", "Password Reset Request"),
            otp_ttl: env::duration_secs("OTP_TTL", 300),
        })
    }
}
