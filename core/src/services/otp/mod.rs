//! Registration OTP engine
//!
//! Issues, throttles, and verifies 6-digit one-time codes for email
//! registration:
//! - hashed storage with TTL expiry in the secret store
//! - layered throttle (cooldown marker + sliding send counter)
//! - attempt counting on every verification call
//! - single consumption on successful verification

mod config;
mod service;
mod traits;

#[cfg(test)]
mod tests;

pub use config::OtpConfig;
pub use service::OtpService;
pub use traits::{OtpMailer, OtpStore};
