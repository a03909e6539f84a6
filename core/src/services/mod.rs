//! Business services containing the secret-lifecycle engines.

pub mod otp;
pub mod reset;
pub mod secret;

// Re-export commonly used types
pub use otp::{OtpConfig, OtpMailer, OtpService, OtpStore};
pub use reset::{ResetConfig, ResetMailer, ResetService, ResetStore};
