//! Mail module - SMTP delivery gateway
//!
//! Implements the engines' delivery seams over an async SMTP relay,
//! rendering multipart (plain + HTML) messages for OTP codes and
//! password-reset links.

pub mod smtp;

pub use smtp::SmtpMailer;

// Re-export commonly used types
pub use sg_shared::config::smtp::SmtpConfig;
