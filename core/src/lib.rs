//! # SendGuard Core
//!
//! Core domain layer for the SendGuard backend. This crate contains the
//! secret-lifecycle engines (registration OTP and password reset), the
//! crypto helpers they share, the trait seams toward the expiring store
//! and the delivery gateway, and the domain error types.

pub mod errors;
pub mod services;

// Re-export commonly used types for convenience
pub use errors::*;
pub use services::*;
