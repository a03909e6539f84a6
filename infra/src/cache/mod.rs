//! Cache module for the Redis-backed secret store
//!
//! Provides the shared Redis client (connection handling, retry logic,
//! the store primitives) and the per-flow store adapters that implement
//! the domain trait seams over it.

pub mod otp_store;
pub mod redis_client;
pub mod reset_store;

pub use otp_store::OtpRedisStore;
pub use redis_client::RedisClient;
pub use reset_store::ResetRedisStore;

// Re-export commonly used types
pub use sg_shared::config::cache::CacheConfig;
