//! Store backend implementations.
//!
//! Concrete implementations of `contentfeed_core::cache::Store`. The
//! in-memory store is always compiled in and backs tests and the CLI when
//! no Redis is reachable. The Redis store is gated by the `redis` feature.

pub mod memory;

#[cfg(test)]
pub(crate) mod faulty;

#[cfg(feature = "redis")]
pub mod redis_impl;

pub use memory::MemoryStore;

#[cfg(feature = "redis")]
pub use redis_impl::RedisStore;
