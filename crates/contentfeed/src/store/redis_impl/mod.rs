//! Redis store backend.
//!
//! Writes go to the primary connection; reads rotate over every configured
//! address so replicas share the read load.

mod error;
mod store;

pub use store::RedisStore;
