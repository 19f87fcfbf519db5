//! Core of the contentfeed aggregator.
//!
//! Everything in this crate is free of I/O: wire types, the cache codec,
//! the closed type registry, cache key rules, detail merge logic and the
//! resource model. The `contentfeed` crate provides the imperative shell
//! (stores, origin clients, the request pipeline).

pub mod cache;
pub mod codec;
pub mod context;
pub mod memo;
pub mod model;
pub mod outcome;
pub mod registry;
pub mod resource;

pub use context::RequestContext;
pub use outcome::{Fetched, NoCacheMarker};
