//! Content aggregation backend.
//!
//! Fans requests out to the recommendation and detail services, merges
//! their answers with per-user actions and keeps a versioned copy of recent
//! responses in a key-value store to ride out origin failures.

pub mod builder;
pub mod cache;
pub mod config;
pub mod content;
pub mod origin;
pub mod pipeline;
pub mod state;
pub mod store;
pub mod user_actions;
