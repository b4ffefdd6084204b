//! Query API for callers
//!
//! Provides high-level views assembled from both directions of traffic.

mod chat;

pub use chat::{aggregate_threads, collect_chat_threads};
