//! Satmsg crate - Satellite messaging gateway pipeline
//!
//! This crate provides the provider-facing core of the Skylink gateway:
//! - Provider REST client with Basic-Auth and injectable settings
//! - Batched retrieval of forward message bodies
//! - Reconciliation of forward statuses, bodies and error codes
//! - Per-terminal chat threads built from both directions of traffic
//! - Outbound message construction and submission
//!
//! Every call re-fetches from the provider; nothing is stored or cached.
//! HTTP is synchronous (ureq) so the crate stays executor-agnostic.

pub mod actions;
pub mod config;
pub mod error;
pub mod gateway;
pub mod models;
pub mod provider;
pub mod query;
pub mod reconcile;

pub use config::ProviderConfig;
pub use error::{ErrorKind, ProviderError, ValidationError};
pub use gateway::{
    fetch_chat_threads, fetch_forward_reconciled, fetch_return_messages, submit_outbound_message,
};
pub use models::{
    ChatThread, ForwardState, MergedForwardRecord, MobileOriginatedEntry, MobileTerminatedEntry,
    OutboundMessage, OutboundPayload, TerminalId,
};
pub use provider::{BasicAuth, Endpoint, InMemoryProvider, ProviderApi, ProviderClient};
pub use reconcile::{BatchStats, MAX_IDS_PER_REQUEST};
