//! Outbound actions
//!
//! Provides the write side of the gateway: sending a message to a terminal.

mod submit;

pub use submit::{submit_message, submit_message_with_rng};
