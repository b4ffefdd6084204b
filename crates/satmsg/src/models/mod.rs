//! Domain models for gateway entities

mod forward;
mod outbound;
mod thread;

pub use forward::{ForwardState, MergedForwardRecord, NO_ERROR, UNKNOWN_ERROR};
pub use outbound::{OUTBOUND_COMMAND, OutboundMessage, OutboundPayload};
pub use thread::{ChatThread, MobileOriginatedEntry, MobileTerminatedEntry, TerminalId};
