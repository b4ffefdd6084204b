//! Chat thread model: both directions of traffic for one terminal

use serde::{Deserialize, Serialize};

use super::{ForwardState, MergedForwardRecord};
use crate::provider::api::ReturnMessage;

/// Identifier of a remote terminal (trimmed mobile/destination ID)
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TerminalId(pub String);

impl TerminalId {
    /// Normalize a raw provider identifier.
    ///
    /// Returns `None` for identifiers that are blank after trimming.
    pub fn parse(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(Self(trimmed.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// A message the terminal sent to the gateway
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct MobileOriginatedEntry {
    #[serde(rename = "MessageUTC")]
    pub message_utc: Option<String>,
    #[serde(rename = "ReceiveUTC")]
    pub receive_utc: Option<String>,
    pub raw_payload: Option<Vec<u8>>,
}

impl From<ReturnMessage> for MobileOriginatedEntry {
    fn from(msg: ReturnMessage) -> Self {
        Self {
            message_utc: msg.message_utc,
            receive_utc: msg.receive_utc,
            raw_payload: msg.raw_payload,
        }
    }
}

/// A message the gateway sent to the terminal, with its delivery state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct MobileTerminatedEntry {
    #[serde(rename = "CreateUTC")]
    pub create_utc: Option<String>,
    #[serde(rename = "StatusUTC")]
    pub status_utc: Option<String>,
    pub raw_payload: Option<Vec<u8>>,
    #[serde(rename = "ErrorID")]
    pub error_id: i64,
    pub error_description: String,
    pub state: Option<ForwardState>,
}

impl From<MergedForwardRecord> for MobileTerminatedEntry {
    fn from(record: MergedForwardRecord) -> Self {
        Self {
            create_utc: record.create_utc,
            status_utc: record.status_utc,
            raw_payload: record.raw_payload,
            error_id: record.error_id,
            error_description: record.error_description,
            state: record.state,
        }
    }
}

/// Conversation with one terminal over a time window
///
/// `mobile_originated` is ordered by `MessageUTC`, `mobile_terminated` by
/// `CreateUTC`, both ascending.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ChatThread {
    #[serde(rename = "TerminalID")]
    pub terminal_id: TerminalId,
    pub mobile_originated: Vec<MobileOriginatedEntry>,
    pub mobile_terminated: Vec<MobileTerminatedEntry>,
}

impl ChatThread {
    /// Create a thread with no messages in either direction
    pub fn new(terminal_id: TerminalId) -> Self {
        Self {
            terminal_id,
            mobile_originated: Vec::new(),
            mobile_terminated: Vec::new(),
        }
    }

    /// Total number of messages in both directions
    pub fn message_count(&self) -> usize {
        self.mobile_originated.len() + self.mobile_terminated.len()
    }
}
