//! Reconciled forward (mobile-terminated) message model

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Description used when a status carries no error
pub const NO_ERROR: &str = "No Error";

/// Description used when an error code is missing from the provider table
pub const UNKNOWN_ERROR: &str = "Unknown Error";

/// Provider lifecycle state of a forward message
///
/// Serialized as the provider's numeric code. Codes this crate does not know
/// are kept as `Other`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "i64", into = "i64")]
pub enum ForwardState {
    Submitted,
    Received,
    Error,
    DeliveryFailed,
    TimedOut,
    Cancelled,
    Waiting,
    BroadcastSubmitted,
    SendingInProgress,
    Other(i64),
}

impl ForwardState {
    pub fn code(self) -> i64 {
        match self {
            Self::Submitted => 0,
            Self::Received => 1,
            Self::Error => 2,
            Self::DeliveryFailed => 3,
            Self::TimedOut => 4,
            Self::Cancelled => 5,
            Self::Waiting => 6,
            Self::BroadcastSubmitted => 7,
            Self::SendingInProgress => 8,
            Self::Other(code) => code,
        }
    }
}

impl From<i64> for ForwardState {
    fn from(code: i64) -> Self {
        match code {
            0 => Self::Submitted,
            1 => Self::Received,
            2 => Self::Error,
            3 => Self::DeliveryFailed,
            4 => Self::TimedOut,
            5 => Self::Cancelled,
            6 => Self::Waiting,
            7 => Self::BroadcastSubmitted,
            8 => Self::SendingInProgress,
            other => Self::Other(other),
        }
    }
}

impl From<ForwardState> for i64 {
    fn from(state: ForwardState) -> Self {
        state.code()
    }
}

/// One forward message with its status, body and resolved error text
///
/// Body fields come from the provider's message detail, lifecycle fields
/// from its status entry. Lifecycle fields are `None` when no status matched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct MergedForwardRecord {
    /// Forward message ID (equals the status's ForwardMessageID)
    #[serde(rename = "ID")]
    pub id: i64,
    #[serde(rename = "DestinationID")]
    pub destination_id: Option<String>,
    #[serde(rename = "CreateUTC")]
    pub create_utc: Option<String>,
    /// Timestamp of the latest state change
    #[serde(rename = "StatusUTC")]
    pub status_utc: Option<String>,
    pub state: Option<ForwardState>,
    pub is_closed: Option<bool>,
    pub payload: Option<Value>,
    pub raw_payload: Option<Vec<u8>>,
    /// Provider error code, 0 when none
    #[serde(rename = "ErrorID")]
    pub error_id: i64,
    pub error_description: String,
}

impl MergedForwardRecord {
    pub fn has_error(&self) -> bool {
        self.error_id != 0
    }
}
