//! Satellite messaging provider integration
//!
//! This module provides:
//! - The `ProviderApi` seam the pipeline is written against
//! - A blocking HTTP client for the provider's REST endpoints
//! - Basic-Auth credential encoding
//! - Lenient decoding of provider JSON into wire types
//! - An in-memory provider for tests and offline runs

mod auth;
mod client;
mod memory;
mod normalize;

use std::fmt;

use anyhow::Result;
use serde_json::Value;

use crate::models::OutboundMessage;

pub use auth::BasicAuth;
pub use client::ProviderClient;
pub use memory::InMemoryProvider;
pub use normalize::{list_field, parse_list, parse_utc};

/// Provider endpoints, relative to the configured base URL
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endpoint {
    ReturnMessages,
    ForwardStatuses,
    ForwardMessages,
    ErrorCodes,
    SubmitMessages,
}

impl Endpoint {
    /// Path segment appended to the base URL
    pub fn path(self) -> &'static str {
        match self {
            Self::ReturnMessages => "get_return_messages.json/",
            Self::ForwardStatuses => "get_forward_statuses.json/",
            Self::ForwardMessages => "get_forward_messages.json/",
            Self::ErrorCodes => "info_errors.json/",
            Self::SubmitMessages => "submit_messages.json/",
        }
    }

    pub fn name(self) -> &'static str {
        self.path().trim_end_matches(".json/")
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Raw access to the provider's endpoints.
///
/// Every method returns the provider's JSON verbatim; interpreting the shape
/// is the caller's job. Failures carry a [`crate::ProviderError`]. No method
/// retries.
pub trait ProviderApi: Send + Sync {
    /// Mobile-originated messages received within the window
    fn get_return_messages(&self, start_utc: &str, end_utc: &str) -> Result<Value>;

    /// Lifecycle statuses of forward messages within the window
    fn get_forward_statuses(&self, start_utc: &str, end_utc: &str) -> Result<Value>;

    /// Full forward message bodies for at most five identifiers
    fn get_forward_messages(&self, ids: &[i64]) -> Result<Value>;

    /// The provider's global error-code table
    fn get_error_codes(&self) -> Result<Value>;

    /// Submit outbound messages
    fn submit_messages(&self, messages: &[OutboundMessage]) -> Result<Value>;
}

/// Provider wire types
///
/// Fields are optional and a mistyped value reads as absent: the provider
/// omits fields freely and the pipeline applies its own defaults. Only the
/// detail `ID` join key is strict.
pub mod api {
    use serde::de::DeserializeOwned;
    use serde::{Deserialize, Deserializer};
    use serde_json::Value;

    use crate::models::ForwardState;

    /// Mobile-originated message from `get_return_messages`
    #[derive(Debug, Clone, Default, Deserialize)]
    #[serde(rename_all = "PascalCase")]
    pub struct ReturnMessage {
        #[serde(rename = "ID", default, deserialize_with = "lenient")]
        pub id: Option<i64>,
        #[serde(rename = "MobileID", default, deserialize_with = "lenient_string")]
        pub mobile_id: Option<String>,
        #[serde(rename = "MessageUTC", default, deserialize_with = "lenient")]
        pub message_utc: Option<String>,
        #[serde(rename = "ReceiveUTC", default, deserialize_with = "lenient")]
        pub receive_utc: Option<String>,
        #[serde(rename = "SIN", default, deserialize_with = "lenient")]
        pub sin: Option<u8>,
        #[serde(default, deserialize_with = "lenient")]
        pub raw_payload: Option<Vec<u8>>,
        pub payload: Option<Value>,
    }

    /// Forward message status from `get_forward_statuses`
    #[derive(Debug, Clone, Default, Deserialize)]
    #[serde(rename_all = "PascalCase")]
    pub struct ForwardStatus {
        #[serde(rename = "ForwardMessageID", default, deserialize_with = "lenient")]
        pub forward_message_id: Option<i64>,
        #[serde(rename = "DestinationID", default, deserialize_with = "lenient_string")]
        pub destination_id: Option<String>,
        #[serde(default, deserialize_with = "lenient")]
        pub state: Option<ForwardState>,
        #[serde(rename = "StateUTC", default, deserialize_with = "lenient")]
        pub state_utc: Option<String>,
        #[serde(default, deserialize_with = "lenient")]
        pub is_closed: Option<bool>,
        #[serde(rename = "ErrorID", default, deserialize_with = "lenient")]
        pub error_id: Option<i64>,
    }

    /// Forward message body from `get_forward_messages`
    #[derive(Debug, Clone, Default, Deserialize)]
    #[serde(rename_all = "PascalCase")]
    pub struct ForwardMessageDetail {
        #[serde(rename = "ID")]
        pub id: i64,
        #[serde(rename = "DestinationID", default, deserialize_with = "lenient_string")]
        pub destination_id: Option<String>,
        #[serde(rename = "CreateUTC", default, deserialize_with = "lenient")]
        pub create_utc: Option<String>,
        pub payload: Option<Value>,
        #[serde(default, deserialize_with = "lenient")]
        pub raw_payload: Option<Vec<u8>>,
    }

    /// Entry of the `info_errors` table
    #[derive(Debug, Clone, Deserialize)]
    #[serde(rename_all = "PascalCase")]
    pub struct ErrorCode {
        #[serde(rename = "ID")]
        pub id: i64,
        #[serde(default, deserialize_with = "lenient")]
        pub description: Option<String>,
    }

    /// Optional fields of the wrong type read as absent so the rest of the
    /// record survives
    fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
    where
        D: Deserializer<'de>,
        T: DeserializeOwned,
    {
        Ok(Option::<Value>::deserialize(deserializer)?
            .and_then(|value| serde_json::from_value(value).ok()))
    }

    /// Terminal identifiers arrive as strings or bare numbers
    fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(match Option::<Value>::deserialize(deserializer)? {
            Some(Value::String(s)) => Some(s),
            Some(Value::Number(n)) => Some(n.to_string()),
            _ => None,
        })
    }
}
