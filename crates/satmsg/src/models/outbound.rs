//! Outbound (mobile-terminated) message construction

use rand::Rng;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::ValidationError;

/// Command name carried in every outbound payload envelope
pub const OUTBOUND_COMMAND: &str = "sendMessage";

/// Structured payload envelope naming the command and the two header bytes
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct OutboundPayload {
    pub name: String,
    #[serde(rename = "SIN")]
    pub sin: u8,
    #[serde(rename = "MIN")]
    pub min: u8,
    /// Always empty; the text travels in the raw payload
    pub fields: Vec<Value>,
}

/// A single message to submit to a terminal
///
/// Built, submitted once, and discarded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct OutboundMessage {
    #[serde(rename = "DestinationID")]
    pub destination_id: String,
    /// Provider correlation token: one random digit 1-9.
    ///
    /// Only nine values exist, so concurrent submissions can collide.
    #[serde(rename = "UserMessageID")]
    pub user_message_id: String,
    /// `[SIN, MIN, text code units...]`
    pub raw_payload: Vec<u8>,
    pub payload: OutboundPayload,
}

impl OutboundMessage {
    /// Build a message with thread-local randomness
    pub fn build(destination_id: &str, text: &str) -> Result<Self, ValidationError> {
        Self::build_with_rng(destination_id, text, &mut rand::thread_rng())
    }

    /// Build a message drawing SIN, MIN and the correlation token from `rng`
    pub fn build_with_rng<R: Rng + ?Sized>(
        destination_id: &str,
        text: &str,
        rng: &mut R,
    ) -> Result<Self, ValidationError> {
        let destination_id = destination_id.trim();
        if destination_id.is_empty() {
            return Err(ValidationError::missing("destination_id"));
        }
        if text.is_empty() {
            return Err(ValidationError::missing("message"));
        }

        let body = encode_text(text)?;

        let sin: u8 = rng.r#gen();
        let min: u8 = rng.r#gen();
        let user_message_id = rng.gen_range(1..=9u8).to_string();

        let mut raw_payload = Vec::with_capacity(body.len() + 2);
        raw_payload.push(sin);
        raw_payload.push(min);
        raw_payload.extend(body);

        Ok(Self {
            destination_id: destination_id.to_string(),
            user_message_id,
            raw_payload,
            payload: OutboundPayload {
                name: OUTBOUND_COMMAND.to_string(),
                sin,
                min,
                fields: Vec::new(),
            },
        })
    }

    pub fn sin(&self) -> u8 {
        self.payload.sin
    }

    pub fn min(&self) -> u8 {
        self.payload.min
    }
}

/// One byte per UTF-16 code unit; units above 255 cannot be carried
fn encode_text(text: &str) -> Result<Vec<u8>, ValidationError> {
    text.encode_utf16()
        .map(|unit| {
            u8::try_from(unit).map_err(|_| {
                ValidationError::new(
                    "message",
                    format!("character U+{:04X} does not fit in one byte", unit),
                )
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use serde_json::json;

    #[test]
    fn test_raw_payload_layout() {
        let mut rng = StdRng::seed_from_u64(7);
        let msg = OutboundMessage::build_with_rng("T9", "hi", &mut rng).unwrap();

        assert_eq!(msg.raw_payload.len(), 4);
        assert_eq!(msg.raw_payload[0], msg.sin());
        assert_eq!(msg.raw_payload[1], msg.min());
        assert_eq!(&msg.raw_payload[2..], &[104, 105]);
    }

    #[test]
    fn test_payload_envelope() {
        let mut rng = StdRng::seed_from_u64(1);
        let msg = OutboundMessage::build_with_rng("T9", "hello", &mut rng).unwrap();

        assert_eq!(msg.payload.name, OUTBOUND_COMMAND);
        assert_eq!(msg.payload.sin, msg.raw_payload[0]);
        assert_eq!(msg.payload.min, msg.raw_payload[1]);
        assert!(msg.payload.fields.is_empty());
    }

    #[test]
    fn test_user_message_id_is_single_digit() {
        let mut rng = StdRng::seed_from_u64(99);
        for _ in 0..200 {
            let msg = OutboundMessage::build_with_rng("T9", "x", &mut rng).unwrap();
            let digit: u8 = msg.user_message_id.parse().unwrap();
            assert_eq!(msg.user_message_id.len(), 1);
            assert!((1..=9).contains(&digit));
        }
    }

    #[test]
    fn test_same_seed_same_message() {
        let a = OutboundMessage::build_with_rng("T9", "hi", &mut StdRng::seed_from_u64(5)).unwrap();
        let b = OutboundMessage::build_with_rng("T9", "hi", &mut StdRng::seed_from_u64(5)).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_latin1_text_is_accepted() {
        let msg = OutboundMessage::build("T9", "café").unwrap();
        assert_eq!(&msg.raw_payload[2..], &[99, 97, 102, 233]);
    }

    #[test]
    fn test_wide_characters_are_rejected() {
        let err = OutboundMessage::build("T9", "snow ☃").unwrap_err();
        assert_eq!(err.field, "message");
        assert!(err.reason.contains("U+2603"));
    }

    #[test]
    fn test_missing_inputs() {
        assert_eq!(
            OutboundMessage::build("  ", "hi").unwrap_err(),
            ValidationError::missing("destination_id")
        );
        assert_eq!(
            OutboundMessage::build("T9", "").unwrap_err(),
            ValidationError::missing("message")
        );
    }

    #[test]
    fn test_destination_is_trimmed() {
        let msg = OutboundMessage::build(" T9 ", "hi").unwrap();
        assert_eq!(msg.destination_id, "T9");
    }

    #[test]
    fn test_serializes_provider_shape() {
        let mut rng = StdRng::seed_from_u64(3);
        let msg = OutboundMessage::build_with_rng("T9", "hi", &mut rng).unwrap();
        let value = serde_json::to_value(&msg).unwrap();

        assert_eq!(value["DestinationID"], json!("T9"));
        assert_eq!(value["UserMessageID"], json!(msg.user_message_id));
        assert_eq!(value["RawPayload"][2], json!(104));
        assert_eq!(value["Payload"]["Name"], json!(OUTBOUND_COMMAND));
        assert_eq!(value["Payload"]["SIN"], json!(msg.sin()));
        assert_eq!(value["Payload"]["Fields"], json!([]));
    }
}
