//! Outbound message submission

use anyhow::{Context, Result};
use log::info;
use rand::Rng;
use serde_json::Value;

use crate::models::OutboundMessage;
use crate::provider::ProviderApi;

/// Build and submit one message to a terminal.
///
/// Invalid input fails with a `ValidationError` before any network call.
/// The provider's response is returned untouched.
pub fn submit_message(
    provider: &dyn ProviderApi,
    destination_id: &str,
    text: &str,
) -> Result<Value> {
    submit_message_with_rng(provider, destination_id, text, &mut rand::thread_rng())
}

/// Same as [`submit_message`] with caller-supplied randomness
pub fn submit_message_with_rng<R: Rng + ?Sized>(
    provider: &dyn ProviderApi,
    destination_id: &str,
    text: &str,
    rng: &mut R,
) -> Result<Value> {
    let message = OutboundMessage::build_with_rng(destination_id, text, rng)?;

    info!(
        "Submitting message to {} (SIN {}, MIN {}, UserMessageID {}, {} bytes)",
        message.destination_id,
        message.sin(),
        message.min(),
        message.user_message_id,
        message.raw_payload.len()
    );

    provider
        .submit_messages(std::slice::from_ref(&message))
        .with_context(|| format!("Failed to submit message to {}", message.destination_id))
}
