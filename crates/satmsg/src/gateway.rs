//! Gateway operations exposed to callers
//!
//! These are the entry points a front end (HTTP layer, CLI) calls on behalf
//! of an already authenticated user. Required parameters are checked for
//! presence; timestamps are otherwise passed to the provider verbatim.

use anyhow::{Context, Result};
use serde_json::Value;

use crate::actions::submit_message;
use crate::error::ValidationError;
use crate::models::{ChatThread, MergedForwardRecord};
use crate::provider::ProviderApi;
use crate::query::collect_chat_threads;
use crate::reconcile::reconcile_forward;

/// Raw `get_return_messages` response for the window
pub fn fetch_return_messages(
    provider: &dyn ProviderApi,
    start_utc: &str,
    end_utc: &str,
) -> Result<Value> {
    require_window(start_utc, end_utc)?;
    provider
        .get_return_messages(start_utc, end_utc)
        .context("Failed to fetch return messages")
}

/// Reconciled forward messages for the window
pub fn fetch_forward_reconciled(
    provider: &dyn ProviderApi,
    start_utc: &str,
    end_utc: &str,
) -> Result<Vec<MergedForwardRecord>> {
    require_window(start_utc, end_utc)?;
    reconcile_forward(provider, start_utc, end_utc)
}

/// One chat thread per terminal active in the window
pub fn fetch_chat_threads(
    provider: &dyn ProviderApi,
    start_utc: &str,
    end_utc: &str,
) -> Result<Vec<ChatThread>> {
    require_window(start_utc, end_utc)?;
    collect_chat_threads(provider, start_utc, end_utc)
}

/// Send `text` to `destination_id` and return the provider's response.
///
/// `destination_id` is trimmed and the trimmed value is what gets submitted.
/// Fails with a `ValidationError` before any provider call when either input
/// is blank, or when `text` holds a UTF-16 code unit above 255 (it could not
/// be sent as one byte per character).
pub fn submit_outbound_message(
    provider: &dyn ProviderApi,
    destination_id: &str,
    text: &str,
) -> Result<Value> {
    submit_message(provider, destination_id, text)
}

fn require_window(start_utc: &str, end_utc: &str) -> Result<(), ValidationError> {
    if start_utc.trim().is_empty() {
        return Err(ValidationError::missing("start_utc"));
    }
    if end_utc.trim().is_empty() {
        return Err(ValidationError::missing("end_utc"));
    }
    Ok(())
}
