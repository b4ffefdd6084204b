//! In-memory provider implementation
//!
//! Serves canned provider JSON and records every request. Used by tests and
//! for exercising the pipeline without network access.

use anyhow::Result;
use serde_json::{Value, json};
use std::collections::{HashMap, HashSet};
use std::sync::{Mutex, RwLock};

use super::{Endpoint, ProviderApi};
use crate::error::ProviderError;
use crate::models::OutboundMessage;

/// In-memory implementation of ProviderApi
///
/// Responses are shaped like the real provider's. Failures can be injected
/// per endpoint, or per forward message id for detail requests.
pub struct InMemoryProvider {
    return_messages: RwLock<Value>,
    forward_statuses: RwLock<Value>,
    forward_details: RwLock<Vec<Value>>,
    error_codes: RwLock<Value>,
    submit_response: RwLock<Value>,
    failing_endpoints: RwLock<HashSet<Endpoint>>,
    failing_detail_ids: RwLock<HashSet<i64>>,
    /// Id list of every detail request, in call order
    detail_requests: Mutex<Vec<Vec<i64>>>,
    submitted: Mutex<Vec<OutboundMessage>>,
    calls: Mutex<HashMap<Endpoint, usize>>,
}

impl InMemoryProvider {
    /// Create a provider with no data
    pub fn new() -> Self {
        Self {
            return_messages: RwLock::new(json!({ "Messages": [] })),
            forward_statuses: RwLock::new(json!({ "Statuses": [] })),
            forward_details: RwLock::new(Vec::new()),
            error_codes: RwLock::new(json!([])),
            submit_response: RwLock::new(json!({ "Submissions": [] })),
            failing_endpoints: RwLock::new(HashSet::new()),
            failing_detail_ids: RwLock::new(HashSet::new()),
            detail_requests: Mutex::new(Vec::new()),
            submitted: Mutex::new(Vec::new()),
            calls: Mutex::new(HashMap::new()),
        }
    }

    /// Append a return message to the `Messages` list
    pub fn add_return_message(&self, message: Value) {
        push_to_list(&self.return_messages, "Messages", message);
    }

    /// Replace the whole `get_return_messages` response
    pub fn set_return_messages_response(&self, response: Value) {
        *self.return_messages.write().unwrap() = response;
    }

    /// Append a status to the `Statuses` list
    pub fn add_forward_status(&self, status: Value) {
        push_to_list(&self.forward_statuses, "Statuses", status);
    }

    /// Replace the whole `get_forward_statuses` response
    pub fn set_forward_statuses_response(&self, response: Value) {
        *self.forward_statuses.write().unwrap() = response;
    }

    /// Register a forward message detail; served when its `ID` is requested
    pub fn add_forward_detail(&self, detail: Value) {
        self.forward_details.write().unwrap().push(detail);
    }

    /// Replace the error-code table
    pub fn set_error_codes(&self, table: Value) {
        *self.error_codes.write().unwrap() = table;
    }

    /// Replace the response returned by `submit_messages`
    pub fn set_submit_response(&self, response: Value) {
        *self.submit_response.write().unwrap() = response;
    }

    /// Make every call to `endpoint` fail with HTTP 500
    pub fn fail_endpoint(&self, endpoint: Endpoint) {
        self.failing_endpoints.write().unwrap().insert(endpoint);
    }

    /// Make any detail request that includes `id` fail with HTTP 500
    pub fn fail_details_for(&self, id: i64) {
        self.failing_detail_ids.write().unwrap().insert(id);
    }

    /// Id lists of all detail requests so far
    pub fn detail_requests(&self) -> Vec<Vec<i64>> {
        self.detail_requests.lock().unwrap().clone()
    }

    /// Messages passed to `submit_messages` so far
    pub fn submitted(&self) -> Vec<OutboundMessage> {
        self.submitted.lock().unwrap().clone()
    }

    /// Number of calls made to `endpoint`
    pub fn call_count(&self, endpoint: Endpoint) -> usize {
        self.calls
            .lock()
            .unwrap()
            .get(&endpoint)
            .copied()
            .unwrap_or(0)
    }

    /// Total calls across all endpoints
    pub fn total_calls(&self) -> usize {
        self.calls.lock().unwrap().values().sum()
    }

    /// Count the call and fail it if the endpoint is marked failing
    fn enter(&self, endpoint: Endpoint) -> Result<()> {
        *self.calls.lock().unwrap().entry(endpoint).or_default() += 1;

        if self.failing_endpoints.read().unwrap().contains(&endpoint) {
            return Err(ProviderError::status(endpoint, 500).into());
        }
        Ok(())
    }
}

impl Default for InMemoryProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl ProviderApi for InMemoryProvider {
    fn get_return_messages(&self, _start_utc: &str, _end_utc: &str) -> Result<Value> {
        self.enter(Endpoint::ReturnMessages)?;
        Ok(self.return_messages.read().unwrap().clone())
    }

    fn get_forward_statuses(&self, _start_utc: &str, _end_utc: &str) -> Result<Value> {
        self.enter(Endpoint::ForwardStatuses)?;
        Ok(self.forward_statuses.read().unwrap().clone())
    }

    fn get_forward_messages(&self, ids: &[i64]) -> Result<Value> {
        self.detail_requests.lock().unwrap().push(ids.to_vec());
        self.enter(Endpoint::ForwardMessages)?;

        let failing = self.failing_detail_ids.read().unwrap();
        if ids.iter().any(|id| failing.contains(id)) {
            return Err(ProviderError::status(Endpoint::ForwardMessages, 500).into());
        }

        let details = self.forward_details.read().unwrap();
        let messages: Vec<Value> = ids
            .iter()
            .filter_map(|id| {
                details
                    .iter()
                    .find(|d| d.get("ID").and_then(Value::as_i64) == Some(*id))
                    .cloned()
            })
            .collect();

        Ok(json!({ "Messages": messages }))
    }

    fn get_error_codes(&self) -> Result<Value> {
        self.enter(Endpoint::ErrorCodes)?;
        Ok(self.error_codes.read().unwrap().clone())
    }

    fn submit_messages(&self, messages: &[OutboundMessage]) -> Result<Value> {
        self.enter(Endpoint::SubmitMessages)?;
        self.submitted
            .lock()
            .unwrap()
            .extend(messages.iter().cloned());
        Ok(self.submit_response.read().unwrap().clone())
    }
}

/// Push onto a list field, replacing a non-list value with a fresh list
fn push_to_list(slot: &RwLock<Value>, field: &str, item: Value) {
    let mut response = slot.write().unwrap();
    if !response.get(field).is_some_and(Value::is_array) {
        response[field] = json!([]);
    }
    if let Some(list) = response[field].as_array_mut() {
        list.push(item);
    }
}
