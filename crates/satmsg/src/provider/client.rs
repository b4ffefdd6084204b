//! Provider REST client
//!
//! Provides methods for the provider's message endpoints.
//! Uses synchronous HTTP (ureq) to be executor-agnostic.

use anyhow::Result;
use log::debug;
use serde::Serialize;
use serde_json::Value;
use std::time::Duration;
use ureq::Agent;

use super::{BasicAuth, Endpoint, ProviderApi};
use crate::config::ProviderConfig;
use crate::error::ProviderError;
use crate::models::OutboundMessage;

/// Body of a `submit_messages` request
#[derive(Debug, Serialize)]
struct SubmitRequest<'a> {
    messages: &'a [OutboundMessage],
}

/// HTTP client for the messaging provider
pub struct ProviderClient {
    agent: Agent,
    base_url: String,
    access_id: String,
    access_password: String,
    auth: BasicAuth,
}

impl ProviderClient {
    /// Create a new provider client from injected settings
    pub fn new(config: &ProviderConfig) -> Self {
        let agent: Agent = Agent::config_builder()
            .timeout_global(Some(Duration::from_secs(config.timeout_secs)))
            .build()
            .into();

        let auth = config.basic_auth();
        debug!(
            "Provider client for {} as {}",
            config.base_url,
            auth.username()
        );

        Self {
            agent,
            base_url: config.base_url.clone(),
            access_id: config.access_id.clone(),
            access_password: config.access_password.clone(),
            auth,
        }
    }

    /// Full URL of an endpoint
    fn url(&self, endpoint: Endpoint) -> String {
        endpoint_url(&self.base_url, endpoint)
    }

    /// Perform an authenticated GET with the access parameters plus `params`
    fn get(&self, endpoint: Endpoint, params: &[(&str, &str)]) -> Result<Value> {
        debug!("GET {} {:?}", endpoint, params);

        let mut request = self
            .agent
            .get(&self.url(endpoint))
            .header("Authorization", &self.auth.header_value())
            .header("Content-Type", "application/json")
            .query("access_id", &self.access_id)
            .query("password", &self.access_password);

        for (key, value) in params {
            request = request.query(*key, *value);
        }

        let response = request.call();
        read_response(endpoint, response)
    }
}

impl ProviderApi for ProviderClient {
    fn get_return_messages(&self, start_utc: &str, end_utc: &str) -> Result<Value> {
        self.get(
            Endpoint::ReturnMessages,
            &[("start_utc", start_utc), ("end_utc", end_utc)],
        )
    }

    fn get_forward_statuses(&self, start_utc: &str, end_utc: &str) -> Result<Value> {
        self.get(
            Endpoint::ForwardStatuses,
            &[("start_utc", start_utc), ("end_utc", end_utc)],
        )
    }

    fn get_forward_messages(&self, ids: &[i64]) -> Result<Value> {
        let fw_ids = join_ids(ids);
        self.get(Endpoint::ForwardMessages, &[("fwIDs", fw_ids.as_str())])
    }

    fn get_error_codes(&self) -> Result<Value> {
        self.get(Endpoint::ErrorCodes, &[])
    }

    fn submit_messages(&self, messages: &[OutboundMessage]) -> Result<Value> {
        let endpoint = Endpoint::SubmitMessages;
        debug!("POST {} ({} messages)", endpoint, messages.len());

        let response = self
            .agent
            .post(&self.url(endpoint))
            .header("Authorization", &self.auth.header_value())
            .query("access_id", &self.access_id)
            .query("password", &self.access_password)
            .send_json(SubmitRequest { messages });

        read_response(endpoint, response)
    }
}

/// Turn a ureq outcome into provider JSON or a `ProviderError`
fn read_response(
    endpoint: Endpoint,
    response: Result<ureq::http::Response<ureq::Body>, ureq::Error>,
) -> Result<Value> {
    match response {
        Ok(mut resp) => {
            let status = resp.status().as_u16();
            resp.body_mut().read_json::<Value>().map_err(|e| {
                ProviderError {
                    endpoint,
                    status: Some(status),
                    message: format!("unreadable response body: {}", e),
                }
                .into()
            })
        }
        Err(ureq::Error::StatusCode(code)) => Err(ProviderError::status(endpoint, code).into()),
        Err(e) => Err(ProviderError::transport(endpoint, e.to_string()).into()),
    }
}

/// Join a base URL and an endpoint path with exactly one slash between them
fn endpoint_url(base_url: &str, endpoint: Endpoint) -> String {
    format!("{}/{}", base_url.trim_end_matches('/'), endpoint.path())
}

/// Comma-separated id list for the `fwIDs` parameter
fn join_ids(ids: &[i64]) -> String {
    ids.iter()
        .map(|id| id.to_string())
        .collect::<Vec<_>>()
        .join(",")
}
