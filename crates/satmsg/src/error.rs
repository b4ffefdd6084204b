//! Typed errors raised by the gateway pipeline
//!
//! Operations return `anyhow::Result`; the structs here travel inside the
//! `anyhow::Error` and can be recovered with `downcast_ref`.

use crate::provider::Endpoint;

/// A required call parameter is missing or unusable.
///
/// Raised before any network call is made.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid {field}: {reason}")]
pub struct ValidationError {
    pub field: &'static str,
    pub reason: String,
}

impl ValidationError {
    pub fn new(field: &'static str, reason: impl Into<String>) -> Self {
        Self {
            field,
            reason: reason.into(),
        }
    }

    /// Shorthand for a parameter that was absent or blank
    pub fn missing(field: &'static str) -> Self {
        Self::new(field, "is required")
    }
}

/// The provider answered with a non-2xx status, could not be reached, or
/// returned a body that is not JSON.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{endpoint} request failed{}: {message}", status.map(|s| format!(" with status {s}")).unwrap_or_default())]
pub struct ProviderError {
    pub endpoint: Endpoint,
    /// HTTP status when the provider answered, `None` for transport failures
    pub status: Option<u16>,
    pub message: String,
}

impl ProviderError {
    pub fn status(endpoint: Endpoint, status: u16) -> Self {
        Self {
            endpoint,
            status: Some(status),
            message: format!("provider returned HTTP {status}"),
        }
    }

    pub fn transport(endpoint: Endpoint, message: impl Into<String>) -> Self {
        Self {
            endpoint,
            status: None,
            message: message.into(),
        }
    }
}

/// Coarse classification of a pipeline failure, for front ends that need to
/// pick an exit or status code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Validation,
    Provider,
    Internal,
}

impl ErrorKind {
    /// Classify an error by the typed error found anywhere in its chain
    pub fn of(err: &anyhow::Error) -> Self {
        for cause in err.chain() {
            if cause.is::<ValidationError>() {
                return Self::Validation;
            }
            if cause.is::<ProviderError>() {
                return Self::Provider;
            }
        }
        Self::Internal
    }
}
