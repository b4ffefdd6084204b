//! Provider HTTP Basic authentication
//!
//! The provider authenticates every request with a fixed Basic-Auth
//! header. The header is derived from the injected credential pair on each
//! call; there is no token to refresh.

use base64::prelude::*;
use std::fmt;

/// Credential pair encoded into the `Authorization` header
#[derive(Clone, PartialEq, Eq)]
pub struct BasicAuth {
    username: String,
    password: String,
}

impl BasicAuth {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    /// Value for the `Authorization` header: `Basic base64(username:password)`
    pub fn header_value(&self) -> String {
        let token = BASE64_STANDARD.encode(format!("{}:{}", self.username, self.password));
        format!("Basic {}", token)
    }
}

impl fmt::Debug for BasicAuth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BasicAuth")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}
