//! Connection and session configuration.
//!
//! Both structs derive `Deserialize` with field defaults so a host
//! application can embed them in its own configuration file and only spell
//! out what it changes.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::header::HeaderName;

/// Which header carries the bearer token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TokenHeader {
    /// `Authorization: Bearer <token>`.
    #[default]
    Authorization,
    /// `x-token: Bearer <token>`, for older backends.
    XToken,
}

impl TokenHeader {
    pub fn header_name(self) -> HeaderName {
        match self {
            TokenHeader::Authorization => HeaderName::Authorization,
            TokenHeader::XToken => HeaderName::Custom("x-token".to_string()),
        }
    }
}

/// Settings for `HttpConnection`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConnectionConfig {
    pub token_header: TokenHeader,
}

/// Settings for the ureq-backed `UreqSession`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Whole-request timeout in seconds. `None` disables it.
    pub timeout_secs: Option<u64>,
    /// Sent as `User-Agent` unless the request already sets one.
    pub user_agent: Option<String>,
    /// Largest response body accepted, in bytes. `None` reads the whole body.
    pub max_response_bytes: Option<u64>,
}

impl SessionConfig {
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }

    pub fn body_limit(&self) -> u64 {
        self.max_response_bytes.unwrap_or(u64::MAX)
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            timeout_secs: Some(60),
            user_agent: Some(concat!("basic-network/", env!("CARGO_PKG_VERSION")).to_string()),
            max_response_bytes: None,
        }
    }
}
