//! Request Context
//!
//! Metadata about the current request, carried into handlers for tracing.

use serde::{Deserialize, Serialize};
use std::net::IpAddr;

/// Context for a request, used for log correlation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RequestContext {
    /// Request ID from the X-Request-Id header
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_id: Option<String>,

    /// Client IP address
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_ip: Option<IpAddr>,
}

impl RequestContext {
    /// Create a new empty context
    pub fn new() -> Self {
        Self::default()
    }

    /// Create context with request ID
    pub fn with_request_id(mut self, request_id: impl Into<String>) -> Self {
        self.request_id = Some(request_id.into());
        self
    }

    /// Create context with client IP
    pub fn with_client_ip(mut self, ip: IpAddr) -> Self {
        self.client_ip = Some(ip);
        self
    }

    /// Request ID for log fields, `-` when unknown
    pub fn request_id_or_dash(&self) -> &str {
        self.request_id.as_deref().unwrap_or("-")
    }
}
