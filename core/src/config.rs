//! Client configuration.

/// Root URL of the hosted record-store API.
pub const API_ROOT: &str = "https://restful-db.web.app/api";

/// Settings shared by every client built from it.
///
/// Only the API root is configurable; timeouts belong to the transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub api_root: String,
}

impl ClientConfig {
    /// Point the client at a different deployment, e.g. a local mock server.
    pub fn new(api_root: impl Into<String>) -> Self {
        Self {
            api_root: api_root.into().trim_end_matches('/').to_string(),
        }
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new(API_ROOT)
    }
}
