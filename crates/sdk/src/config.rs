//! Configuration types for the Roster SDK.

use std::time::Duration;
use url::Url;

/// Configuration for the Roster client.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL of the Roster REST API.
    pub base_url: Url,
    /// Request timeout. Requests wait indefinitely when unset.
    pub timeout: Option<Duration>,
}

impl ClientConfig {
    /// Create a new configuration with the given base URL.
    pub fn new(base_url: Url) -> Self {
        Self {
            base_url,
            timeout: None,
        }
    }
}
