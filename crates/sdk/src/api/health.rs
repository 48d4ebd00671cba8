//! Health API endpoints.

use crate::client::RosterClient;
use crate::error::RosterResult;
use serde::{Deserialize, Serialize};

/// Health API for checking server status.
pub struct HealthApi<'a> {
    client: &'a RosterClient,
}

impl<'a> HealthApi<'a> {
    pub(crate) fn new(client: &'a RosterClient) -> Self {
        Self { client }
    }

    /// Check basic health status.
    pub async fn check(&self) -> RosterResult<HealthCheck> {
        self.client.http.get("/health").await
    }
}

/// Basic health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthCheck {
    pub status: String,
    #[serde(default)]
    pub version: Option<String>,
    #[serde(default)]
    pub employees: Option<u64>,
}
