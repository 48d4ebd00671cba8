//! Main client for the Roster SDK.

use crate::api::{EmployeesApi, HealthApi};
use crate::config::ClientConfig;
use crate::error::{RosterError, RosterResult};
use crate::transport::HttpTransport;
use std::sync::Arc;
use std::time::Duration;
use url::Url;

/// Client for the Roster employee REST API.
#[derive(Debug, Clone)]
pub struct RosterClient {
    pub(crate) http: HttpTransport,
}

impl RosterClient {
    /// Create a new client builder.
    pub fn builder() -> RosterClientBuilder {
        RosterClientBuilder::new()
    }

    /// Create a client from configuration.
    pub fn from_config(config: ClientConfig) -> RosterResult<Self> {
        let http = HttpTransport::new(Arc::new(config))?;
        Ok(Self { http })
    }

    /// Get the employees API.
    pub fn employees(&self) -> EmployeesApi<'_> {
        EmployeesApi::new(self)
    }

    /// Get the health API.
    pub fn health(&self) -> HealthApi<'_> {
        HealthApi::new(self)
    }
}

/// Builder for creating a RosterClient.
#[derive(Default)]
pub struct RosterClientBuilder {
    base_url: Option<String>,
    timeout: Option<Duration>,
}

impl RosterClientBuilder {
    /// Create a new builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the base URL of the REST API.
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Set the request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Build the client.
    pub fn build(self) -> RosterResult<RosterClient> {
        let base_url_str = self
            .base_url
            .ok_or_else(|| RosterError::Config("base_url is required".to_string()))?;

        let base_url = Url::parse(&base_url_str)?;

        RosterClient::from_config(ClientConfig {
            base_url,
            timeout: self.timeout,
        })
    }
}
