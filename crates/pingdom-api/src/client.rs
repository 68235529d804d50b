//! Pingdom REST API client
//!
//! Direct implementation of the Pingdom 3.1 API for maintenance windows and
//! their occurrences. Uses Bearer token authentication.

use crate::error::{ApiError, Result};
use crate::models::{
    ErrorResponse, MaintenanceListResponse, MaintenanceResponse, MaintenanceWindow,
    MessageResponse, Occurrence, OccurrenceQuery, OccurrenceWindow, OccurrencesResponse,
};
use crate::service::{MaintenanceApi, OccurrenceApi};
use async_trait::async_trait;
use pingdom_config::ProviderConfig;
use serde::de::DeserializeOwned;

/// Pingdom API client
#[derive(Debug, Clone)]
pub struct PingdomClient {
    client: reqwest::Client,
    api_token: String,
    base_url: String,
}

impl PingdomClient {
    /// Create a client from a validated provider configuration
    pub fn new(config: &ProviderConfig) -> Result<Self> {
        if config.api_token().is_empty() {
            return Err(ApiError::InvalidConfig("api_token is required".to_string()));
        }

        let client = reqwest::Client::builder()
            .timeout(config.timeout())
            .user_agent(concat!("pingdom-provider/", env!("CARGO_PKG_VERSION")))
            .build()?;

        tracing::info!("Pingdom client configured for {}", config.base_url());
        Ok(Self {
            client,
            api_token: config.api_token().to_string(),
            base_url: config.base_url().to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// Send a request and decode the JSON body, mapping non-2xx responses to [`ApiError`]
    async fn send<T: DeserializeOwned>(&self, request: reqwest::RequestBuilder) -> Result<T> {
        let response = request.bearer_auth(&self.api_token).send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(match serde_json::from_str::<ErrorResponse>(&body) {
                Ok(err) => ApiError::Api {
                    status: err.error.status_code,
                    description: err.error.status_desc,
                    message: err.error.error_message,
                },
                Err(_) => ApiError::UnexpectedResponse {
                    status: status.as_u16(),
                    body,
                },
            });
        }

        Ok(serde_json::from_str(&body)?)
    }
}

#[async_trait]
impl OccurrenceApi for PingdomClient {
    async fn list_occurrences(&self, query: &OccurrenceQuery) -> Result<Vec<Occurrence>> {
        let url = format!(
            "{}?{}",
            self.url("maintenance.occurrences"),
            query.to_query_string()
        );
        tracing::debug!("GET {}", url);

        let response: OccurrencesResponse = self.send(self.client.get(&url)).await?;
        Ok(response.occurrences)
    }

    async fn update_occurrence(&self, id: i64, window: OccurrenceWindow) -> Result<()> {
        let url = self.url(&format!("maintenance.occurrences/{id}"));
        tracing::debug!("PUT {} from={} to={}", url, window.from, window.to);

        let _: MessageResponse = self.send(self.client.put(&url).json(&window)).await?;
        Ok(())
    }

    async fn delete_occurrence(&self, id: i64) -> Result<()> {
        let url = self.url(&format!("maintenance.occurrences/{id}"));
        tracing::debug!("DELETE {}", url);

        let _: MessageResponse = self.send(self.client.delete(&url)).await?;
        Ok(())
    }
}

#[async_trait]
impl MaintenanceApi for PingdomClient {
    async fn get_maintenance(&self, id: i64) -> Result<MaintenanceWindow> {
        let url = self.url(&format!("maintenance/{id}"));
        tracing::debug!("GET {}", url);

        let response: MaintenanceResponse = self.send(self.client.get(&url)).await?;
        Ok(response.maintenance)
    }

    async fn list_maintenances(&self) -> Result<Vec<MaintenanceWindow>> {
        let url = self.url("maintenance");
        tracing::debug!("GET {}", url);

        let response: MaintenanceListResponse = self.send(self.client.get(&url)).await?;
        Ok(response.maintenance)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(base_url: &str) -> ProviderConfig {
        ProviderConfig {
            api_token: Some("test".to_string()),
            base_url: Some(base_url.to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_url_joining() {
        let client = PingdomClient::new(&config("https://api.pingdom.com/api/3.1/")).unwrap();
        assert_eq!(client.base_url(), "https://api.pingdom.com/api/3.1");
        assert_eq!(
            client.url("/maintenance/12"),
            "https://api.pingdom.com/api/3.1/maintenance/12"
        );
    }

    #[test]
    fn test_requires_token() {
        let result = PingdomClient::new(&ProviderConfig::default());
        assert!(matches!(result, Err(ApiError::InvalidConfig(_))));
    }
}
