//! Catalog health probe
//!
//! Never fails: transport or decode problems are folded into
//! [`CatalogHealth::error`] so callers can report them as data.

use serde::Serialize;
use std::time::Duration;

use super::http::CLIENT_ID_HEADER;
use super::HttpCatalog;

/// User-facing message attached to every failed probe
pub const HEALTH_ERROR_DISPLAY: &str = "The Search API encountered an error while attempting to connect to CMR. Please try again later.";

const HEALTH_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CatalogHealth {
    pub host: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub health: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<HealthError>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HealthError {
    pub display: String,
    pub raw: String,
}

impl CatalogHealth {
    pub fn is_healthy(&self) -> bool {
        self.error.is_none()
    }
}

impl HttpCatalog {
    /// Probe the catalog's health endpoint
    pub async fn health(&self) -> CatalogHealth {
        let host = self.base_url.clone();
        match self.fetch_health().await {
            Ok(health) => CatalogHealth {
                host,
                health: Some(health),
                error: None,
            },
            Err(raw) => {
                tracing::debug!(error = %raw, "catalog_health_failed");
                CatalogHealth {
                    host,
                    health: None,
                    error: Some(HealthError {
                        display: HEALTH_ERROR_DISPLAY.to_string(),
                        raw,
                    }),
                }
            }
        }
    }

    async fn fetch_health(&self) -> Result<serde_json::Value, String> {
        let response = self
            .client
            .get(&self.health_url)
            .header(CLIENT_ID_HEADER, &self.client_id)
            .timeout(HEALTH_TIMEOUT)
            .send()
            .await
            .map_err(|e| e.to_string())?;
        let text = response.text().await.map_err(|e| e.to_string())?;
        serde_json::from_str(&text).map_err(|e| e.to_string())
    }
}
