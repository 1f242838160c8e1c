//! HTTP client for the Opswatch demo backend
//!
//! Three endpoints, plain JSON over HTTP:
//! - `GET /api/status` — full status snapshot
//! - `POST /api/simulate_threat` — inject a simulated threat
//! - `POST /api/azure_sync` — trigger a service sync
//!
//! The controller decides what a failure means (it only ever logs); this
//! module just reports it with a typed error.

use crate::models::{SimulatedThreat, StatusSnapshot};
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("unexpected http status {0}")]
    Status(StatusCode),
}

#[derive(Debug, Serialize)]
struct SimulateThreatRequest<'a> {
    #[serde(rename = "type")]
    threat_type: &'a str,
    severity: &'a str,
}

#[derive(Debug, Deserialize)]
pub struct SimulateThreatResponse {
    pub status: String,
    pub threat: Option<SimulatedThreat>,
}

#[derive(Debug, Serialize)]
struct SyncRequest<'a> {
    service: &'a str,
}

#[derive(Debug, Deserialize)]
pub struct SyncResponse {
    pub status: String,
    #[serde(default)]
    pub message: Option<String>,
}

pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(base_url: &str, request_timeout: Duration) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder()
            .timeout(request_timeout)
            .build()?;

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// `GET /api/status`
    pub async fn status(&self) -> Result<StatusSnapshot, ApiError> {
        debug!("fetching status snapshot");
        let response = self.http.get(self.url("/api/status")).send().await?;
        if !response.status().is_success() {
            return Err(ApiError::Status(response.status()));
        }
        Ok(response.json().await?)
    }

    /// `POST /api/simulate_threat`
    pub async fn simulate_threat(
        &self,
        threat_type: &str,
        severity: &str,
    ) -> Result<SimulateThreatResponse, ApiError> {
        let body = SimulateThreatRequest {
            threat_type,
            severity,
        };
        let response = self
            .http
            .post(self.url("/api/simulate_threat"))
            .json(&body)
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(ApiError::Status(response.status()));
        }
        Ok(response.json().await?)
    }

    /// `POST /api/azure_sync`
    pub async fn sync_service(&self, service: &str) -> Result<SyncResponse, ApiError> {
        let body = SyncRequest { service };
        let response = self
            .http
            .post(self.url("/api/azure_sync"))
            .json(&body)
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(ApiError::Status(response.status()));
        }
        Ok(response.json().await?)
    }
}
