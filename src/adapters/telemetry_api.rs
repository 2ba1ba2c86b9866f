use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use thiserror::Error;

use crate::domain::models::DeviceSelector;
use crate::domain::response_shape::ResponseShape;

pub const HEALTH_PATH: &str = "/api/health";
pub const MOVEMENTS_PATH: &str = "/api/movimientos";
pub const OBSTACLES_PATH: &str = "/api/obstaculos";

#[async_trait]
pub trait TelemetrySource: Send + Sync + 'static {
    async fn check_health(&self) -> Result<(), RequestError>;

    /// Rows of `resource_path` for one device, newest first, normalized from
    /// whichever response shape the API used.
    async fn fetch_records(
        &self,
        resource_path: &str,
        device: DeviceSelector,
        limit: u32,
    ) -> Result<Vec<Value>, RequestError>;
}

#[derive(Debug, Error)]
pub enum RequestError {
    #[error("{0}")]
    Transport(#[source] reqwest::Error),
    #[error("{code} {reason}")]
    Status { code: u16, reason: String },
    #[error("HTTP {0}")]
    HealthStatus(u16),
    #[error("invalid JSON response: {0}")]
    Decode(#[source] serde_json::Error),
}

#[derive(Debug, Clone)]
pub struct HttpTelemetryClient {
    client: Client,
    base_url: String,
}

impl HttpTelemetryClient {
    pub fn new(base_url: &str) -> Result<Self, RequestError> {
        let client = Client::builder().build().map_err(RequestError::Transport)?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }
}

#[async_trait]
impl TelemetrySource for HttpTelemetryClient {
    async fn check_health(&self) -> Result<(), RequestError> {
        let response = self
            .client
            .get(self.url(HEALTH_PATH))
            .send()
            .await
            .map_err(RequestError::Transport)?;

        let status = response.status();
        if !status.is_success() {
            return Err(RequestError::HealthStatus(status.as_u16()));
        }

        Ok(())
    }

    async fn fetch_records(
        &self,
        resource_path: &str,
        device: DeviceSelector,
        limit: u32,
    ) -> Result<Vec<Value>, RequestError> {
        let response = self
            .client
            .get(self.url(resource_path))
            .query(&[("id_dispositivo", device.id()), ("limit", u64::from(limit))])
            .send()
            .await
            .map_err(RequestError::Transport)?;

        let status = response.status();
        if !status.is_success() {
            return Err(RequestError::Status {
                code: status.as_u16(),
                reason: status.canonical_reason().unwrap_or_default().to_string(),
            });
        }

        let body = response.bytes().await.map_err(RequestError::Transport)?;
        let payload: Value = serde_json::from_slice(&body).map_err(RequestError::Decode)?;
        let shape = ResponseShape::classify(payload);

        tracing::debug!(
            resource_path,
            device = device.id(),
            shape = shape_name(&shape),
            "telemetry response received"
        );

        Ok(shape.into_rows())
    }
}

fn shape_name(shape: &ResponseShape) -> &'static str {
    match shape {
        ResponseShape::Bare(_) => "bare",
        ResponseShape::Envelope(_) => "envelope",
        ResponseShape::Other(_) => "other",
    }
}
