//! HTTP client for the classification service.
//!
//! [`ApiClient`] owns its [`ClientConfig`] and a pooled `reqwest::Client`;
//! there is no process-wide instance. All JSON calls go through one helper
//! that normalises failures into [`ClientError`]:
//!
//! | Outcome | Error |
//! |---------|-------|
//! | no response | [`ClientError::Network`] / [`ClientError::Timeout`] |
//! | non-2xx | [`ClientError::Server`] with the body's `detail`/`message`, else `HTTP error, status <code>` |
//! | 2xx, wrong shape | [`ClientError::InvalidResponse`] |
//!
//! The liveness probe is the exception: it never fails, it reports
//! [`ConnectivityStatus::Disconnected`].

use crate::config::ClientConfig;
use crate::error::ClientError;
use crate::output::{ClassificationResult, ModelInfo, TrainingStatus};
use crate::pipeline::encode::EncodedPayload;
use crate::view::ConnectivityStatus;
use reqwest::RequestBuilder;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;
use tracing::{debug, info, warn};

const HEALTH_PATH: &str = "/health";
const PREDICT_PATH: &str = "/predict";
const MODEL_INFO_PATH: &str = "/model-info";
const TRAIN_PATH: &str = "/train";

#[derive(Serialize)]
struct PredictRequest<'a> {
    image: &'a str,
}

/// Client for one classification service.
#[derive(Debug, Clone)]
pub struct ApiClient {
    config: ClientConfig,
    http: reqwest::Client,
}

impl ApiClient {
    pub fn new(config: ClientConfig) -> Result<Self, ClientError> {
        let http = reqwest::Client::builder()
            .build()
            .map_err(|e| ClientError::Http(e.to_string()))?;
        debug!("Created ApiClient for {}", config.base_url);
        Ok(Self { config, http })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Probe `GET /health`. Any 2xx is `Connected`; everything else, including
    /// a timeout or a refused connection, is `Disconnected`.
    pub async fn check_health(&self) -> ConnectivityStatus {
        let url = self.config.endpoint(HEALTH_PATH);
        debug!("Probing {}", url);

        let result = self
            .http
            .get(&url)
            .timeout(Duration::from_secs(self.config.health_timeout_secs))
            .send()
            .await;

        match result {
            Ok(response) if response.status().is_success() => {
                info!("Service at {} is up", self.config.base_url);
                ConnectivityStatus::Connected
            }
            Ok(response) => {
                warn!("Health probe returned HTTP {}", response.status());
                ConnectivityStatus::Disconnected
            }
            Err(e) => {
                warn!("Health probe failed: {}", e);
                ConnectivityStatus::Disconnected
            }
        }
    }

    /// Send one encoded image to `POST /predict`.
    ///
    /// The data-URL header is stripped; only the base64 payload is sent.
    pub async fn classify(
        &self,
        payload: &EncodedPayload,
    ) -> Result<ClassificationResult, ClientError> {
        let body = PredictRequest {
            image: payload.payload(),
        };
        debug!(
            "POST {} ({} bytes base64, {:?})",
            PREDICT_PATH,
            body.image.len(),
            payload.mime_type()
        );

        let request = self
            .http
            .post(self.config.endpoint(PREDICT_PATH))
            .json(&body);
        let result: ClassificationResult = self
            .send_json(request, PREDICT_PATH, "classify image")
            .await?;

        info!(
            "Classified as '{}' ({})",
            result.prediction,
            result
                .processing_time
                .map(|t| format!("{t}s"))
                .unwrap_or_else(|| "no timing".to_string())
        );
        Ok(result)
    }

    /// Fetch `GET /model-info`.
    pub async fn model_info(&self) -> Result<ModelInfo, ClientError> {
        let request = self.http.get(self.config.endpoint(MODEL_INFO_PATH));
        self.send_json(request, MODEL_INFO_PATH, "fetch model info")
            .await
    }

    /// Ask the service to start retraining in the background (`POST /train`).
    pub async fn start_training(&self) -> Result<TrainingStatus, ClientError> {
        let request = self.http.post(self.config.endpoint(TRAIN_PATH));
        let status: TrainingStatus = self
            .send_json(request, TRAIN_PATH, "start training")
            .await?;
        info!("Training request accepted: {}", status.status);
        Ok(status)
    }

    /// Send a request and decode a JSON body, normalising every failure.
    async fn send_json<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
        endpoint: &'static str,
        action: &'static str,
    ) -> Result<T, ClientError> {
        let secs = self.config.request_timeout_secs;
        let response = request
            .timeout(Duration::from_secs(secs))
            .send()
            .await
            .map_err(|e| transport_error(e, action, secs))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| transport_error(e, action, secs))?;

        if !status.is_success() {
            let message = server_message(status.as_u16(), &text);
            warn!("{} returned HTTP {}: {}", endpoint, status.as_u16(), message);
            return Err(ClientError::Server {
                status: status.as_u16(),
                message,
            });
        }

        serde_json::from_str(&text).map_err(|e| ClientError::InvalidResponse {
            endpoint,
            detail: e.to_string(),
        })
    }
}

fn transport_error(e: reqwest::Error, action: &'static str, secs: u64) -> ClientError {
    if e.is_timeout() {
        ClientError::Timeout { action, secs }
    } else {
        ClientError::Network {
            action,
            reason: e.to_string(),
        }
    }
}

/// Pick the human-readable message out of an error body.
///
/// FastAPI puts it in `detail`; other services use `message`. Anything else
/// (HTML error pages, validation arrays, empty bodies) falls back to the
/// status code.
pub fn server_message(status: u16, body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| {
            ["detail", "message"].iter().find_map(|key| {
                v.get(key)
                    .and_then(|m| m.as_str())
                    .filter(|m| !m.trim().is_empty())
                    .map(str::to_string)
            })
        })
        .unwrap_or_else(|| format!("HTTP error, status {status}"))
}
