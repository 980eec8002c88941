//! Client for the external stress prediction service.
//!
//! The service receives the three-field feature vector and returns a verdict
//! with a confidence score, an echo of the features, and a list of tips. The
//! model itself lives entirely on the service side.

use crate::core::FeatureVector;
use serde::{Deserialize, Serialize};

/// Prediction service configuration.
#[derive(Debug, Clone)]
pub struct PredictorConfig {
    /// Service host (default: 127.0.0.1)
    pub host: String,
    /// Service port
    pub port: u16,
}

impl PredictorConfig {
    /// Create a new predictor configuration.
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
        }
    }

    /// Get the full service URL.
    pub fn url(&self) -> String {
        format!("http://{}:{}", self.host, self.port)
    }

    /// Get the prediction endpoint URL.
    pub fn predict_url(&self) -> String {
        format!("{}/predict", self.url())
    }
}

impl Default for PredictorConfig {
    fn default() -> Self {
        Self::new("127.0.0.1", 5000)
    }
}

/// Predictor client error types.
#[derive(Debug)]
pub enum PredictorError {
    /// Configuration error
    Config(String),
    /// Network/HTTP error
    Network(String),
    /// Service returned a non-success response
    Service { status: u16, message: String },
    /// Response body did not match the expected shape
    Malformed(String),
}

impl std::fmt::Display for PredictorError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PredictorError::Config(msg) => write!(f, "Predictor config error: {msg}"),
            PredictorError::Network(msg) => write!(f, "Predictor network error: {msg}"),
            PredictorError::Service { status, message } => {
                write!(f, "Predictor service error ({status}): {message}")
            }
            PredictorError::Malformed(msg) => write!(f, "Malformed predictor response: {msg}"),
        }
    }
}

impl std::error::Error for PredictorError {}

/// Stress verdict labels returned by the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StressLevel {
    Low,
    Medium,
    High,
}

impl std::fmt::Display for StressLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StressLevel::Low => write!(f, "Low"),
            StressLevel::Medium => write!(f, "Medium"),
            StressLevel::High => write!(f, "High"),
        }
    }
}

/// Feature values echoed back by the service.
///
/// The service rounds these for display and reports the error rate as a
/// percentage, so they are not bit-identical to the submitted vector.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FeatureEcho {
    /// Keys per second
    pub typing_speed: f64,
    /// Average pause in milliseconds
    pub avg_pause: f64,
    /// Error rate as a percentage
    pub error_rate: f64,
}

/// A complete prediction result.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Prediction {
    /// Verdict label
    pub stress_level: StressLevel,
    /// Confidence as a percentage
    pub confidence: f64,
    /// Echo of the submitted features
    pub features: FeatureEcho,
    /// Human-readable stress management tips
    pub tips: Vec<String>,
}

/// Async client for the prediction service.
pub struct PredictorClient {
    config: PredictorConfig,
    client: reqwest::Client,
}

impl PredictorClient {
    /// Create a new predictor client.
    pub fn new(config: PredictorConfig) -> Result<Self, PredictorError> {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(10))
            .build()
            .map_err(|e| PredictorError::Config(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self { config, client })
    }

    /// Test connection to the service.
    pub async fn test_connection(&self) -> Result<bool, PredictorError> {
        let response = self
            .client
            .get(self.config.url())
            .send()
            .await
            .map_err(|e| PredictorError::Network(e.to_string()))?;

        Ok(response.status().is_success())
    }

    /// Submit a feature vector and return the service's prediction.
    ///
    /// The session that produced the vector is never touched here; on any
    /// failure the caller may re-extract and retry.
    pub async fn predict(&self, features: &FeatureVector) -> Result<Prediction, PredictorError> {
        let response = self
            .client
            .post(self.config.predict_url())
            .header("Content-Type", "application/json")
            .json(features)
            .send()
            .await
            .map_err(|e| PredictorError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let message = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(PredictorError::Service {
                status: status.as_u16(),
                message,
            });
        }

        let prediction: Prediction = response
            .json()
            .await
            .map_err(|e| PredictorError::Malformed(e.to_string()))?;

        Ok(prediction)
    }
}

/// Blocking predictor client for use in synchronous contexts.
pub struct BlockingPredictorClient {
    inner: PredictorClient,
    runtime: tokio::runtime::Runtime,
}

impl BlockingPredictorClient {
    /// Create a new blocking predictor client.
    pub fn new(config: PredictorConfig) -> Result<Self, PredictorError> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|e| PredictorError::Config(format!("Failed to create runtime: {e}")))?;

        Ok(Self {
            inner: PredictorClient::new(config)?,
            runtime,
        })
    }

    /// Test connection to the service.
    pub fn test_connection(&self) -> Result<bool, PredictorError> {
        self.runtime.block_on(self.inner.test_connection())
    }

    /// Submit a feature vector and return the service's prediction.
    pub fn predict(&self, features: &FeatureVector) -> Result<Prediction, PredictorError> {
        self.runtime.block_on(self.inner.predict(features))
    }
}
