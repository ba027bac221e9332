use async_trait::async_trait;
use reqwest::Client;
use shared::{
    error::ApiError,
    protocol::{CropFeatures, PredictionResponse, PREDICT_CROP_ROUTE},
};
use tracing::debug;
use url::Url;

pub mod error;
pub mod form;
mod session;

pub use error::PredictionError;
pub use form::{coerce_number, FieldSet};
pub use session::{
    FormSession, ImprovementsView, ResultView, SubmissionResult, SubmissionTicket, SubmitOutcome,
};

/// Publicly hosted prediction service.
pub const DEFAULT_SERVER_URL: &str = "https://cropupgrad.onrender.com";

#[async_trait]
pub trait PredictionClient: Send + Sync {
    async fn predict(&self, features: &CropFeatures) -> Result<PredictionResponse, PredictionError>;
}

/// Talks to a prediction service over HTTP.
#[derive(Debug, Clone)]
pub struct HttpPredictionClient {
    http: Client,
    endpoint: Url,
}

impl HttpPredictionClient {
    pub fn new(server_url: &str) -> Result<Self, PredictionError> {
        Self::with_http_client(Client::new(), server_url)
    }

    pub fn with_http_client(http: Client, server_url: &str) -> Result<Self, PredictionError> {
        Ok(Self {
            http,
            endpoint: predict_endpoint(server_url)?,
        })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

#[async_trait]
impl PredictionClient for HttpPredictionClient {
    async fn predict(&self, features: &CropFeatures) -> Result<PredictionResponse, PredictionError> {
        debug!(endpoint = %self.endpoint, ?features, "sending prediction request");
        let res = self
            .http
            .post(self.endpoint.clone())
            .json(features)
            .send()
            .await?;

        let status = res.status();
        let body = res.bytes().await?;
        if !status.is_success() {
            return Err(PredictionError::Status {
                status: status.as_u16(),
                message: error_message(&body),
            });
        }

        Ok(serde_json::from_slice(&body)?)
    }
}

/// Resolves the prediction route below `server_url`, keeping any path prefix.
pub fn predict_endpoint(server_url: &str) -> Result<Url, PredictionError> {
    let invalid = |source| PredictionError::InvalidEndpoint {
        url: server_url.to_string(),
        source,
    };
    let mut base = Url::parse(server_url.trim()).map_err(invalid)?;
    if !base.path().ends_with('/') {
        let path = format!("{}/", base.path());
        base.set_path(&path);
    }
    base.join(PREDICT_CROP_ROUTE.trim_start_matches('/'))
        .map_err(invalid)
}

fn error_message(body: &[u8]) -> String {
    if let Ok(api_error) = serde_json::from_slice::<ApiError>(body) {
        return api_error.message;
    }
    let text = String::from_utf8_lossy(body).trim().to_string();
    if text.is_empty() {
        "empty response body".to_string()
    } else {
        text
    }
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
