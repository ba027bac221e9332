use thiserror::Error;

/// Every way a prediction request can fail.
///
/// The session treats all of these the same way; the variants exist so a
/// front end can phrase the failure for the user.
#[derive(Debug, Error)]
pub enum PredictionError {
    #[error("invalid prediction service url '{url}': {source}")]
    InvalidEndpoint {
        url: String,
        source: url::ParseError,
    },
    #[error("prediction request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("prediction service returned {status}: {message}")]
    Status { status: u16, message: String },
    #[error("malformed prediction response: {0}")]
    MalformedResponse(#[from] serde_json::Error),
}

impl PredictionError {
    pub fn is_transport(&self) -> bool {
        matches!(self, PredictionError::Transport(_))
    }
}
