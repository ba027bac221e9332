//! UI/backend events and error modeling for desktop GUI controller.

use client_core::PredictionError;
use shared::protocol::PredictionResponse;

pub enum UiEvent {
    Info(String),
    PredictionCompleted {
        ticket_id: u64,
        result: Result<PredictionResponse, PredictionError>,
    },
    Error(UiError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiErrorCategory {
    Transport,
    Validation,
    Service,
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiErrorContext {
    BackendStartup,
    Prediction,
    General,
}

#[derive(Debug, Clone)]
pub struct UiError {
    category: UiErrorCategory,
    context: UiErrorContext,
    message: String,
}

impl UiError {
    pub fn from_message(context: UiErrorContext, message: impl Into<String>) -> Self {
        let message = message.into();
        let message_lower = message.to_ascii_lowercase();
        let category = if message_lower.contains("invalid")
            || message_lower.contains("missing")
            || message_lower.contains("malformed")
        {
            UiErrorCategory::Validation
        } else if message_lower.contains("timeout")
            || message_lower.contains("connection")
            || message_lower.contains("network")
            || message_lower.contains("disconnect")
        {
            UiErrorCategory::Transport
        } else {
            UiErrorCategory::Unknown
        };

        Self {
            category,
            context,
            message,
        }
    }

    pub fn from_prediction(err: &PredictionError) -> Self {
        let (category, message) = match err {
            PredictionError::Transport(_) => (
                UiErrorCategory::Transport,
                "Prediction service unreachable; check the server URL and network, then retry."
                    .to_string(),
            ),
            PredictionError::Status { status, message } if (400..500).contains(status) => (
                UiErrorCategory::Validation,
                format!("The service rejected the readings ({status}): {message}"),
            ),
            PredictionError::Status { status, message } => (
                UiErrorCategory::Service,
                format!("Prediction service error ({status}): {message}"),
            ),
            PredictionError::MalformedResponse(_) => (
                UiErrorCategory::Service,
                format!("Prediction service sent an unexpected reply: {err}"),
            ),
            PredictionError::InvalidEndpoint { .. } => {
                (UiErrorCategory::Validation, err.to_string())
            }
        };

        Self {
            category,
            context: UiErrorContext::Prediction,
            message,
        }
    }

    pub fn category(&self) -> UiErrorCategory {
        self.category
    }

    pub fn context(&self) -> UiErrorContext {
        self.context
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn client_side_rejections_read_as_validation() {
        let err = UiError::from_prediction(&PredictionError::Status {
            status: 422,
            message: "Nitrogen: invalid type: null".to_string(),
        });
        assert_eq!(err.category(), UiErrorCategory::Validation);
        assert_eq!(err.context(), UiErrorContext::Prediction);
        assert!(err.message().contains("422"));

        let err = UiError::from_prediction(&PredictionError::Status {
            status: 502,
            message: "bad gateway".to_string(),
        });
        assert_eq!(err.category(), UiErrorCategory::Service);
    }

    #[test]
    fn classifies_queue_disconnect_as_transport_error() {
        let err = UiError::from_message(
            UiErrorContext::General,
            "Backend command processor disconnected (possible startup/runtime failure)",
        );
        assert_eq!(err.category(), UiErrorCategory::Transport);
    }
}
