use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SplitError {
    #[error("Invalid input: {reason}")]
    InvalidInput { reason: String },

    #[error("Could not decode share token: {reason}")]
    Decode { reason: String },

    #[error("Failed to persist {key}: {source}")]
    PersistenceWrite {
        key: String,
        #[source]
        source: Box<SplitError>,
    },

    #[error("Clipboard write failed: {reason}")]
    Clipboard { reason: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl SplitError {
    pub fn invalid_input(reason: impl Into<String>) -> Self {
        SplitError::InvalidInput {
            reason: reason.into(),
        }
    }

    pub fn decode(reason: impl ToString) -> Self {
        SplitError::Decode {
            reason: reason.to_string(),
        }
    }
}

impl ResponseError for SplitError {
    fn status_code(&self) -> StatusCode {
        match self {
            SplitError::InvalidInput { .. } | SplitError::Decode { .. } => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).body(self.to_string())
    }
}

pub type Result<T> = std::result::Result<T, SplitError>;
