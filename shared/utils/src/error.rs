use serde::{Deserialize, Serialize};
use thiserror::Error;
use toxref_models::IndexError;

#[derive(Error, Debug, Clone, Serialize, Deserialize)]
pub enum ToxrefError {
    #[error("Transport error: {message}")]
    Transport { message: String },

    #[error("Upstream returned status {status} for {url}")]
    UpstreamStatus { url: String, status: u16 },

    #[error("Document processing error: {message}")]
    DocumentProcessing { message: String },

    #[error("Not found: {resource}")]
    NotFound { resource: String },

    #[error("Failed to load {path}: {message}")]
    DataLoad { path: String, message: String },

    #[error("Configuration error: {message}")]
    Configuration { message: String },

    #[error("Internal server error: {message}")]
    Internal { message: String },
}

impl ToxrefError {
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport {
            message: message.into(),
        }
    }

    pub fn upstream_status(url: impl Into<String>, status: u16) -> Self {
        Self::UpstreamStatus {
            url: url.into(),
            status,
        }
    }

    pub fn document_processing(message: impl Into<String>) -> Self {
        Self::DocumentProcessing {
            message: message.into(),
        }
    }

    pub fn not_found(resource: impl Into<String>) -> Self {
        Self::NotFound {
            resource: resource.into(),
        }
    }

    pub fn data_load(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self::DataLoad {
            path: path.into(),
            message: message.into(),
        }
    }

    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Transport { .. } => "TRANSPORT_ERROR",
            Self::UpstreamStatus { .. } => "UPSTREAM_STATUS",
            Self::DocumentProcessing { .. } => "DOCUMENT_PROCESSING_ERROR",
            Self::NotFound { .. } => "NOT_FOUND",
            Self::DataLoad { .. } => "DATA_LOAD_ERROR",
            Self::Configuration { .. } => "CONFIGURATION_ERROR",
            Self::Internal { .. } => "INTERNAL_SERVER_ERROR",
        }
    }

    pub fn http_status_code(&self) -> u16 {
        match self {
            Self::Transport { .. } => 502,
            Self::UpstreamStatus { .. } => 502,
            Self::DocumentProcessing { .. } => 422,
            Self::NotFound { .. } => 404,
            Self::DataLoad { .. } => 500,
            Self::Configuration { .. } => 500,
            Self::Internal { .. } => 500,
        }
    }
}

pub type ToxrefResult<T> = Result<T, ToxrefError>;

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
    pub message: String,
    pub details: Option<serde_json::Value>,
}

impl From<ToxrefError> for ErrorResponse {
    fn from(error: ToxrefError) -> Self {
        let details = match &error {
            ToxrefError::UpstreamStatus { url, status } => {
                Some(serde_json::json!({ "url": url, "status": status }))
            }
            _ => None,
        };
        Self {
            error: error.error_code().to_string(),
            code: error.error_code().to_string(),
            message: error.to_string(),
            details,
        }
    }
}

// Conversion from common error types
impl From<reqwest::Error> for ToxrefError {
    fn from(error: reqwest::Error) -> Self {
        match error.status() {
            Some(status) => Self::upstream_status(
                error.url().map(|u| u.to_string()).unwrap_or_default(),
                status.as_u16(),
            ),
            None => Self::transport(error.to_string()),
        }
    }
}

impl From<IndexError> for ToxrefError {
    fn from(error: IndexError) -> Self {
        let path = error.path().unwrap_or("inline index").to_string();
        match error {
            IndexError::Io { message, .. } | IndexError::Malformed { message, .. } => {
                Self::data_load(path, message)
            }
        }
    }
}
