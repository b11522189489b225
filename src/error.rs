use thiserror::Error;

pub type Result<T> = std::result::Result<T, FlowlogError>;

#[derive(Debug, Error)]
pub enum FlowlogError {
    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("Server responded with {status}: {message}")]
    ServerError { status: u16, message: String },

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Index {index} out of bounds for sequence of length {len}")]
    IndexOutOfBounds { index: usize, len: usize },

    #[error("List not found: {0}")]
    ListNotFound(String),

    #[error("Card not found: {0}")]
    CardNotFound(String),

    #[error("Board not found: {0}")]
    BoardNotFound(String),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// The spawned persistence task panicked or was cancelled
    #[error("Persistence task failed: {0}")]
    TaskFailed(String),
}

impl FlowlogError {
    /// True for failures of a persistence call (transport or non-2xx)
    pub fn is_persistence_error(&self) -> bool {
        matches!(self, Self::NetworkError(_) | Self::ServerError { .. })
    }

    /// True for client-side validation failures raised before any request
    pub fn is_validation_error(&self) -> bool {
        matches!(
            self,
            Self::ValidationError(_)
                | Self::IndexOutOfBounds { .. }
                | Self::ListNotFound(_)
                | Self::CardNotFound(_)
        )
    }
}

impl From<reqwest::Error> for FlowlogError {
    fn from(err: reqwest::Error) -> Self {
        if let Some(status) = err.status() {
            Self::ServerError {
                status: status.as_u16(),
                message: err.to_string(),
            }
        } else {
            Self::NetworkError(err.to_string())
        }
    }
}
