use thiserror::Error;

#[derive(Error, Debug)]
pub enum EtlError {
    #[error("API request failed: {0}")]
    TransportError(#[from] reqwest::Error),

    #[error("Archive write failed: {message}")]
    StorageError { message: String },

    #[error("Schema mismatch: {message}")]
    SchemaError { message: String },

    #[error("Warehouse load failed: {message}")]
    LoadError { message: String },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Missing configuration: {field} is not set")]
    MissingConfigError { field: String },

    #[error("Invalid configuration value for {field} ({value}): {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },
}

/// Coarse error classification used when the orchestrator logs a failed run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Transport,
    Storage,
    Schema,
    Load,
    Config,
    Internal,
}

impl EtlError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            EtlError::TransportError(_) => ErrorCategory::Transport,
            EtlError::StorageError { .. } | EtlError::IoError(_) => ErrorCategory::Storage,
            EtlError::SchemaError { .. } => ErrorCategory::Schema,
            EtlError::LoadError { .. } => ErrorCategory::Load,
            EtlError::MissingConfigError { .. } | EtlError::InvalidConfigValueError { .. } => {
                ErrorCategory::Config
            }
            EtlError::SerializationError(_) => ErrorCategory::Internal,
        }
    }
}

pub type Result<T> = std::result::Result<T, EtlError>;
