use thiserror::Error;

pub type Result<T> = std::result::Result<T, TrackerError>;

/// Failures surfaced by the record store, mutation API and transfer paths.
#[derive(Debug, Error)]
pub enum TrackerError {
    #[error("{field}: {message}")]
    Validation {
        field: &'static str,
        message: String,
    },
    #[error("Storage error: {0}")]
    Storage(#[from] rusqlite::Error),
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
    #[error("Invalid import file: {0}")]
    Import(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

impl TrackerError {
    pub fn validation(field: &'static str, message: impl Into<String>) -> Self {
        Self::Validation {
            field,
            message: message.into(),
        }
    }

    #[cfg(test)]
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation { .. })
    }
}
