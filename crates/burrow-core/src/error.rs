use thiserror::Error;

/// Result type for repository operations.
pub type Result<T> = std::result::Result<T, StorageError>;

/// Errors reported by a URL repository.
///
/// Backend-specific errors never cross this boundary: each backend
/// classifies its own failures into one of these variants.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StorageError {
    #[error("alias already exists: {0}")]
    AliasExists(String),
    #[error("alias not found: {0}")]
    NotFound(String),
    #[error("{op}: {message}")]
    Failure { op: &'static str, message: String },
}

impl StorageError {
    /// Builds a [`StorageError::Failure`] tagged with the failing operation.
    pub fn failure(op: &'static str, message: impl Into<String>) -> Self {
        Self::Failure {
            op,
            message: message.into(),
        }
    }

    pub fn is_alias_exists(&self) -> bool {
        matches!(self, Self::AliasExists(_))
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}
