//! Error types for embedding-component

use crate::component::ComponentType;
use thiserror::Error;

/// Errors that can occur while building or using an embedding factory
#[derive(Debug, Error)]
pub enum EmbeddingError {
    /// Invalid or unschematized model parameters
    #[error("Configuration error: {0}")]
    Config(String),

    /// No component registered under the key
    #[error("Component not found: {0}")]
    ComponentNotFound(ComponentType),

    /// A component is registered under the key but has a different type
    #[error("Component type mismatch for: {0}")]
    ComponentTypeMismatch(ComponentType),

    /// The owning application context has been dropped
    #[error("Application context is no longer available")]
    ContextUnavailable,

    /// Caller tried to override the embedding implementation
    #[error("Not implemented: custom embedding implementations are not supported")]
    NotImplemented,

    /// Model loading error
    #[error("Model error: {0}")]
    Model(String),

    /// Embedding generation error
    #[error("Embedding error: {0}")]
    Embedding(String),

    /// Remote dispatch error
    #[error("Dispatch error: {0}")]
    Dispatch(String),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl EmbeddingError {
    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a model error
    pub fn model(msg: impl Into<String>) -> Self {
        Self::Model(msg.into())
    }

    /// Create an embedding error
    pub fn embedding(msg: impl Into<String>) -> Self {
        Self::Embedding(msg.into())
    }

    /// Create a dispatch error
    pub fn dispatch(msg: impl Into<String>) -> Self {
        Self::Dispatch(msg.into())
    }
}

/// Result type for embedding component operations
pub type Result<T> = std::result::Result<T, EmbeddingError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_component_not_found_display() {
        let err = EmbeddingError::ComponentNotFound(ComponentType::WorkerManagerFactory);
        assert_eq!(err.to_string(), "Component not found: worker_manager_factory");
    }

    #[test]
    fn test_not_implemented_display() {
        let err = EmbeddingError::NotImplemented;
        assert!(err.to_string().starts_with("Not implemented"));
    }

    #[test]
    fn test_helper_constructors() {
        assert_eq!(
            EmbeddingError::config("bad key").to_string(),
            "Configuration error: bad key"
        );
        assert_eq!(EmbeddingError::model("missing").to_string(), "Model error: missing");
        assert_eq!(
            EmbeddingError::dispatch("refused").to_string(),
            "Dispatch error: refused"
        );
    }

    #[test]
    fn test_from_io_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: EmbeddingError = io_err.into();
        assert!(matches!(err, EmbeddingError::Io(_)));
    }
}
