//! Error types for the embedding server.

use crate::rpc::protocol::JsonRpcError;
use embedding_component::EmbeddingError;
use thiserror::Error;

/// Errors that can occur while starting up or answering a request.
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("Invalid params: {0}")]
    InvalidParams(String),

    #[error(transparent)]
    Embedding(#[from] EmbeddingError),

    #[error("Worker task failed: {0}")]
    Task(#[from] tokio::task::JoinError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<ServerError> for JsonRpcError {
    fn from(err: ServerError) -> Self {
        match &err {
            ServerError::InvalidParams(_) => JsonRpcError::invalid_params(err.to_string()),
            ServerError::Embedding(EmbeddingError::Config(_)) => {
                JsonRpcError::invalid_params(err.to_string())
            }
            _ => JsonRpcError::internal_error(err.to_string()),
        }
    }
}

/// Result type alias for server operations.
pub type ServerResult<T> = Result<T, ServerError>;

#[cfg(test)]
mod tests {
    use super::*;
    use embedding_component::ComponentType;

    #[test]
    fn test_invalid_params_display() {
        let err = ServerError::InvalidParams("missing field `texts`".to_string());
        assert_eq!(err.to_string(), "Invalid params: missing field `texts`");
    }

    #[test]
    fn test_embedding_error_is_transparent() {
        let err: ServerError = EmbeddingError::NotImplemented.into();
        assert_eq!(err.to_string(), EmbeddingError::NotImplemented.to_string());
    }

    #[test]
    fn test_jsonrpc_conversion_invalid_params() {
        let err: JsonRpcError = ServerError::InvalidParams("bad".to_string()).into();
        assert_eq!(err.code, -32602);
    }

    #[test]
    fn test_jsonrpc_conversion_component_not_found_internal() {
        let err: JsonRpcError = ServerError::from(EmbeddingError::ComponentNotFound(
            ComponentType::WorkerManagerFactory,
        ))
        .into();
        assert_eq!(err.code, -32603);
        assert!(err.message.contains("worker_manager_factory"));
    }

    #[test]
    fn test_from_io_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::BrokenPipe, "closed");
        let err: ServerError = io_err.into();
        assert!(matches!(err, ServerError::Io(_)));

        let rpc: JsonRpcError = err.into();
        assert_eq!(rpc.code, -32603);
    }
}
