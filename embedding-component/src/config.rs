//! Startup configuration for the embedding component.

use crate::error::{EmbeddingError, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

/// Default embedding model when none is configured.
pub const DEFAULT_EMBEDDING_MODEL: &str = "BAAI/bge-small-en-v1.5";

/// Options consumed once at startup to select and build the embedding factory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EmbeddingConfig {
    /// Select the remote strategy instead of loading a model in-process.
    pub remote_embedding: bool,
    /// Default model identifier served by whichever strategy is selected.
    pub embedding_model_name: String,
    /// Model directory, used only by the local strategy.
    pub embedding_model_path: Option<String>,
    /// Backend-specific keyword parameters.
    pub embedding_params: BTreeMap<String, String>,
    /// Base URL of the worker controller (remote strategy).
    pub controller_addr: Option<String>,
    /// Bearer token for the worker controller.
    pub controller_api_key: Option<String>,
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            remote_embedding: false,
            embedding_model_name: DEFAULT_EMBEDDING_MODEL.to_string(),
            embedding_model_path: None,
            embedding_params: BTreeMap::new(),
            controller_addr: None,
            controller_api_key: None,
        }
    }
}

impl EmbeddingConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        let config: EmbeddingConfig = serde_json::from_str(&content)?;
        Ok(config)
    }

    /// Model path as configured, or an empty string when unset.
    pub fn model_path(&self) -> &str {
        self.embedding_model_path.as_deref().unwrap_or_default()
    }
}

/// Parse a single `key=value` pair.
pub fn parse_key_val(s: &str) -> Result<(String, String)> {
    let (key, value) = s
        .split_once('=')
        .ok_or_else(|| EmbeddingError::config(format!("invalid key=value pair: no `=` in `{s}`")))?;

    let key = key.trim();
    if key.is_empty() {
        return Err(EmbeddingError::config(format!("empty key in `{s}`")));
    }

    Ok((key.to_string(), value.trim().to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_default_is_local() {
        let config = EmbeddingConfig::default();
        assert!(!config.remote_embedding);
        assert_eq!(config.embedding_model_name, DEFAULT_EMBEDDING_MODEL);
        assert_eq!(config.model_path(), "");
    }

    #[test]
    fn test_from_file_partial() {
        let mut file = NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"remote_embedding": true, "embedding_model_name": "m1",
                "embedding_params": {{"batch_size": "32"}}}}"#
        )
        .unwrap();

        let config = EmbeddingConfig::from_file(file.path()).unwrap();
        assert!(config.remote_embedding);
        assert_eq!(config.embedding_model_name, "m1");
        assert_eq!(config.embedding_params.get("batch_size").unwrap(), "32");
        assert!(config.controller_addr.is_none());
    }

    #[test]
    fn test_from_file_invalid_json() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "not json").unwrap();

        let err = EmbeddingConfig::from_file(file.path()).unwrap_err();
        assert!(matches!(err, EmbeddingError::Json(_)));
    }

    #[test]
    fn test_parse_key_val() {
        assert_eq!(
            parse_key_val("max_length=256").unwrap(),
            ("max_length".to_string(), "256".to_string())
        );
        assert_eq!(
            parse_key_val("proxy_server_url=http://h/v1?a=b").unwrap().1,
            "http://h/v1?a=b"
        );
        assert!(parse_key_val("novalue").is_err());
        assert!(parse_key_val("=x").is_err());
    }
}
