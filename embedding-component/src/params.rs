//! Embedding model parameter schemas
//!
//! A model name is mapped to a parameter schema through a static table. Names
//! missing from the table use the generic [`ParamSchema::Local`] schema.
//! Keyword parameters are validated against the chosen schema; unknown keys
//! are rejected.

use crate::error::{EmbeddingError, Result};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::fmt;

/// Parameter schema a model name resolves to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamSchema {
    /// Generic schema for models run in-process
    Local,
    /// OpenAI-compatible HTTP embedding endpoints
    Proxy,
}

/// Model names with a dedicated schema.
const EMBEDDING_NAME_TO_SCHEMA: &[(&str, ParamSchema)] = &[
    ("proxy_openai", ParamSchema::Proxy),
    ("proxy_azure", ParamSchema::Proxy),
    ("proxy_http_openapi", ParamSchema::Proxy),
];

/// Resolve the parameter schema for a model name.
pub fn schema_for_model(model_name: &str) -> ParamSchema {
    EMBEDDING_NAME_TO_SCHEMA
        .iter()
        .find(|(name, _)| *name == model_name)
        .map(|(_, schema)| *schema)
        .unwrap_or(ParamSchema::Local)
}

/// Pooling applied to token embeddings of user-supplied ONNX models
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PoolingStrategy {
    #[default]
    Mean,
    Cls,
}

/// Parameters for a model loaded in-process
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LocalEmbeddingParams {
    pub model_name: String,
    /// Directory holding the model files
    #[serde(default)]
    pub model_path: Option<String>,
    #[serde(default = "default_max_length")]
    pub max_length: usize,
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,
    #[serde(default)]
    pub pooling: PoolingStrategy,
    #[serde(default = "default_true")]
    pub normalize_embeddings: bool,
    /// Download cache for built-in models (defaults to `model_path`)
    #[serde(default)]
    pub cache_dir: Option<String>,
}

/// Parameters for an OpenAI-compatible embedding endpoint
#[derive(Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProxyEmbeddingParams {
    pub model_name: String,
    #[serde(default)]
    pub model_path: Option<String>,
    pub proxy_server_url: String,
    #[serde(default)]
    pub proxy_api_key: Option<String>,
    /// Model name sent to the endpoint
    #[serde(default = "default_proxy_backend")]
    pub proxy_backend: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl fmt::Debug for ProxyEmbeddingParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProxyEmbeddingParams")
            .field("model_name", &self.model_name)
            .field("proxy_server_url", &self.proxy_server_url)
            .field("proxy_api_key", &self.proxy_api_key.as_ref().map(|_| "***"))
            .field("proxy_backend", &self.proxy_backend)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

fn default_max_length() -> usize {
    512
}

fn default_batch_size() -> usize {
    256
}

fn default_true() -> bool {
    true
}

fn default_proxy_backend() -> String {
    "text-embedding-3-small".to_string()
}

fn default_timeout_secs() -> u64 {
    60
}

/// Validated parameter record handed to the model loader
#[derive(Debug, Clone, PartialEq)]
pub enum EmbeddingModelParams {
    Local(LocalEmbeddingParams),
    Proxy(ProxyEmbeddingParams),
}

impl EmbeddingModelParams {
    pub fn model_name(&self) -> &str {
        match self {
            EmbeddingModelParams::Local(p) => &p.model_name,
            EmbeddingModelParams::Proxy(p) => &p.model_name,
        }
    }

    pub fn schema(&self) -> ParamSchema {
        match self {
            EmbeddingModelParams::Local(_) => ParamSchema::Local,
            EmbeddingModelParams::Proxy(_) => ParamSchema::Proxy,
        }
    }
}

/// Parse and validate model name, path and keyword parameters against `schema`.
///
/// Values are read as JSON literals when they are booleans, numbers or quoted
/// strings; anything else is taken verbatim as a string.
pub fn parse_embedding_params(
    model_name: &str,
    model_path: Option<&str>,
    schema: ParamSchema,
    params: &BTreeMap<String, String>,
) -> Result<EmbeddingModelParams> {
    let mut fields = Map::new();

    for (key, raw) in params {
        if key == "model_name" || key == "model_path" {
            return Err(EmbeddingError::config(format!(
                "`{key}` must not be passed as a keyword parameter"
            )));
        }
        fields.insert(key.clone(), parse_literal(raw));
    }

    fields.insert("model_name".into(), Value::String(model_name.to_string()));
    if let Some(path) = model_path.filter(|p| !p.is_empty()) {
        fields.insert("model_path".into(), Value::String(path.to_string()));
    }

    let value = Value::Object(fields);
    let invalid =
        |e: serde_json::Error| EmbeddingError::config(format!("model `{model_name}`: {e}"));

    let parsed = match schema {
        ParamSchema::Local => {
            let p: LocalEmbeddingParams = serde_json::from_value(value).map_err(invalid)?;
            if p.max_length == 0 || p.batch_size == 0 {
                return Err(EmbeddingError::config(format!(
                    "model `{model_name}`: max_length and batch_size must be positive"
                )));
            }
            EmbeddingModelParams::Local(p)
        }
        ParamSchema::Proxy => {
            let p: ProxyEmbeddingParams = serde_json::from_value(value).map_err(invalid)?;
            if !(p.proxy_server_url.starts_with("http://")
                || p.proxy_server_url.starts_with("https://"))
            {
                return Err(EmbeddingError::config(format!(
                    "model `{model_name}`: proxy_server_url must be an http(s) URL, got `{}`",
                    p.proxy_server_url
                )));
            }
            if p.timeout_secs == 0 {
                return Err(EmbeddingError::config(format!(
                    "model `{model_name}`: timeout_secs must be positive"
                )));
            }
            EmbeddingModelParams::Proxy(p)
        }
    };

    Ok(parsed)
}

fn parse_literal(raw: &str) -> Value {
    match serde_json::from_str::<Value>(raw) {
        Ok(v @ (Value::Bool(_) | Value::Number(_) | Value::String(_))) => v,
        _ => Value::String(raw.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kv(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_schema_lookup() {
        assert_eq!(schema_for_model("proxy_openai"), ParamSchema::Proxy);
        assert_eq!(schema_for_model("proxy_http_openapi"), ParamSchema::Proxy);
        assert_eq!(schema_for_model("text2vec"), ParamSchema::Local);
        assert_eq!(schema_for_model(""), ParamSchema::Local);
    }

    #[test]
    fn test_local_defaults() {
        let params =
            parse_embedding_params("m1", Some("/models/m1"), ParamSchema::Local, &kv(&[]))
                .unwrap();

        match params {
            EmbeddingModelParams::Local(p) => {
                assert_eq!(p.model_name, "m1");
                assert_eq!(p.model_path.as_deref(), Some("/models/m1"));
                assert_eq!(p.max_length, 512);
                assert_eq!(p.batch_size, 256);
                assert_eq!(p.pooling, PoolingStrategy::Mean);
                assert!(p.normalize_embeddings);
            }
            other => panic!("Expected local params, got {:?}", other),
        }
    }

    #[test]
    fn test_local_typed_values() {
        let params = parse_embedding_params(
            "m1",
            None,
            ParamSchema::Local,
            &kv(&[
                ("max_length", "128"),
                ("normalize_embeddings", "false"),
                ("pooling", "cls"),
            ]),
        )
        .unwrap();

        let EmbeddingModelParams::Local(p) = params else {
            panic!("Expected local params");
        };
        assert_eq!(p.max_length, 128);
        assert!(!p.normalize_embeddings);
        assert_eq!(p.pooling, PoolingStrategy::Cls);
        assert!(p.model_path.is_none());
    }

    #[test]
    fn test_unknown_key_rejected() {
        let err = parse_embedding_params(
            "m1",
            None,
            ParamSchema::Local,
            &kv(&[("temperature", "0.2")]),
        )
        .unwrap_err();

        assert!(matches!(err, EmbeddingError::Config(_)));
        assert!(err.to_string().contains("temperature"));
    }

    #[test]
    fn test_wrong_type_rejected() {
        let err = parse_embedding_params(
            "m1",
            None,
            ParamSchema::Local,
            &kv(&[("max_length", "long")]),
        )
        .unwrap_err();
        assert!(matches!(err, EmbeddingError::Config(_)));
    }

    #[test]
    fn test_zero_batch_size_rejected() {
        let err =
            parse_embedding_params("m1", None, ParamSchema::Local, &kv(&[("batch_size", "0")]))
                .unwrap_err();
        assert!(err.to_string().contains("batch_size"));
    }

    #[test]
    fn test_reserved_keys_rejected() {
        let err = parse_embedding_params(
            "m1",
            None,
            ParamSchema::Local,
            &kv(&[("model_name", "other")]),
        )
        .unwrap_err();
        assert!(err.to_string().contains("model_name"));
    }

    #[test]
    fn test_proxy_requires_url() {
        let err = parse_embedding_params("proxy_openai", None, ParamSchema::Proxy, &kv(&[]))
            .unwrap_err();
        assert!(err.to_string().contains("proxy_server_url"));

        let err = parse_embedding_params(
            "proxy_openai",
            None,
            ParamSchema::Proxy,
            &kv(&[("proxy_server_url", "ftp://host")]),
        )
        .unwrap_err();
        assert!(matches!(err, EmbeddingError::Config(_)));
    }

    #[test]
    fn test_proxy_quoted_numeric_key() {
        let params = parse_embedding_params(
            "proxy_openai",
            None,
            ParamSchema::Proxy,
            &kv(&[
                ("proxy_server_url", "https://api.example.com/v1/embeddings"),
                ("proxy_api_key", "\"12345\""),
            ]),
        )
        .unwrap();

        let EmbeddingModelParams::Proxy(p) = params else {
            panic!("Expected proxy params");
        };
        assert_eq!(p.proxy_api_key.as_deref(), Some("12345"));
        assert_eq!(p.proxy_backend, "text-embedding-3-small");
        assert_eq!(p.timeout_secs, 60);
    }

    #[test]
    fn test_proxy_zero_timeout_rejected() {
        let err = parse_embedding_params(
            "proxy_openai",
            None,
            ParamSchema::Proxy,
            &kv(&[
                ("proxy_server_url", "https://api.example.com/v1/embeddings"),
                ("timeout_secs", "0"),
            ]),
        )
        .unwrap_err();

        assert!(matches!(err, EmbeddingError::Config(_)));
        assert!(err.to_string().contains("timeout_secs"));
    }

    #[test]
    fn test_model_name_and_schema_per_variant() {
        let local =
            parse_embedding_params("m1", None, ParamSchema::Local, &kv(&[])).unwrap();
        assert_eq!(local.model_name(), "m1");
        assert_eq!(local.schema(), ParamSchema::Local);

        let proxy = parse_embedding_params(
            "proxy_azure",
            None,
            ParamSchema::Proxy,
            &kv(&[("proxy_server_url", "https://example.openai.azure.com/embeddings")]),
        )
        .unwrap();
        assert_eq!(proxy.model_name(), "proxy_azure");
        assert_eq!(proxy.schema(), ParamSchema::Proxy);
    }

    #[test]
    fn test_proxy_debug_redacts_key() {
        let params = parse_embedding_params(
            "proxy_openai",
            None,
            ParamSchema::Proxy,
            &kv(&[
                ("proxy_server_url", "https://api.example.com/v1/embeddings"),
                ("proxy_api_key", "sk-secret"),
            ]),
        )
        .unwrap();

        let debug = format!("{:?}", params);
        assert!(!debug.contains("sk-secret"));
        assert!(debug.contains("***"));
    }
}
