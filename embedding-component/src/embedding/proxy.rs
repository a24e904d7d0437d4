//! Embeddings served by an OpenAI-compatible HTTP endpoint

use super::openai::{build_agent, request_embeddings};
use super::EmbeddingEngine;
use crate::error::{EmbeddingError, Result};
use crate::params::ProxyEmbeddingParams;
use std::fmt;

/// Engine that forwards every batch to `proxy_server_url`.
pub struct ProxyEmbeddings {
    agent: ureq::Agent,
    model_name: String,
    endpoint: String,
    api_key: Option<String>,
    backend_model: String,
}

impl ProxyEmbeddings {
    pub fn new(params: &ProxyEmbeddingParams) -> Self {
        if params.proxy_api_key.is_none() {
            log::warn!("No API key configured for {}", params.proxy_server_url);
        }

        Self {
            agent: build_agent(params.timeout_secs),
            model_name: params.model_name.clone(),
            endpoint: params.proxy_server_url.clone(),
            api_key: params.proxy_api_key.clone(),
            backend_model: params.proxy_backend.clone(),
        }
    }
}

impl EmbeddingEngine for ProxyEmbeddings {
    fn embed_documents(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        if texts.is_empty() {
            return Ok(vec![]);
        }

        request_embeddings(
            &self.agent,
            &self.endpoint,
            self.api_key.as_deref(),
            &self.backend_model,
            texts,
        )
        .map_err(EmbeddingError::Embedding)
    }

    fn model_name(&self) -> &str {
        &self.model_name
    }
}

impl fmt::Debug for ProxyEmbeddings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProxyEmbeddings")
            .field("model_name", &self.model_name)
            .field("endpoint", &self.endpoint)
            .field("backend_model", &self.backend_model)
            .finish()
    }
}
