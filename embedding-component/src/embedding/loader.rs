//! Model loader: turns a validated parameter record into a ready engine.

use super::onnx::FastEmbedEngine;
use super::proxy::ProxyEmbeddings;
use super::EmbeddingEngine;
use crate::error::Result;
use crate::params::EmbeddingModelParams;
use std::sync::Arc;

/// Produces embedding engines from parameter records.
///
/// Loading is synchronous and all-or-nothing.
pub trait ModelLoader: Send + Sync {
    fn load(
        &self,
        model_name: &str,
        params: &EmbeddingModelParams,
    ) -> Result<Arc<dyn EmbeddingEngine>>;
}

/// Default loader: fastembed for local schemas, HTTP for proxy schemas.
#[derive(Debug, Default, Clone, Copy)]
pub struct EmbeddingLoader;

impl ModelLoader for EmbeddingLoader {
    fn load(
        &self,
        model_name: &str,
        params: &EmbeddingModelParams,
    ) -> Result<Arc<dyn EmbeddingEngine>> {
        log::info!("Loading embedding model {}", model_name);

        match params {
            EmbeddingModelParams::Local(local) => Ok(Arc::new(FastEmbedEngine::load(local)?)),
            EmbeddingModelParams::Proxy(proxy) => Ok(Arc::new(ProxyEmbeddings::new(proxy))),
        }
    }
}
