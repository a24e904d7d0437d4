//! Worker dispatcher capability and the remote embedding engine
//!
//! The dispatcher is looked up from the registry by the remote strategy on
//! every `create`. [`HttpWorkerDispatcher`] talks to a worker controller that
//! exposes an OpenAI-compatible `/api/v1/embeddings` route.

use crate::component::{Capability, ComponentType};
use crate::embedding::openai::{build_agent, request_embeddings};
use crate::embedding::EmbeddingEngine;
use crate::error::{EmbeddingError, Result};
use std::fmt::{self, Debug};
use std::sync::Arc;

/// Routes embedding batches to the remote execution pool.
pub trait DispatcherHandle: Send + Sync + Debug {
    fn embeddings(&self, model_name: &str, texts: &[String]) -> Result<Vec<Vec<f32>>>;
}

/// Hands out dispatcher handles for a model.
pub trait WorkerDispatcher: Send + Sync {
    /// May block on a round-trip to the controller.
    fn dispatcher_handle(&self, model_name: &str) -> Result<Arc<dyn DispatcherHandle>>;
}

impl Capability for dyn WorkerDispatcher {
    const KEY: ComponentType = ComponentType::WorkerManagerFactory;
}

/// Engine bound to one model and one dispatcher handle.
#[derive(Debug)]
pub struct RemoteEmbeddings {
    model_name: String,
    handle: Arc<dyn DispatcherHandle>,
}

impl RemoteEmbeddings {
    pub fn new(model_name: String, handle: Arc<dyn DispatcherHandle>) -> Self {
        Self { model_name, handle }
    }
}

impl EmbeddingEngine for RemoteEmbeddings {
    fn embed_documents(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        if texts.is_empty() {
            return Ok(vec![]);
        }
        self.handle.embeddings(&self.model_name, texts)
    }

    fn model_name(&self) -> &str {
        &self.model_name
    }
}

/// Dispatcher backed by a worker controller reachable over HTTP.
pub struct HttpWorkerDispatcher {
    agent: ureq::Agent,
    controller_addr: String,
    api_key: Option<String>,
}

impl HttpWorkerDispatcher {
    pub fn new(
        controller_addr: impl Into<String>,
        api_key: Option<String>,
        timeout_secs: u64,
    ) -> Result<Self> {
        let controller_addr = controller_addr.into().trim_end_matches('/').to_string();
        if !(controller_addr.starts_with("http://") || controller_addr.starts_with("https://")) {
            return Err(EmbeddingError::config(format!(
                "controller address must be an http(s) URL, got `{controller_addr}`"
            )));
        }
        if timeout_secs == 0 {
            return Err(EmbeddingError::config(
                "controller timeout must be at least one second",
            ));
        }

        log::info!("Worker controller: {}", controller_addr);

        Ok(Self {
            agent: build_agent(timeout_secs),
            controller_addr,
            api_key,
        })
    }

    pub fn controller_addr(&self) -> &str {
        &self.controller_addr
    }
}

impl WorkerDispatcher for HttpWorkerDispatcher {
    fn dispatcher_handle(&self, model_name: &str) -> Result<Arc<dyn DispatcherHandle>> {
        if model_name.is_empty() {
            return Err(EmbeddingError::dispatch("no model name to dispatch to"));
        }

        Ok(Arc::new(HttpDispatcherHandle {
            agent: self.agent.clone(),
            url: format!("{}/api/v1/embeddings", self.controller_addr),
            api_key: self.api_key.clone(),
        }))
    }
}

struct HttpDispatcherHandle {
    agent: ureq::Agent,
    url: String,
    api_key: Option<String>,
}

impl DispatcherHandle for HttpDispatcherHandle {
    fn embeddings(&self, model_name: &str, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        request_embeddings(
            &self.agent,
            &self.url,
            self.api_key.as_deref(),
            model_name,
            texts,
        )
        .map_err(EmbeddingError::Dispatch)
    }
}

impl Debug for HttpDispatcherHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpDispatcherHandle")
            .field("url", &self.url)
            .finish()
    }
}
