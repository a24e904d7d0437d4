//! Embedding engines and the model loader
//!
//! Local models run through fastembed (ONNX Runtime); proxy models call an
//! OpenAI-compatible HTTP endpoint.

mod discovery;
mod loader;
mod onnx;
pub(crate) mod openai;
mod proxy;

use crate::error::Result;
use std::fmt::Debug;

pub use discovery::{find_model_source, ModelSource, ONNX_MODEL_FILE, TOKENIZER_FILES};
pub use loader::{EmbeddingLoader, ModelLoader};
pub use onnx::FastEmbedEngine;
pub use proxy::ProxyEmbeddings;

/// An object that converts text into vector embeddings.
///
/// Engines are shared by every caller of the factory that produced them, so
/// implementations must be safe to use from many threads at once.
pub trait EmbeddingEngine: Send + Sync + Debug {
    /// Embed a batch of documents
    fn embed_documents(&self, texts: &[String]) -> Result<Vec<Vec<f32>>>;

    /// Embed a single search query
    ///
    /// The default implementation embeds the query as a one-element batch.
    fn embed_query(&self, text: &str) -> Result<Vec<f32>> {
        let mut embeddings = self.embed_documents(&[text.to_string()])?;
        embeddings
            .pop()
            .ok_or_else(|| crate::EmbeddingError::embedding("engine returned no embedding"))
    }

    /// Model this engine serves
    fn model_name(&self) -> &str;

    /// Embedding dimension, when known without a request
    fn dimension(&self) -> Option<usize> {
        None
    }
}
