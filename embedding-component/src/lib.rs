//! Embedding Component
//!
//! Selects and builds the application's embedding provider once at startup and
//! exposes it through a single capability, `dyn EmbeddingFactory`, regardless
//! of whether embeddings are computed in-process or by a remote worker pool.
//!
//! ## Strategies
//!
//! - **Local** - loads one model eagerly (fastembed / ONNX Runtime, or an
//!   OpenAI-compatible proxy) and hands the same engine to every caller
//! - **Remote** - stores only the model name; each `create` looks up the worker
//!   dispatcher and returns a new engine bound to a fresh dispatcher handle
//!
//! ## Example
//!
//! ```ignore
//! use embedding_component::{initialize_embedding_model, EmbeddingConfig, EmbeddingFactory, SystemApp};
//!
//! let app = SystemApp::new(EmbeddingConfig {
//!     embedding_model_name: "BAAI/bge-small-en-v1.5".into(),
//!     embedding_model_path: Some("/models/bge-small-en-v1.5".into()),
//!     ..Default::default()
//! });
//! initialize_embedding_model(&app)?;
//!
//! let engine = app.get_component::<dyn EmbeddingFactory>()?.create(None, None)?;
//! let vector = engine.embed_query("hello world")?;
//! ```

pub mod component;
pub mod config;
pub mod embedding;
pub mod error;
pub mod factory;
pub mod initialization;
pub mod params;
pub mod worker;

// Re-exports for convenience
pub use component::{Capability, ComponentType, SystemApp};
pub use config::{EmbeddingConfig, DEFAULT_EMBEDDING_MODEL};
pub use embedding::{EmbeddingEngine, EmbeddingLoader, ModelLoader};
pub use error::{EmbeddingError, Result};
pub use factory::{
    EmbeddingClass, EmbeddingFactory, LocalEmbeddingFactory, RemoteEmbeddingFactory, Strategy,
    EMBEDDING_FACTORY_KEY,
};
pub use initialization::{initialize_embedding_model, initialize_embedding_model_with_loader};
pub use params::{EmbeddingModelParams, ParamSchema};
pub use worker::{DispatcherHandle, HttpWorkerDispatcher, RemoteEmbeddings, WorkerDispatcher};
