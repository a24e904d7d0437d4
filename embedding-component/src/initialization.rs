//! Startup selection of the embedding strategy.

use crate::component::SystemApp;
use crate::embedding::{EmbeddingLoader, ModelLoader};
use crate::error::Result;
use crate::factory::{EmbeddingFactory, LocalEmbeddingFactory, RemoteEmbeddingFactory};
use std::sync::Arc;

/// Register exactly one embedding factory according to `system_app.config()`.
///
/// With `remote_embedding` set, a [`RemoteEmbeddingFactory`] is registered and
/// nothing is loaded. Otherwise the local model is loaded here, and a load
/// failure is returned without registering anything.
pub fn initialize_embedding_model(system_app: &Arc<SystemApp>) -> Result<()> {
    initialize_embedding_model_with_loader(system_app, &EmbeddingLoader)
}

/// Same as [`initialize_embedding_model`], loading local models with `loader`.
pub fn initialize_embedding_model_with_loader(
    system_app: &Arc<SystemApp>,
    loader: &dyn ModelLoader,
) -> Result<()> {
    let config = system_app.config();
    let model_name = config.embedding_model_name.clone();
    let params = config.embedding_params.clone();

    let factory: Arc<dyn EmbeddingFactory> = if config.remote_embedding {
        log::info!("Register remote RemoteEmbeddingFactory ({})", model_name);
        Arc::new(RemoteEmbeddingFactory::new(system_app, model_name, params))
    } else {
        log::info!("Register local LocalEmbeddingFactory ({})", model_name);
        Arc::new(LocalEmbeddingFactory::with_loader(
            model_name,
            config.embedding_model_path.clone(),
            params,
            loader,
        )?)
    };

    system_app.register(factory);
    Ok(())
}
