//! Application bootstrap.

use crate::error::ServerResult;
use embedding_component::{
    initialize_embedding_model, EmbeddingConfig, HttpWorkerDispatcher, SystemApp,
    WorkerDispatcher,
};
use std::sync::Arc;

/// Build the application context and register the embedding factory.
///
/// A worker dispatcher is registered first when a controller address is
/// configured. Loading a local model blocks, so the selector runs on the
/// blocking pool; a load failure aborts startup.
pub async fn bootstrap(
    config: EmbeddingConfig,
    controller_timeout_secs: u64,
) -> ServerResult<Arc<SystemApp>> {
    let system_app = SystemApp::new(config);

    if let Some(addr) = system_app.config().controller_addr.clone() {
        let dispatcher = HttpWorkerDispatcher::new(
            addr,
            system_app.config().controller_api_key.clone(),
            controller_timeout_secs,
        )?;
        system_app.register::<dyn WorkerDispatcher>(Arc::new(dispatcher));
    } else if system_app.config().remote_embedding {
        tracing::warn!(
            "Remote embedding selected without a controller address; requests fail until a worker dispatcher is registered"
        );
    }

    let app = Arc::clone(&system_app);
    tokio::task::spawn_blocking(move || initialize_embedding_model(&app)).await??;

    Ok(system_app)
}
