//! Remote strategy: a fresh dispatcher-backed engine per `create`.

use super::{check_create_args, EmbeddingClass, EmbeddingFactory, Strategy};
use crate::component::SystemApp;
use crate::embedding::EmbeddingEngine;
use crate::error::{EmbeddingError, Result};
use crate::worker::{RemoteEmbeddings, WorkerDispatcher};
use parking_lot::RwLock;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::{Arc, Weak};

/// Factory that routes embedding requests to the worker pool.
///
/// Construction does no I/O. Each `create` looks up the worker dispatcher in
/// the application context and asks it for a handle; failures propagate to
/// the caller with no retry and no local fallback.
pub struct RemoteEmbeddingFactory {
    system_app: RwLock<Weak<SystemApp>>,
    default_model_name: String,
    params: BTreeMap<String, String>,
}

impl RemoteEmbeddingFactory {
    pub fn new(
        system_app: &Arc<SystemApp>,
        model_name: impl Into<String>,
        params: BTreeMap<String, String>,
    ) -> Self {
        let default_model_name = model_name.into();
        log::info!(
            "Remote embedding model {} (params: {:?})",
            default_model_name,
            params
        );

        Self {
            system_app: RwLock::new(Arc::downgrade(system_app)),
            default_model_name,
            params,
        }
    }
}

impl EmbeddingFactory for RemoteEmbeddingFactory {
    fn create(
        &self,
        model_name: Option<&str>,
        embedding_cls: Option<EmbeddingClass>,
    ) -> Result<Arc<dyn EmbeddingEngine>> {
        check_create_args(
            Strategy::Remote,
            &self.default_model_name,
            model_name,
            embedding_cls.as_ref(),
        )?;

        let system_app = self
            .system_app
            .read()
            .upgrade()
            .ok_or(EmbeddingError::ContextUnavailable)?;
        let dispatcher = system_app.get_component::<dyn WorkerDispatcher>()?;
        let handle = dispatcher.dispatcher_handle(&self.default_model_name)?;

        Ok(Arc::new(RemoteEmbeddings::new(
            self.default_model_name.clone(),
            handle,
        )))
    }

    fn init_app(&self, system_app: &Arc<SystemApp>) {
        *self.system_app.write() = Arc::downgrade(system_app);
    }

    fn strategy(&self) -> Strategy {
        Strategy::Remote
    }

    fn default_model_name(&self) -> &str {
        &self.default_model_name
    }
}

impl fmt::Debug for RemoteEmbeddingFactory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RemoteEmbeddingFactory")
            .field("default_model_name", &self.default_model_name)
            .field("params", &self.params)
            .finish()
    }
}
