//! Local strategy: one engine loaded eagerly at construction.

use super::{check_create_args, EmbeddingClass, EmbeddingFactory, Strategy};
use crate::embedding::{EmbeddingEngine, EmbeddingLoader, ModelLoader};
use crate::error::Result;
use crate::params::{parse_embedding_params, schema_for_model};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

/// Factory that serves a single in-process engine.
///
/// The model is resolved and loaded in the constructor; a load failure fails
/// construction, so a factory that exists always has a usable engine. Every
/// `create` hands out the same `Arc`.
pub struct LocalEmbeddingFactory {
    default_model_name: String,
    default_model_path: Option<String>,
    model: Arc<dyn EmbeddingEngine>,
}

impl LocalEmbeddingFactory {
    /// Load the default model with [`EmbeddingLoader`].
    pub fn new(
        default_model_name: impl Into<String>,
        default_model_path: Option<String>,
        params: BTreeMap<String, String>,
    ) -> Result<Self> {
        Self::with_loader(default_model_name, default_model_path, params, &EmbeddingLoader)
    }

    /// Load the default model with a custom loader.
    pub fn with_loader(
        default_model_name: impl Into<String>,
        default_model_path: Option<String>,
        params: BTreeMap<String, String>,
        loader: &dyn ModelLoader,
    ) -> Result<Self> {
        let default_model_name = default_model_name.into();
        let model = load_model(
            loader,
            &default_model_name,
            default_model_path.as_deref(),
            &params,
        )?;

        Ok(Self {
            default_model_name,
            default_model_path,
            model,
        })
    }
}

fn load_model(
    loader: &dyn ModelLoader,
    model_name: &str,
    model_path: Option<&str>,
    params: &BTreeMap<String, String>,
) -> Result<Arc<dyn EmbeddingEngine>> {
    let schema = schema_for_model(model_name);
    let model_params = parse_embedding_params(model_name, model_path, schema, params)?;
    log::info!("Embedding params for {}: {:?}", model_params.model_name(), model_params);

    loader.load(model_name, &model_params)
}

impl EmbeddingFactory for LocalEmbeddingFactory {
    fn create(
        &self,
        model_name: Option<&str>,
        embedding_cls: Option<EmbeddingClass>,
    ) -> Result<Arc<dyn EmbeddingEngine>> {
        check_create_args(
            Strategy::Local,
            &self.default_model_name,
            model_name,
            embedding_cls.as_ref(),
        )?;
        Ok(Arc::clone(&self.model))
    }

    fn strategy(&self) -> Strategy {
        Strategy::Local
    }

    fn default_model_name(&self) -> &str {
        &self.default_model_name
    }
}

impl fmt::Debug for LocalEmbeddingFactory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LocalEmbeddingFactory")
            .field("default_model_name", &self.default_model_name)
            .field("default_model_path", &self.default_model_path)
            .field("model", &self.model)
            .finish()
    }
}
