//! Embedding factory capability
//!
//! The rest of the application asks the registry for `dyn EmbeddingFactory`
//! and calls [`EmbeddingFactory::create`]; which strategy answers is decided
//! once at startup by [`crate::initialize_embedding_model`].

mod local;
mod remote;

pub use local::LocalEmbeddingFactory;
pub use remote::RemoteEmbeddingFactory;

use crate::component::{Capability, ComponentType, SystemApp};
use crate::embedding::EmbeddingEngine;
use crate::error::{EmbeddingError, Result};
use std::fmt;
use std::sync::Arc;

/// Registry key of the embedding factory
pub const EMBEDDING_FACTORY_KEY: ComponentType = ComponentType::EmbeddingFactory;

/// Caller-supplied constructor for a custom embedding implementation.
///
/// Neither strategy accepts one; see [`EmbeddingFactory::create`].
pub type EmbeddingClass = Arc<dyn Fn(&str) -> Result<Arc<dyn EmbeddingEngine>> + Send + Sync>;

/// Which backend a factory uses
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    Local,
    Remote,
}

impl Strategy {
    pub fn as_str(&self) -> &'static str {
        match self {
            Strategy::Local => "local",
            Strategy::Remote => "remote",
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Produces embedding engines independent of backend.
pub trait EmbeddingFactory: Send + Sync + fmt::Debug {
    /// Return an engine for the configured default model.
    ///
    /// `model_name` is advisory: both strategies always serve their
    /// configured default. `embedding_cls` must be `None`; passing a custom
    /// implementation fails with [`EmbeddingError::NotImplemented`].
    fn create(
        &self,
        model_name: Option<&str>,
        embedding_cls: Option<EmbeddingClass>,
    ) -> Result<Arc<dyn EmbeddingEngine>>;

    /// Called once when the factory is registered with `system_app`.
    fn init_app(&self, _system_app: &Arc<SystemApp>) {}

    fn strategy(&self) -> Strategy;

    fn default_model_name(&self) -> &str;
}

impl Capability for dyn EmbeddingFactory {
    const KEY: ComponentType = EMBEDDING_FACTORY_KEY;

    fn on_register(&self, system_app: &Arc<SystemApp>) {
        self.init_app(system_app);
    }
}

/// Shared argument checks for `create`.
fn check_create_args(
    strategy: Strategy,
    default_model_name: &str,
    model_name: Option<&str>,
    embedding_cls: Option<&EmbeddingClass>,
) -> Result<()> {
    if embedding_cls.is_some() {
        return Err(EmbeddingError::NotImplemented);
    }

    // Single backend per process: the requested name is not used.
    if let Some(requested) = model_name.filter(|name| *name != default_model_name) {
        log::debug!(
            "{} embedding factory ignoring model `{}`, serving `{}`",
            strategy,
            requested,
            default_model_name
        );
    }

    Ok(())
}
