//! Application context and typed component registry
//!
//! Each well-known [`ComponentType`] maps to exactly one registered
//! implementation. The implementation is stored as the trait object named by
//! its [`Capability`], so lookups are resolved by type rather than by probing.

use crate::config::EmbeddingConfig;
use crate::error::{EmbeddingError, Result};
use dashmap::DashMap;
use std::any::Any;
use std::fmt;
use std::sync::Arc;

/// Well-known capability keys
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ComponentType {
    EmbeddingFactory,
    WorkerManagerFactory,
}

impl ComponentType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ComponentType::EmbeddingFactory => "embedding_factory",
            ComponentType::WorkerManagerFactory => "worker_manager_factory",
        }
    }
}

impl fmt::Display for ComponentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Binds a capability trait object to its registry key.
///
/// Implemented for `dyn Trait` types, e.g. `dyn EmbeddingFactory`.
pub trait Capability: Send + Sync + 'static {
    /// Key the capability is registered under
    const KEY: ComponentType;

    /// Called once by [`SystemApp::register`] before the component is stored
    fn on_register(&self, _system_app: &Arc<SystemApp>) {}
}

/// Application context shared by all components
pub struct SystemApp {
    config: EmbeddingConfig,
    components: DashMap<ComponentType, Arc<dyn Any + Send + Sync>>,
}

impl SystemApp {
    /// Create a new application context with the startup configuration
    pub fn new(config: EmbeddingConfig) -> Arc<Self> {
        Arc::new(Self {
            config,
            components: DashMap::new(),
        })
    }

    /// Startup configuration
    pub fn config(&self) -> &EmbeddingConfig {
        &self.config
    }

    /// Register a component under its capability key, replacing any previous
    /// registration for that key.
    pub fn register<C>(self: &Arc<Self>, component: Arc<C>)
    where
        C: Capability + ?Sized,
    {
        component.on_register(self);

        let previous = self
            .components
            .insert(C::KEY, Arc::new(component) as Arc<dyn Any + Send + Sync>);

        if previous.is_some() {
            log::info!("Replaced component registered as {}", C::KEY);
        } else {
            log::debug!("Registered component {}", C::KEY);
        }
    }

    /// Look up the component registered for capability `C`
    pub fn get_component<C>(&self) -> Result<Arc<C>>
    where
        C: Capability + ?Sized,
    {
        let entry = self
            .components
            .get(&C::KEY)
            .ok_or(EmbeddingError::ComponentNotFound(C::KEY))?;

        entry
            .value()
            .downcast_ref::<Arc<C>>()
            .cloned()
            .ok_or(EmbeddingError::ComponentTypeMismatch(C::KEY))
    }

    /// Check whether anything is registered under `key`
    pub fn contains(&self, key: ComponentType) -> bool {
        self.components.contains_key(&key)
    }
}

impl fmt::Debug for SystemApp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let keys: Vec<ComponentType> = self.components.iter().map(|e| *e.key()).collect();
        f.debug_struct("SystemApp")
            .field("config", &self.config)
            .field("components", &keys)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    trait Greeter: Send + Sync {
        fn greet(&self) -> String;
    }

    impl Capability for dyn Greeter {
        const KEY: ComponentType = ComponentType::WorkerManagerFactory;

        fn on_register(&self, _system_app: &Arc<SystemApp>) {
            REGISTRATIONS.fetch_add(1, Ordering::SeqCst);
        }
    }

    trait Other: Send + Sync {}

    impl Capability for dyn Other {
        const KEY: ComponentType = ComponentType::WorkerManagerFactory;
    }

    static REGISTRATIONS: AtomicUsize = AtomicUsize::new(0);

    struct Hello(&'static str);

    impl Greeter for Hello {
        fn greet(&self) -> String {
            format!("hello {}", self.0)
        }
    }

    #[test]
    fn test_component_type_display() {
        assert_eq!(ComponentType::EmbeddingFactory.to_string(), "embedding_factory");
        assert_eq!(
            ComponentType::WorkerManagerFactory.to_string(),
            "worker_manager_factory"
        );
    }

    #[test]
    fn test_get_missing_component() {
        let app = SystemApp::new(EmbeddingConfig::default());
        let err = app.get_component::<dyn Greeter>().err().unwrap();
        assert!(matches!(
            err,
            EmbeddingError::ComponentNotFound(ComponentType::WorkerManagerFactory)
        ));
    }

    #[test]
    fn test_register_and_replace() {
        let app = SystemApp::new(EmbeddingConfig::default());
        let before = REGISTRATIONS.load(Ordering::SeqCst);

        app.register::<dyn Greeter>(Arc::new(Hello("first")));
        app.register::<dyn Greeter>(Arc::new(Hello("second")));

        assert!(REGISTRATIONS.load(Ordering::SeqCst) >= before + 2);
        assert!(app.contains(ComponentType::WorkerManagerFactory));
        assert!(!app.contains(ComponentType::EmbeddingFactory));

        let greeter = app.get_component::<dyn Greeter>().unwrap();
        assert_eq!(greeter.greet(), "hello second");
    }

    #[test]
    fn test_type_mismatch() {
        let app = SystemApp::new(EmbeddingConfig::default());
        app.register::<dyn Greeter>(Arc::new(Hello("x")));

        let err = app.get_component::<dyn Other>().err().unwrap();
        assert!(matches!(err, EmbeddingError::ComponentTypeMismatch(_)));
    }

    #[test]
    fn test_lookup_returns_same_instance() {
        let app = SystemApp::new(EmbeddingConfig::default());
        let hello: Arc<dyn Greeter> = Arc::new(Hello("x"));
        app.register(Arc::clone(&hello));

        let found = app.get_component::<dyn Greeter>().unwrap();
        assert!(Arc::ptr_eq(&hello, &found));
    }
}
