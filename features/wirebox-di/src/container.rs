use std::{any::type_name, collections::HashMap, fmt::Debug, sync::Arc};

use parking_lot::RwLock;
use wirebox_config::{Config, ConfigError, ConfigProvider, ContainerSettings};

use crate::{
    builder::ContainerBuilder,
    contract,
    errors::{LoadError, RegisterError, ResolveError},
    group::GroupRegistry,
    item::{ContainerItem, Lifecycle, ResolutionGuard},
    namespace::{self, Namespace},
    registration::Registration,
    types::{Injectable, Instance, Key},
};

/// Registry mapping keys to dependencies
///
/// Cloning is cheap, all clones share the same registry.
#[derive(Clone)]
pub struct Container(pub Arc<ContainerInner>);
pub struct ContainerInner {
    store: RwLock<HashMap<Key, Arc<ContainerItem>>>,
    namespace: Namespace,
    settings: ContainerSettings,
    config: Arc<ConfigProvider>,
}
impl Debug for Container {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let store = self.0.store.read();
        let mut items: Vec<_> = store.values().collect();
        items.sort_by_key(|item| item.key());

        let mut map = f.debug_struct("Container");
        for item in items {
            let state = match (item.lifecycle(), item.is_cached()) {
                (Lifecycle::Transient, _) => "transient",
                (Lifecycle::Singleton, true) => "singleton (constructed)",
                (Lifecycle::Singleton, false) => "singleton",
            };
            map.field(item.key().as_str(), &state);
        }
        map.finish()
    }
}
impl Default for Container {
    fn default() -> Self {
        Self::new()
    }
}

impl Container {
    /// Empty container with default settings and an empty namespace
    pub fn new() -> Self {
        Self::from_parts(
            ContainerSettings::default(),
            Namespace::default(),
            Arc::new(ConfigProvider::default()),
        )
    }

    pub fn builder() -> ContainerBuilder {
        ContainerBuilder::new()
    }

    pub(crate) fn from_parts(
        settings: ContainerSettings,
        namespace: Namespace,
        config: Arc<ConfigProvider>,
    ) -> Self {
        Container(Arc::new(ContainerInner {
            store: RwLock::new(HashMap::new()),
            namespace,
            settings,
            config,
        }))
    }

    /// Registers a dependency
    ///
    /// Nothing is stored unless every check passes: key and implementation must be present, the
    /// key must be unused and the implementation must satisfy the contract, if one is given.
    pub fn register(&self, registration: Registration) -> Result<(), RegisterError> {
        let Registration {
            key,
            implementation,
            lifecycle,
            contract,
            factory,
        } = registration;

        let key = key
            .filter(|key| !key.is_empty())
            .ok_or(RegisterError::MissingKey)?;
        let implementation = implementation.ok_or(RegisterError::MissingImplementation)?;

        if self.contains_key(key) {
            return Err(RegisterError::DuplicateKey(key));
        }

        if let Some(expected) = &contract {
            contract::validate(
                implementation.interface(),
                expected,
                self.0.settings.signature_order,
            )?;
        }

        let mut store = self.0.store.write();
        // Checked again, another thread may have registered the key meanwhile
        if store.contains_key(&key) {
            return Err(RegisterError::DuplicateKey(key));
        }

        tracing::debug!(
            "Registered {} as {:?} {}{}",
            key,
            lifecycle,
            implementation.info(),
            if factory.is_some() { " with factory" } else { "" }
        );
        store.insert(
            key,
            Arc::new(ContainerItem::new(key, implementation, lifecycle, factory)),
        );
        Ok(())
    }

    /// Resolves the dependency registered under `key`
    ///
    /// Singletons are constructed on first request and cached, transients are constructed on every
    /// request. Unregistered keys fall back to the naming convention, see [`namespace::type_name_for`].
    pub fn get(&self, key: impl Into<Key>) -> Result<Instance, ResolveError> {
        let key = key.into();
        let _guard = ResolutionGuard::enter(Arc::as_ptr(&self.0) as usize, key)?;

        // Lock is released before constructing, factories may resolve other keys
        let item = self.0.store.read().get(&key).cloned();
        match item {
            Some(item) => item.resolve(),
            None => self.resolve_by_convention(key),
        }
    }

    /// Resolves and downcasts the dependency registered under `key`
    pub fn get_as<T: Injectable>(&self, key: impl Into<Key>) -> Result<Arc<T>, ResolveError> {
        self.get(key)?
            .downcast::<T>()
            .map_err(|actual_type| ResolveError::DowncastFailed {
                required_type: type_name::<T>(),
                actual_type,
            })
    }

    fn resolve_by_convention(&self, key: Key) -> Result<Instance, ResolveError> {
        if !self.0.settings.convention_fallback {
            return Err(ResolveError::NotRegistered(key));
        }

        let type_name = namespace::type_name_for(key.as_str());
        tracing::warn!(
            "No registered dependency could be found for key: {key}. Attempting to load type: {type_name}"
        );

        let implementation = self
            .0
            .namespace
            .lookup(&type_name)
            .ok_or_else(|| ResolveError::UnknownType {
                key,
                type_name: type_name.clone(),
            })?;

        implementation
            .construct()
            .map_err(ResolveError::Construction)
    }

    /// Checks if a dependency is registered under `key`
    pub fn contains_key(&self, key: impl Into<Key>) -> bool {
        self.0.store.read().contains_key(&key.into())
    }

    #[deprecated(note = "use `contains_key` instead")]
    pub fn is_registered(&self, key: impl Into<Key>) -> bool {
        let key = key.into();
        tracing::warn!("`is_registered` is deprecated, use `contains_key` to check {key}");
        self.contains_key(key)
    }

    /// The registration stored under `key`
    pub fn item(&self, key: impl Into<Key>) -> Option<Arc<ContainerItem>> {
        self.0.store.read().get(&key.into()).cloned()
    }

    /// All registered keys in name order
    pub fn keys(&self) -> Vec<Key> {
        let mut keys: Vec<Key> = self.0.store.read().keys().copied().collect();
        keys.sort_unstable();
        keys
    }

    pub fn len(&self) -> usize {
        self.0.store.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.store.read().is_empty()
    }

    /// Applies all valid groups of `groups` to this container
    pub fn load_groups(&self, groups: &GroupRegistry) -> Result<usize, LoadError> {
        groups.load(self)
    }

    pub fn settings(&self) -> &ContainerSettings {
        &self.0.settings
    }

    pub fn namespace(&self) -> &Namespace {
        &self.0.namespace
    }

    pub fn config_provider(&self) -> &ConfigProvider {
        &self.0.config
    }

    /// Retrieves a config the container was built with
    pub fn config<T: Send + Sync + 'static>(&self) -> Result<Config<T>, ConfigError> {
        self.0.config.config()
    }

    /// True if both handles share the same registry
    pub fn ptr_eq(&self, other: &Container) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}
