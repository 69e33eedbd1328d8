use std::{
    any::{type_name, Any, TypeId},
    collections::HashMap,
    fmt::Debug,
    sync::Arc,
};

use crate::{config::Config, errors::ConfigError};

struct StoredConfig {
    type_name: &'static str,
    value: Arc<dyn Any + Send + Sync + 'static>,
}

/// A provider to register all configs.
///
/// Configs can be registered and retrieved based on type.
#[derive(Default)]
pub struct ConfigProvider {
    configs: HashMap<TypeId, StoredConfig>,
}
impl Debug for ConfigProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut names: Vec<_> = self.configs.values().map(|c| c.type_name).collect();
        names.sort_unstable();
        f.debug_struct("ConfigProvider")
            .field("configs", &names)
            .finish()
    }
}

impl ConfigProvider {
    /// Initializes an empty Config Provider
    pub fn new() -> Self {
        Self::default()
    }

    /// Retrieve a config with specified type.
    ///
    /// Returns `Ok(None)` if no config of this type was registered.
    pub fn get_config<T: Send + Sync + 'static>(&self) -> Result<Option<Config<T>>, ConfigError> {
        let Some(stored) = self.configs.get(&TypeId::of::<T>()) else {
            return Ok(None);
        };

        stored
            .value
            .clone()
            .downcast::<T>()
            .map(|inner| Some(Config::from_arc(inner)))
            .map_err(|_| ConfigError::DowncastFailed {
                required_type: type_name::<T>(),
                actual_type: stored.type_name,
            })
    }

    /// Retrieve a config which must be registered
    pub fn config<T: Send + Sync + 'static>(&self) -> Result<Config<T>, ConfigError> {
        self.get_config()?
            .ok_or(ConfigError::Missing(type_name::<T>()))
    }

    /// Checks if a config of the given type is registered
    pub fn contains<T: 'static>(&self) -> bool {
        self.configs.contains_key(&TypeId::of::<T>())
    }

    /// Add a config to the registry.
    ///
    /// If the config type is already registered, it will return a
    /// [`ConfigError::AlreadyRegistered`] error
    pub fn add_config<T: Send + Sync + 'static>(
        &mut self,
        config: T,
    ) -> Result<&mut Self, ConfigError> {
        let type_id = TypeId::of::<T>();

        if self.configs.contains_key(&type_id) {
            return Err(ConfigError::AlreadyRegistered(type_name::<T>()));
        }

        tracing::debug!("Registered config {}", type_name::<T>());
        self.configs.insert(
            type_id,
            StoredConfig {
                type_name: type_name::<T>(),
                value: Arc::new(config),
            },
        );
        Ok(self)
    }

    /// Can optionally add a config to the registry.
    ///
    /// If the config provided is `Some(T)`, it will be the same as calling [`ConfigProvider::add_config`]
    /// If the config provided is `None`, then the function just returns `Ok(self)` for chaining
    pub fn maybe_add_config<T: Send + Sync + 'static>(
        &mut self,
        config: Option<T>,
    ) -> Result<&mut Self, ConfigError> {
        match config {
            Some(c) => self.add_config(c),
            None => Ok(self),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    struct AppConfig {
        host: String,
        port: u16,
    }

    #[test]
    fn stores_and_returns_the_same_allocation() {
        let mut provider = ConfigProvider::new();
        provider
            .add_config(AppConfig {
                host: "localhost".to_string(),
                port: 8080,
            })
            .unwrap();

        let first = provider.config::<AppConfig>().unwrap();
        let second = provider.config::<AppConfig>().unwrap();

        assert_eq!(first.host, "localhost");
        assert_eq!(first.port, 8080);
        assert!(Arc::ptr_eq(&first.inner(), &second.inner()));
    }

    #[test]
    fn rejects_a_second_config_of_the_same_type() {
        let mut provider = ConfigProvider::new();
        provider.add_config(1_u16).unwrap();

        let err = provider.add_config(2_u16).unwrap_err();
        assert_eq!(err, ConfigError::AlreadyRegistered("u16"));
        assert_eq!(*provider.config::<u16>().unwrap(), 1);
    }

    #[test]
    fn missing_config() {
        let provider = ConfigProvider::new();

        assert!(provider.get_config::<AppConfig>().unwrap().is_none());
        assert!(matches!(
            provider.config::<AppConfig>(),
            Err(ConfigError::Missing(_))
        ));
        assert!(!provider.contains::<AppConfig>());
    }

    #[test]
    fn maybe_add_config_skips_none() {
        let mut provider = ConfigProvider::new();
        provider
            .maybe_add_config::<String>(None)
            .unwrap()
            .maybe_add_config(Some(42_u32))
            .unwrap();

        assert!(!provider.contains::<String>());
        assert_eq!(*provider.config::<u32>().unwrap(), 42);
    }
}
