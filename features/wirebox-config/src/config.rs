use std::{fmt::Debug, ops::Deref, sync::Arc};

/// A shared handle to a registered config value
///
/// Configs are stored once in the [`ConfigProvider`](crate::provider::ConfigProvider) and handed out
/// as cheap clones of the same allocation.
///
/// # Example
/// ```rust
/// use wirebox_config::{config::Config, provider::ConfigProvider};
///
/// struct CacheConfig {
///     ttl_seconds: u64,
/// }
///
/// let mut provider = ConfigProvider::new();
/// provider.add_config(CacheConfig { ttl_seconds: 30 }).unwrap();
///
/// let config: Config<CacheConfig> = provider.config().unwrap();
/// assert_eq!(config.ttl_seconds, 30);
/// ```
pub struct Config<T> {
    inner: Arc<T>,
}
impl<T> Clone for Config<T> {
    fn clone(&self) -> Self {
        Config {
            inner: self.inner.clone(),
        }
    }
}
impl<T: Debug> Debug for Config<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("Config").field(&self.inner).finish()
    }
}
impl<T> Deref for Config<T> {
    type Target = T;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}
impl<T> Config<T> {
    /// Wraps a value which is not stored in a provider
    pub fn new(value: T) -> Self {
        Config {
            inner: Arc::new(value),
        }
    }

    pub(crate) fn from_arc(inner: Arc<T>) -> Self {
        Config { inner }
    }

    pub fn inner(&self) -> Arc<T> {
        self.inner.clone()
    }

    pub fn into_inner(self) -> Arc<T> {
        self.inner
    }
}
