use std::{
    any::type_name,
    fmt::Debug,
    sync::{Arc, OnceLock},
};

use parking_lot::Mutex;

use crate::{
    container::Container,
    errors::ResolveError,
    global,
    types::{Injectable, Key},
};

enum Source {
    /// The process default at the time of first access
    Default,
    Container(Container),
}

/// Lazily resolved dependency, cached per accessor
///
/// The key is resolved on first access and the result kept for all later accesses of the same
/// accessor, other accessors of the same key resolve again. Failed resolutions are not cached.
///
/// ```rust
/// use wirebox_di::{Container, Dependency, Implementation, Registration};
///
/// #[derive(Default)]
/// struct Mailer;
///
/// struct Signup {
///     mailer: Dependency<Mailer>,
/// }
///
/// let container = Container::new();
/// container
///     .register(Registration::new("mailer", Implementation::of_default::<Mailer>()))
///     .unwrap();
///
/// let signup = Signup {
///     mailer: Dependency::from_container(&container, "mailer"),
/// };
/// let first = signup.mailer.get().unwrap().clone();
/// let second = signup.mailer.get().unwrap().clone();
/// assert!(std::sync::Arc::ptr_eq(&first, &second));
/// ```
pub struct Dependency<T: Injectable> {
    key: Key,
    source: Source,
    once: OnceLock<Arc<T>>,
    lock: Mutex<()>,
}
impl<T: Injectable + Debug> Debug for Dependency<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dependency")
            .field("key", &self.key)
            .field("value", &self.once.get())
            .finish()
    }
}

impl<T: Injectable> Dependency<T> {
    /// Accessor resolving from the process default container
    pub fn new(key: impl Into<Key>) -> Self {
        Self::with_source(key.into(), Source::Default)
    }

    /// Accessor resolving from `container`
    pub fn from_container(container: &Container, key: impl Into<Key>) -> Self {
        Self::with_source(key.into(), Source::Container(container.clone()))
    }

    fn with_source(key: Key, source: Source) -> Self {
        Dependency {
            key,
            source,
            once: OnceLock::new(),
            lock: Mutex::new(()),
        }
    }

    pub fn key(&self) -> Key {
        self.key
    }

    /// True once a value has been resolved and cached
    pub fn is_resolved(&self) -> bool {
        self.once.get().is_some()
    }

    /// Accesses the dependency, resolving it on first access
    pub fn get(&self) -> Result<&Arc<T>, ResolveError> {
        if let Some(value) = self.once.get() {
            return Ok(value);
        }

        // Only one thread resolves, the others wait and read the cache
        let _guard = self.lock.lock();

        // Double check once - it might have been set while we waited for the lock
        if let Some(value) = self.once.get() {
            return Ok(value);
        }

        let instance = match &self.source {
            Source::Default => global::resolve(self.key)?,
            Source::Container(container) => container.get(self.key)?,
        };
        let value = instance
            .downcast::<T>()
            .map_err(|actual_type| ResolveError::DowncastFailed {
                required_type: type_name::<T>(),
                actual_type,
            })?;

        Ok(self.once.get_or_init(|| value))
    }
}
