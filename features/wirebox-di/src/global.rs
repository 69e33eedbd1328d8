//! The process wide default container and access functions.
//!
//! Nothing is installed implicitly. Install a container at startup (or use
//! [`ContainerBuilder::build_default`](crate::ContainerBuilder::build_default)) and clear it at
//! shutdown. Only [`Dependency`](crate::Dependency) accessors without an explicit container read it.

use std::sync::Arc;

use parking_lot::RwLock;

use crate::{
    container::Container,
    errors::ResolveError,
    types::{Injectable, Instance, Key},
};

static DEFAULT: RwLock<Option<Container>> = parking_lot::const_rwlock(None);

/// Makes `container` the process default, returns the container it replaced
///
/// The replaced container is only dropped once nobody else holds a handle to it.
pub fn install(container: Container) -> Option<Container> {
    tracing::debug!("Installing default container");
    DEFAULT.write().replace(container)
}

/// The current process default
pub fn current() -> Option<Container> {
    DEFAULT.read().clone()
}

/// Removes the process default, returns it if one was installed
pub fn clear() -> Option<Container> {
    let previous = DEFAULT.write().take();
    if previous.is_some() {
        tracing::debug!("Cleared default container");
    }
    previous
}

pub fn is_installed() -> bool {
    DEFAULT.read().is_some()
}

/// Resolves `key` from the process default
pub fn resolve(key: impl Into<Key>) -> Result<Instance, ResolveError> {
    // Handle is cloned so the lock is not held while constructing
    current()
        .ok_or(ResolveError::NoDefaultContainer)?
        .get(key)
}

/// Resolves and downcasts `key` from the process default
pub fn resolve_as<T: Injectable>(key: impl Into<Key>) -> Result<Arc<T>, ResolveError> {
    current()
        .ok_or(ResolveError::NoDefaultContainer)?
        .get_as(key)
}
