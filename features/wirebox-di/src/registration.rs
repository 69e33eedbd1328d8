use std::sync::Arc;

use crate::{
    factories::{self, Component, Factory, Implementation},
    item::Lifecycle,
    signature::Interface,
    types::{DynError, Injectable, Key},
};

/// Everything needed to register one dependency
///
/// Key and implementation are required, [`Container::register`](crate::Container::register) rejects a
/// registration missing either of them.
///
/// ```rust
/// use wirebox_di::{Container, Implementation, Registration};
///
/// #[derive(Default)]
/// struct Greeter;
///
/// let container = Container::new();
/// container
///     .register(Registration::new("greeter", Implementation::of_default::<Greeter>()).singleton())
///     .unwrap();
///
/// let first = container.get("greeter").unwrap();
/// let second = container.get("greeter").unwrap();
/// assert!(first.ptr_eq(&second));
/// ```
#[derive(Default, Clone)]
pub struct Registration {
    pub(crate) key: Option<Key>,
    pub(crate) implementation: Option<Implementation>,
    pub(crate) lifecycle: Lifecycle,
    pub(crate) contract: Option<Interface>,
    pub(crate) factory: Option<Factory>,
}

impl Registration {
    pub fn new(key: impl Into<Key>, implementation: Implementation) -> Self {
        Registration {
            key: Some(key.into()),
            implementation: Some(implementation),
            ..Default::default()
        }
    }

    /// Transient registration of a [Component]
    pub fn of<T: Component>(key: impl Into<Key>) -> Self {
        Self::new(key, Implementation::of::<T>())
    }

    pub fn key(mut self, key: impl Into<Key>) -> Self {
        self.key = Some(key.into());
        self
    }

    pub fn implementation(mut self, implementation: Implementation) -> Self {
        self.implementation = Some(implementation);
        self
    }

    pub fn lifecycle(mut self, lifecycle: Lifecycle) -> Self {
        self.lifecycle = lifecycle;
        self
    }

    pub fn singleton(self) -> Self {
        self.lifecycle(Lifecycle::Singleton)
    }

    pub fn transient(self) -> Self {
        self.lifecycle(Lifecycle::Transient)
    }

    /// Contract the implementation must satisfy to be registered
    pub fn contract(mut self, contract: Interface) -> Self {
        self.contract = Some(contract);
        self
    }

    /// Constructs instances with `f` instead of the default construction path
    pub fn factory<T, E, F>(mut self, f: F) -> Self
    where
        T: Injectable,
        E: Into<DynError>,
        F: Fn() -> Result<T, E> + Send + Sync + 'static,
    {
        self.factory = Some(factories::factory(f));
        self
    }

    /// Like [Registration::factory], but the returned allocation is handed out as is
    pub fn shared_factory<T, E, F>(mut self, f: F) -> Self
    where
        T: Injectable,
        E: Into<DynError>,
        F: Fn() -> Result<Arc<T>, E> + Send + Sync + 'static,
    {
        self.factory = Some(factories::shared_factory(f));
        self
    }

    /// Uses an already type erased factory
    pub fn raw_factory(mut self, factory: Factory) -> Self {
        self.factory = Some(factory);
        self
    }
}
