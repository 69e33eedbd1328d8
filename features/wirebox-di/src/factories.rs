use std::{fmt::Debug, sync::Arc};

use crate::{
    signature::Interface,
    types::{DynError, Injectable, Instance, TypeInfo},
};

/// A type the container can construct without arguments
pub trait Component: Injectable + Sized {
    /// Default construction path used when no factory is registered
    fn construct() -> Result<Self, DynError>;

    /// Declares the methods this type offers, checked against contracts at registration
    fn interface() -> Interface {
        Interface::new(std::any::type_name::<Self>())
    }
}

/// User supplied routine replacing the default construction
pub type Factory = Arc<dyn Fn() -> Result<Instance, DynError> + Send + Sync>;

/// Wraps a closure producing values into a [Factory]
pub fn factory<T, E, F>(f: F) -> Factory
where
    T: Injectable,
    E: Into<DynError>,
    F: Fn() -> Result<T, E> + Send + Sync + 'static,
{
    Arc::new(move || f().map(Instance::new).map_err(Into::into))
}

/// Wraps a closure producing shared values into a [Factory], the returned allocation is kept as is
pub fn shared_factory<T, E, F>(f: F) -> Factory
where
    T: Injectable,
    E: Into<DynError>,
    F: Fn() -> Result<Arc<T>, E> + Send + Sync + 'static,
{
    Arc::new(move || f().map(Instance::from_arc).map_err(Into::into))
}

/// Handle to a concrete type the container can instantiate
#[derive(Clone)]
pub struct Implementation {
    info: TypeInfo,
    interface: Arc<Interface>,
    construct: fn() -> Result<Instance, DynError>,
}
impl Debug for Implementation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Implementation")
            .field("type", &self.info.type_name)
            .field("interface", &self.interface)
            .finish()
    }
}

impl Implementation {
    pub fn of<T: Component>() -> Self {
        Implementation {
            info: TypeInfo::of::<T>(),
            interface: Arc::new(T::interface()),
            construct: construct_component::<T>,
        }
    }

    /// Implementation constructed through [Default], declaring no methods
    pub fn of_default<T: Injectable + Default>() -> Self {
        Implementation {
            info: TypeInfo::of::<T>(),
            interface: Arc::new(Interface::new(std::any::type_name::<T>())),
            construct: construct_default::<T>,
        }
    }

    /// Replaces the declared interface
    pub fn describe(mut self, interface: Interface) -> Self {
        self.interface = Arc::new(interface);
        self
    }

    pub fn info(&self) -> TypeInfo {
        self.info
    }

    pub fn interface(&self) -> &Interface {
        &self.interface
    }

    /// Runs the default construction path
    pub fn construct(&self) -> Result<Instance, DynError> {
        (self.construct)()
    }
}

fn construct_component<T: Component>() -> Result<Instance, DynError> {
    T::construct().map(Instance::new)
}

fn construct_default<T: Injectable + Default>() -> Result<Instance, DynError> {
    Ok(Instance::new(T::default()))
}
