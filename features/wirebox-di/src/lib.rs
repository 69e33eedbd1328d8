//! Wirebox DI is a keyed dependency container.
//!
//! Dependencies are registered under a [Key] and resolved by that key at runtime.
//!
//! Wirebox DI is split into these parts:
//! 1. Registration: a key, an [Implementation], a [Lifecycle] and optionally a contract and a factory
//! 2. Contracts: an [Interface] the implementation must satisfy, checked once at registration
//! 3. Resolution: [Container::get] constructs transients on every call and singletons once
//! 4. Groups: [DependencyGroup]s register related dependencies in bulk, in a stable order
//! 5. Access: [Dependency] resolves a key on first use, from a container or the process default
//!
//! # Examples
//!
//! ```rust
//! use wirebox_di::{Component, Container, DynError, Interface, Param, Registration};
//!
//! struct Clock;
//! impl Component for Clock {
//!     fn construct() -> Result<Self, DynError> {
//!         Ok(Clock)
//!     }
//!
//!     fn interface() -> Interface {
//!         Interface::new("Clock").method("now", [Param::opt("zone")])
//!     }
//! }
//!
//! let contract = Interface::new("TimeSource").method("now", [Param::req("zone")]);
//!
//! let container = Container::new();
//! container
//!     .register(Registration::of::<Clock>("clock").singleton().contract(contract))
//!     .unwrap();
//!
//! let clock = container.get_as::<Clock>("clock").unwrap();
//! assert!(std::sync::Arc::ptr_eq(&clock, &container.get_as::<Clock>("clock").unwrap()));
//! ```

pub mod builder;
pub mod container;
pub mod contract;
pub mod errors;
pub mod factories;
pub mod global;
pub mod group;
pub mod item;
pub mod lazy;
pub mod namespace;
pub mod registration;
pub mod signature;
pub mod types;

pub use builder::ContainerBuilder;
pub use container::Container;
pub use errors::{BuildError, ContractError, LoadError, RegisterError, ResolveError};
pub use factories::{factory, shared_factory, Component, Factory, Implementation};
pub use group::{DependencyGroup, GroupRegistry};
pub use item::{ContainerItem, Lifecycle};
pub use lazy::Dependency;
pub use namespace::{type_name_for, Namespace};
pub use registration::Registration;
pub use signature::{Interface, Param, ParamKind};
pub use types::{DynError, Injectable, Instance, Key, TypeInfo};

pub use wirebox_config;

#[cfg(test)]
mod tests;
