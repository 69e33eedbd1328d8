//! Wirebox wires applications from keyed dependencies.
//!
//! This crate bundles the container ([`di`]) with the config registry ([`config`]) it reads its
//! settings and feature flags from.
//!
//! # Examples
//!
//! ```rust
//! use wirebox::{
//!     ConfigProvider, Container, ContainerSettings, Implementation, Registration, SignatureOrder,
//! };
//!
//! let mut config = ConfigProvider::new();
//! config
//!     .add_config(ContainerSettings::default().signature_order(SignatureOrder::Relaxed))
//!     .unwrap();
//!
//! let container = Container::builder().config(config).build().unwrap();
//! container
//!     .register(Registration::new("buffer", Implementation::of_default::<Vec<u8>>()))
//!     .unwrap();
//!
//! assert_eq!(container.settings().signature_order, SignatureOrder::Relaxed);
//! assert!(container.get_as::<Vec<u8>>("buffer").unwrap().is_empty());
//! ```

pub use wirebox_config as config;
pub use wirebox_di as di;

pub use wirebox_config::{
    Config, ConfigError, ConfigProvider, ContainerSettings, FeatureFlags, SignatureOrder,
};
pub use wirebox_di::{
    global, BuildError, Component, Container, ContainerBuilder, ContractError, Dependency,
    DependencyGroup, DynError, GroupRegistry, Implementation, Interface, Key, Lifecycle,
    LoadError, Param, ParamKind, RegisterError, Registration, ResolveError,
};
