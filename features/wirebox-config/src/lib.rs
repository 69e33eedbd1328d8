//! Wirebox Config provides a typed registry of configs that containers and dependency groups
//! can consult while wiring an application.
//!
//! Wirebox Config is split into these parts:
//! 1. ConfigProvider: Used to create the registry of all configs
//! 2. Config<T>: A shared handle to a registered config
//! 3. ContainerSettings and FeatureFlags: the configs the container itself understands
//!
//! # Examples
//!
//! ```rust
//! use wirebox_config::{
//!     provider::ConfigProvider,
//!     settings::{ContainerSettings, SignatureOrder},
//! };
//!
//! let mut provider = ConfigProvider::new();
//! provider
//!     .add_config(ContainerSettings::default().signature_order(SignatureOrder::Relaxed))
//!     .unwrap();
//!
//! let settings = provider.config::<ContainerSettings>().unwrap();
//! assert_eq!(settings.signature_order, SignatureOrder::Relaxed);
//! ```

pub mod config;
pub mod errors;
pub mod features;
pub mod provider;
pub mod settings;

pub use config::Config;
pub use errors::ConfigError;
pub use features::FeatureFlags;
pub use provider::ConfigProvider;
pub use settings::{ContainerSettings, SignatureOrder};
