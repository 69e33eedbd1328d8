use thiserror::Error;
use wirebox_config::ConfigError;

use crate::types::{DynError, Key};

/// Errors when registering a dependency
#[derive(Error, Debug)]
pub enum RegisterError {
    #[error("A key must be specified to register a dependency.")]
    MissingKey,
    #[error("A dependency implementation must be specified to register a dependency.")]
    MissingImplementation,
    #[error("A dependency has already been registered for the key: '{0}'")]
    DuplicateKey(Key),
    /// The implementation does not satisfy the requested contract
    #[error(transparent)]
    Contract(#[from] ContractError),
}

/// Mismatches between an implementation and a contract
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ContractError {
    #[error("The following methods of '{contract}' have not been implemented: '{}'", .methods.join(", "))]
    MissingMethods {
        contract: String,
        methods: Vec<String>,
    },
    #[error("The method signature of method: '{method}' does not match the contract '{contract}', offending parameters: '{}'", .parameters.join(", "))]
    IncompatibleSignature {
        contract: String,
        method: String,
        parameters: Vec<String>,
    },
}

/// Errors when resolving a dependency
#[derive(Error, Debug)]
pub enum ResolveError {
    /// A custom factory returned an instance of another type
    #[error("The custom factory for '{key}' does not return an object of the expected type: '{expected}' (got '{actual}')")]
    InitializerTypeMismatch {
        key: Key,
        expected: &'static str,
        actual: &'static str,
    },
    /// The naming convention found no type for an unregistered key
    #[error("No dependency is registered for '{key}' and no type named '{type_name}' is known")]
    UnknownType { key: Key, type_name: String },
    /// The key is not registered and the naming convention is disabled
    #[error("No dependency is registered for '{0}'")]
    NotRegistered(Key),
    /// The key is requested again while it is still being constructed
    #[error("Circular dependency while resolving '{key}': {}", format_chain(.chain))]
    CircularDependency { key: Key, chain: Vec<Key> },
    #[error("Failed to downcast, required: '{required_type}' actual: '{actual_type}'")]
    DowncastFailed {
        required_type: &'static str,
        actual_type: &'static str,
    },
    /// No process wide default container is installed
    #[error("No default container has been installed")]
    NoDefaultContainer,
    /// Error raised by a constructor or factory, passed through as is
    #[error("{0}")]
    Construction(DynError),
}

impl ResolveError {
    /// The error raised by user code, if this is a construction failure
    pub fn construction_error(&self) -> Option<&(dyn std::error::Error + Send + Sync + 'static)> {
        match self {
            ResolveError::Construction(error) => Some(error.as_ref()),
            _ => None,
        }
    }
}

fn format_chain(chain: &[Key]) -> String {
    chain
        .iter()
        .map(Key::to_string)
        .collect::<Vec<_>>()
        .join(" -> ")
}

/// Errors while loading dependency groups
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("Validity check of group '{group}' failed - error: {error}")]
    ValidityCheckFailed {
        group: &'static str,
        error: DynError,
    },
    #[error("Group '{group}' failed to register its dependencies - error: {error}")]
    RegistrationFailed {
        group: &'static str,
        error: DynError,
    },
}

/// Errors while building a container
#[derive(Error, Debug)]
pub enum BuildError {
    #[error("Failed to read container settings - error: {0}")]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Load(#[from] LoadError),
}
