/// Errors when registering or retrieving a config
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// The requested config type was never registered
    #[error("The config type '{0}' is not known")]
    Missing(&'static str),
    /// A config of the same type is already registered
    #[error("The config type '{0}' is already registered")]
    AlreadyRegistered(&'static str),
    /// The stored value could not be downcast to the requested type
    #[error("Failed to downcast config, required: '{required_type}' actual: '{actual_type}'")]
    DowncastFailed {
        required_type: &'static str,
        actual_type: &'static str,
    },
}
