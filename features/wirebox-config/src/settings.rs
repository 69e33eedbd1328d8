/// How positional parameters are compared when validating a contract
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum SignatureOrder {
    /// Positional parameters must appear in the same order as in the contract
    #[default]
    Strict,
    /// Parameters are only matched by name, their order is ignored
    Relaxed,
}

/// Behaviour switches of a container
///
/// Register an instance in a [`ConfigProvider`](crate::provider::ConfigProvider) to have a container
/// builder pick it up, otherwise the defaults apply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContainerSettings {
    /// Ordering rule used by the contract validator
    pub signature_order: SignatureOrder,
    /// Resolve unregistered keys by looking up a type named after the key
    pub convention_fallback: bool,
}
impl Default for ContainerSettings {
    fn default() -> Self {
        Self {
            signature_order: SignatureOrder::Strict,
            convention_fallback: true,
        }
    }
}
impl ContainerSettings {
    pub fn signature_order(mut self, order: SignatureOrder) -> Self {
        self.signature_order = order;
        self
    }

    pub fn convention_fallback(mut self, enabled: bool) -> Self {
        self.convention_fallback = enabled;
        self
    }
}
