use std::fmt::Debug;

use crate::{
    container::Container,
    errors::LoadError,
    types::{DynError, TypeInfo},
};

/// A batch of registrations applied together
///
/// ```rust
/// use wirebox_di::{Container, DependencyGroup, DynError, GroupRegistry, Implementation, Registration};
///
/// struct Storage;
/// impl DependencyGroup for Storage {
///     fn register(&self, container: &Container) -> Result<(), DynError> {
///         container.register(Registration::new("cache", Implementation::of_default::<Vec<u8>>()))?;
///         Ok(())
///     }
/// }
///
/// let container = Container::new();
/// let applied = container.load_groups(&GroupRegistry::new().add(Storage)).unwrap();
///
/// assert_eq!(applied, 1);
/// assert!(container.contains_key("cache"));
/// ```
pub trait DependencyGroup: Send + Sync + 'static {
    /// Whether the registrations of this group should be applied at all
    ///
    /// Typically depends on feature flags, see [`Container::config`].
    fn is_valid(&self, _container: &Container) -> Result<bool, DynError> {
        Ok(true)
    }

    fn register(&self, container: &Container) -> Result<(), DynError>;
}

struct RegisteredGroup {
    info: TypeInfo,
    group: Box<dyn DependencyGroup>,
}

/// Explicit list of known dependency groups
///
/// Groups are applied ordered by their full type name, independent of the order they were added in.
#[derive(Default)]
pub struct GroupRegistry {
    groups: Vec<RegisteredGroup>,
}
impl Debug for GroupRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.names()).finish()
    }
}

impl GroupRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add<G: DependencyGroup>(mut self, group: G) -> Self {
        self.push(group);
        self
    }

    pub fn push<G: DependencyGroup>(&mut self, group: G) -> &mut Self {
        self.groups.push(RegisteredGroup {
            info: TypeInfo::of::<G>(),
            group: Box::new(group),
        });
        self
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Group type names in load order
    pub fn names(&self) -> Vec<&'static str> {
        self.sorted().into_iter().map(|g| g.info.type_name).collect()
    }

    fn sorted(&self) -> Vec<&RegisteredGroup> {
        let mut sorted: Vec<_> = self.groups.iter().collect();
        sorted.sort_by_key(|g| g.info.type_name);
        sorted
    }

    /// Applies every valid group to `container`, returns how many were applied
    ///
    /// The first failing group aborts loading. Groups applied before it keep their registrations.
    pub fn load(&self, container: &Container) -> Result<usize, LoadError> {
        let mut applied = 0;

        for registered in self.sorted() {
            let group = registered.info.type_name;

            let valid = registered
                .group
                .is_valid(container)
                .map_err(|error| LoadError::ValidityCheckFailed { group, error })?;
            if !valid {
                tracing::debug!("Skipping group {group}, it is not valid");
                continue;
            }

            tracing::debug!("Loading group {group}");
            registered
                .group
                .register(container)
                .map_err(|error| LoadError::RegistrationFailed { group, error })?;
            applied += 1;
        }

        Ok(applied)
    }
}
