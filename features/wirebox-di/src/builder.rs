use std::sync::Arc;

use wirebox_config::{ConfigProvider, ContainerSettings};

use crate::{
    container::Container,
    errors::BuildError,
    factories::Component,
    global,
    group::{DependencyGroup, GroupRegistry},
    namespace::Namespace,
};

/// Collects everything a container is wired from
///
/// 1. Settings, either set directly or read from the config provider
/// 2. Types the naming convention may construct
/// 3. Dependency groups, loaded once the container exists
///
/// ```rust
/// use wirebox_di::{Container, DependencyGroup, DynError, Implementation, Registration};
///
/// struct Core;
/// impl DependencyGroup for Core {
///     fn register(&self, container: &Container) -> Result<(), DynError> {
///         container.register(
///             Registration::new("name", Implementation::of_default::<String>()).singleton(),
///         )?;
///         Ok(())
///     }
/// }
///
/// let container = Container::builder().group(Core).build().unwrap();
/// assert!(container.contains_key("name"));
/// ```
#[derive(Debug, Default)]
pub struct ContainerBuilder {
    settings: Option<ContainerSettings>,
    config: ConfigProvider,
    namespace: Namespace,
    groups: GroupRegistry,
}

impl ContainerBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Settings used when the config provider holds none
    pub fn settings(mut self, settings: ContainerSettings) -> Self {
        self.settings = Some(settings);
        self
    }

    /// Configs the container and its groups can read
    ///
    /// [`ContainerSettings`] registered in the provider take precedence over [`ContainerBuilder::settings`].
    pub fn config(mut self, config: ConfigProvider) -> Self {
        self.config = config;
        self
    }

    pub fn namespace(mut self, namespace: Namespace) -> Self {
        self.namespace = namespace;
        self
    }

    /// Makes `T` available to the naming convention
    pub fn namespace_type<T: Component>(mut self) -> Self {
        self.namespace = self.namespace.add::<T>();
        self
    }

    pub fn group<G: DependencyGroup>(mut self, group: G) -> Self {
        self.groups.push(group);
        self
    }

    pub fn groups(mut self, groups: GroupRegistry) -> Self {
        self.groups = groups;
        self
    }

    /// Creates the container and loads all valid groups into it
    pub fn build(self) -> Result<Container, BuildError> {
        let ContainerBuilder {
            settings,
            config,
            namespace,
            groups,
        } = self;

        let settings = match config.get_config::<ContainerSettings>()? {
            Some(configured) => ContainerSettings::clone(&configured),
            None => settings.unwrap_or_default(),
        };
        tracing::debug!(
            "Building container with {:?} and {} namespace types",
            settings,
            namespace.len()
        );

        let container = Container::from_parts(settings, namespace, Arc::new(config));
        let applied = container.load_groups(&groups)?;
        tracing::debug!(
            "Loaded {applied} of {} groups, {} dependencies registered",
            groups.len(),
            container.len()
        );

        Ok(container)
    }

    /// Like [ContainerBuilder::build], then installs the container as process default
    pub fn build_default(self) -> Result<Container, BuildError> {
        let container = self.build()?;
        if let Some(previous) = global::install(container.clone()) {
            tracing::debug!("Replaced default container holding {} dependencies", previous.len());
        }
        Ok(container)
    }
}
