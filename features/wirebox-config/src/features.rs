use std::collections::BTreeSet;

/// Set of enabled feature names
///
/// Dependency groups consult these flags to decide whether their registrations apply.
/// Names are trimmed and lowercased.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FeatureFlags {
    enabled: BTreeSet<String>,
}

impl FeatureFlags {
    pub fn new<I, S>(features: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut flags = Self::default();
        for feature in features {
            flags.enable(feature.as_ref());
        }
        flags
    }

    /// Parses a comma separated list, e.g. `"cache, metrics"`
    pub fn parse(list: &str) -> Self {
        Self::new(list.split(','))
    }

    /// Reads a comma separated list from an environment variable
    ///
    /// A missing or non unicode variable yields no features.
    pub fn from_env(var: &str) -> Self {
        match std::env::var(var) {
            Ok(list) => {
                let flags = Self::parse(&list);
                tracing::debug!("Loaded features {:?} from {var}", flags.enabled);
                flags
            }
            Err(_) => Self::default(),
        }
    }

    pub fn enable(&mut self, feature: &str) -> &mut Self {
        let feature = feature.trim().to_lowercase();
        if !feature.is_empty() {
            self.enabled.insert(feature);
        }
        self
    }

    pub fn is_enabled(&self, feature: &str) -> bool {
        self.enabled.contains(&feature.trim().to_lowercase())
    }

    /// Adds all features of `other`
    pub fn merge(mut self, other: FeatureFlags) -> Self {
        self.enabled.extend(other.enabled);
        self
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.enabled.iter().map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.enabled.is_empty()
    }
}
