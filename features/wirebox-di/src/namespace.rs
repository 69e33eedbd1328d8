use std::collections::HashMap;

use crate::factories::{Component, Implementation};

/// Types the container may construct for keys nobody registered
///
/// An unregistered key such as `:foo_bar` is turned into the type name `FooBar` and looked up here.
#[derive(Debug, Clone, Default)]
pub struct Namespace {
    types: HashMap<String, Implementation>,
}

impl Namespace {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `T` under the last segment of its type path
    pub fn add<T: Component>(mut self) -> Self {
        self.insert_implementation(Implementation::of::<T>());
        self
    }

    /// Adds an implementation under its short type name
    pub fn insert_implementation(&mut self, implementation: Implementation) -> &mut Self {
        let name = implementation.info().short_name().to_string();
        self.insert(name, implementation)
    }

    /// Adds an implementation under an explicit name
    pub fn insert(&mut self, name: impl Into<String>, implementation: Implementation) -> &mut Self {
        let name = name.into();
        if let Some(previous) = self.types.insert(name.clone(), implementation) {
            tracing::debug!("Namespace entry {name} replaced {}", previous.info());
        }
        self
    }

    pub fn lookup(&self, type_name: &str) -> Option<&Implementation> {
        self.types.get(type_name)
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}

/// Converts a key into the type name the naming convention expects
///
/// Segments are split on `_`, `-` and whitespace, each one capitalized and joined.
pub fn type_name_for(key: &str) -> String {
    key.split(|c: char| c == '_' || c == '-' || c.is_whitespace())
        .filter(|segment| !segment.is_empty())
        .map(capitalize)
        .collect()
}

fn capitalize(segment: &str) -> String {
    let mut chars = segment.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::DynError;

    #[derive(Debug, Default)]
    struct FooBar;
    impl Component for FooBar {
        fn construct() -> Result<Self, DynError> {
            Ok(FooBar)
        }
    }

    #[test]
    fn keys_become_camel_case_type_names() {
        assert_eq!(type_name_for("foo_bar"), "FooBar");
        assert_eq!(type_name_for("array"), "Array");
        assert_eq!(type_name_for("nil_class"), "NilClass");
        assert_eq!(type_name_for("__double__underscore"), "DoubleUnderscore");
        assert_eq!(type_name_for("mixed-sep name"), "MixedSepName");
        assert_eq!(type_name_for("SHOUTING_key"), "ShoutingKey");
        assert_eq!(type_name_for(""), "");
    }

    #[test]
    fn types_are_found_by_short_name() {
        let namespace = Namespace::new().add::<FooBar>();

        assert_eq!(namespace.len(), 1);
        let implementation = namespace.lookup("FooBar").unwrap();
        assert!(implementation.construct().unwrap().is::<FooBar>());
        assert!(namespace.lookup("foo_bar").is_none());
    }
}
