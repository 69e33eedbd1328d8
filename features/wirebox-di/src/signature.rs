//! Declared method signatures
//!
//! Implementations and contracts describe their methods with an [`Interface`]: a named map from
//! method name to its ordered parameter list. The contract validator compares two of them.

use std::{
    borrow::Cow,
    collections::BTreeMap,
    fmt::{Debug, Display},
};

/// Kind of a single method parameter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParamKind {
    /// Positional parameter the caller must pass
    Required,
    /// Positional parameter with a default value
    Optional,
    /// Keyword parameter the caller must pass
    KeyRequired,
    /// Keyword parameter with a default value
    KeyOptional,
    /// Catch-all for remaining positional arguments
    Rest,
    /// Catch-all for remaining keyword arguments
    KeyRest,
    /// Trailing callback argument
    Block,
}

impl ParamKind {
    /// Checks if an implementation parameter of kind `implementation` honours a contract
    /// parameter of this kind.
    ///
    /// Kinds must match, except that an implementation may relax a required parameter to an
    /// optional one of the same family.
    pub fn accepts(self, implementation: ParamKind) -> bool {
        self == implementation
            || matches!(
                (self, implementation),
                (ParamKind::Required, ParamKind::Optional)
                    | (ParamKind::KeyRequired, ParamKind::KeyOptional)
            )
    }

    pub fn is_positional(self) -> bool {
        matches!(
            self,
            ParamKind::Required | ParamKind::Optional | ParamKind::Rest
        )
    }

    /// Marker used to identify a nameless parameter of this kind
    fn marker(self) -> &'static str {
        match self {
            ParamKind::Rest => "*",
            ParamKind::KeyRest => "**",
            ParamKind::Block => "&",
            ParamKind::Required
            | ParamKind::Optional
            | ParamKind::KeyRequired
            | ParamKind::KeyOptional => "_",
        }
    }
}

/// A single parameter of a method signature
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Param {
    pub kind: ParamKind,
    pub name: Option<Cow<'static, str>>,
}

impl Param {
    pub fn new(kind: ParamKind, name: impl Into<Cow<'static, str>>) -> Self {
        Param {
            kind,
            name: Some(name.into()),
        }
    }

    /// Parameter without a name, only meaningful for catch-alls and blocks
    pub fn anonymous(kind: ParamKind) -> Self {
        Param { kind, name: None }
    }

    pub fn req(name: impl Into<Cow<'static, str>>) -> Self {
        Self::new(ParamKind::Required, name)
    }

    pub fn opt(name: impl Into<Cow<'static, str>>) -> Self {
        Self::new(ParamKind::Optional, name)
    }

    pub fn key_req(name: impl Into<Cow<'static, str>>) -> Self {
        Self::new(ParamKind::KeyRequired, name)
    }

    pub fn key(name: impl Into<Cow<'static, str>>) -> Self {
        Self::new(ParamKind::KeyOptional, name)
    }

    pub fn rest(name: impl Into<Cow<'static, str>>) -> Self {
        Self::new(ParamKind::Rest, name)
    }

    pub fn key_rest(name: impl Into<Cow<'static, str>>) -> Self {
        Self::new(ParamKind::KeyRest, name)
    }

    pub fn block(name: impl Into<Cow<'static, str>>) -> Self {
        Self::new(ParamKind::Block, name)
    }

    /// Name used to match parameters across signatures
    pub fn ident(&self) -> &str {
        match &self.name {
            Some(name) if !name.is_empty() => name.as_ref(),
            _ => self.kind.marker(),
        }
    }
}
impl Display for Param {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = self.name.as_deref().unwrap_or_default();
        match self.kind {
            ParamKind::Required => write!(f, "{name}"),
            ParamKind::Optional => write!(f, "{name} = ..."),
            ParamKind::KeyRequired => write!(f, "{name}:"),
            ParamKind::KeyOptional => write!(f, "{name}: ..."),
            ParamKind::Rest => write!(f, "*{name}"),
            ParamKind::KeyRest => write!(f, "**{name}"),
            ParamKind::Block => write!(f, "&{name}"),
        }
    }
}

/// Declared set of method signatures
///
/// Used both as the description of an implementation and as a contract an implementation has to
/// satisfy. Methods are kept sorted by name.
///
/// ```rust
/// use wirebox_di::{Interface, Param};
///
/// let cache = Interface::new("Cache")
///     .method("get", [Param::req("key")])
///     .method("set", [Param::req("key"), Param::req("value"), Param::key("expires")]);
///
/// assert_eq!(cache.len(), 2);
/// assert!(cache.get("set").is_some());
/// ```
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Interface {
    name: Cow<'static, str>,
    methods: BTreeMap<Cow<'static, str>, Vec<Param>>,
}
impl Debug for Interface {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut map = f.debug_map();
        for (method, params) in &self.methods {
            let params: Vec<String> = params.iter().map(Param::to_string).collect();
            map.entry(method, &format!("({})", params.join(", ")));
        }
        map.finish()
    }
}

impl Interface {
    pub fn new(name: impl Into<Cow<'static, str>>) -> Self {
        Interface {
            name: name.into(),
            methods: BTreeMap::new(),
        }
    }

    /// Declares a method, replacing an earlier declaration of the same name
    ///
    /// Parameter names must be unique within the method, only nameless catch-alls and blocks may
    /// repeat.
    pub fn method(
        mut self,
        name: impl Into<Cow<'static, str>>,
        params: impl IntoIterator<Item = Param>,
    ) -> Self {
        let name = name.into();
        let params: Vec<Param> = params.into_iter().collect();
        debug_assert!(
            duplicate_name(&params).is_none(),
            "parameter '{}' of {}::{name} is declared twice",
            duplicate_name(&params).unwrap_or_default(),
            self.name
        );
        self.methods.insert(name, params);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn get(&self, method: &str) -> Option<&[Param]> {
        self.methods.get(method).map(Vec::as_slice)
    }

    pub fn contains(&self, method: &str) -> bool {
        self.methods.contains_key(method)
    }

    /// Methods in name order
    pub fn methods(&self) -> impl Iterator<Item = (&str, &[Param])> {
        self.methods
            .iter()
            .map(|(name, params)| (name.as_ref(), params.as_slice()))
    }

    pub fn len(&self) -> usize {
        self.methods.len()
    }

    pub fn is_empty(&self) -> bool {
        self.methods.is_empty()
    }
}

fn duplicate_name(params: &[Param]) -> Option<&str> {
    params.iter().enumerate().find_map(|(index, param)| {
        let name = param.name.as_deref().filter(|name| !name.is_empty())?;
        params[..index]
            .iter()
            .any(|earlier| earlier.name.as_deref() == Some(name))
            .then_some(name)
    })
}
