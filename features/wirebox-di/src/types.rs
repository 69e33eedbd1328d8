use std::{
    any::{Any, TypeId},
    collections::HashSet,
    fmt::{Debug, Display},
    sync::{Arc, OnceLock},
};

use parking_lot::Mutex;

/// Boxed error raised by user code (constructors, factories, groups)
pub type DynError = Box<dyn std::error::Error + Send + Sync>;

/// Instances are shared between threads, so anything injectable needs to be Send + Sync + 'static
pub trait Injectable: Send + Sync + 'static {}
impl<T: Send + Sync + 'static> Injectable for T {}

/// Symbolic name a dependency is registered under
///
/// Keys are interned: `Key::new` takes a static name, `Key::intern` leaks a runtime name into
/// the process wide symbol table once and reuses it afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Key(&'static str);

impl Key {
    pub const fn new(name: &'static str) -> Self {
        Key(name)
    }

    pub fn intern(name: &str) -> Self {
        static SYMBOLS: OnceLock<Mutex<HashSet<&'static str>>> = OnceLock::new();

        let mut symbols = SYMBOLS.get_or_init(Default::default).lock();
        if let Some(existing) = symbols.get(name) {
            return Key(*existing);
        }
        let leaked: &'static str = Box::leak(name.to_owned().into_boxed_str());
        symbols.insert(leaked);
        Key(leaked)
    }

    pub fn as_str(&self) -> &'static str {
        self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.trim().is_empty()
    }
}
impl Display for Key {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, ":{}", self.0)
    }
}
impl From<&'static str> for Key {
    fn from(name: &'static str) -> Self {
        Key(name)
    }
}

/// Type Name and Type Id
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq)]
pub struct TypeInfo {
    pub type_name: &'static str,
    pub type_id: TypeId,
}
impl Display for TypeInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.type_name)
    }
}
impl TypeInfo {
    pub fn of<T: 'static + ?Sized>() -> TypeInfo {
        TypeInfo {
            type_name: std::any::type_name::<T>(),
            type_id: TypeId::of::<T>(),
        }
    }

    /// Last path segment of the type name, without generic arguments
    pub fn short_name(&self) -> &'static str {
        let path = self
            .type_name
            .split_once('<')
            .map_or(self.type_name, |(path, _)| path);
        path.rsplit("::").next().unwrap_or(path)
    }
}

/// A constructed dependency
#[derive(Clone)]
pub struct Instance {
    pub info: TypeInfo,
    pub instance: Arc<dyn Any + Send + Sync + 'static>,
}
impl Debug for Instance {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Instance")
            .field("type", &self.info.type_name)
            .field("ptr", &Arc::as_ptr(&self.instance))
            .finish()
    }
}

impl Instance {
    pub fn new<T: Injectable>(instance: T) -> Self {
        Self::from_arc(Arc::new(instance))
    }

    /// Wraps an existing allocation, keeping its identity
    pub fn from_arc<T: Injectable>(instance: Arc<T>) -> Self {
        Instance {
            info: TypeInfo::of::<T>(),
            instance,
        }
    }

    pub fn downcast<T: Injectable>(&self) -> Result<Arc<T>, &'static str> {
        match Arc::downcast::<T>(self.instance.clone()) {
            Ok(downcasted) => Ok(downcasted),
            Err(_) => Err(self.info.type_name),
        }
    }

    pub fn is<T: Injectable>(&self) -> bool {
        self.info.type_id == TypeId::of::<T>()
    }

    /// True if both point to the same allocation
    pub fn ptr_eq(&self, other: &Instance) -> bool {
        std::ptr::addr_eq(Arc::as_ptr(&self.instance), Arc::as_ptr(&other.instance))
    }
}
