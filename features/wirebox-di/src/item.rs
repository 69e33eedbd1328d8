use std::{
    cell::RefCell,
    fmt::Debug,
    sync::OnceLock,
    thread::{self, ThreadId},
    time::Duration,
};

use parking_lot::{Mutex, MutexGuard};

use crate::{
    errors::ResolveError,
    factories::{Factory, Implementation},
    types::{Instance, Key},
};

/// How often a registration is constructed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Lifecycle {
    /// One shared instance for the life of the container
    Singleton,
    /// A fresh instance on every resolution
    #[default]
    Transient,
}

/// A single registration in the container
///
/// Everything but the cached singleton instance is fixed at registration time.
pub struct ContainerItem {
    key: Key,
    implementation: Implementation,
    lifecycle: Lifecycle,
    factory: Option<Factory>,
    /// Set once, on first resolution of a singleton
    cached: OnceLock<Instance>,
    /// Serializes singleton construction
    init_lock: Mutex<()>,
}
impl Debug for ContainerItem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ContainerItem")
            .field("key", &self.key)
            .field("implementation", &self.implementation.info().type_name)
            .field("lifecycle", &self.lifecycle)
            .field("factory", &self.factory.is_some())
            .field("cached", &self.is_cached())
            .finish()
    }
}

impl ContainerItem {
    pub(crate) fn new(
        key: Key,
        implementation: Implementation,
        lifecycle: Lifecycle,
        factory: Option<Factory>,
    ) -> Self {
        ContainerItem {
            key,
            implementation,
            lifecycle,
            factory,
            cached: OnceLock::new(),
            init_lock: Mutex::new(()),
        }
    }

    pub fn key(&self) -> Key {
        self.key
    }

    pub fn implementation(&self) -> &Implementation {
        &self.implementation
    }

    pub fn lifecycle(&self) -> Lifecycle {
        self.lifecycle
    }

    pub fn is_cached(&self) -> bool {
        self.cached.get().is_some()
    }

    /// Returns the cached singleton or a fresh transient instance
    pub(crate) fn resolve(&self) -> Result<Instance, ResolveError> {
        match self.lifecycle {
            Lifecycle::Transient => self.construct(),
            Lifecycle::Singleton => {
                if let Some(instance) = self.cached.get() {
                    return Ok(instance.clone());
                }

                // Only one thread constructs, the others wait and read the cache
                let _guard = self.lock_for_construction()?;

                // Double check - it might have been set while we waited for the lock
                if let Some(instance) = self.cached.get() {
                    WAIT_GRAPH.lock().finish(self.id());
                    return Ok(instance.clone());
                }

                let constructed = self.construct();
                WAIT_GRAPH.lock().finish(self.id());

                let instance = constructed?;
                tracing::debug!("Cached singleton {} for {}", instance.info, self.key);
                Ok(self.cached.get_or_init(|| instance).clone())
            }
        }
    }

    fn id(&self) -> usize {
        self as *const ContainerItem as usize
    }

    /// Takes the init lock and records this thread as its builder
    ///
    /// While waiting, the thread is recorded as waiting on this item. If the builder of this item
    /// is itself waiting, directly or through other builders, on an item this thread is building,
    /// nobody can proceed and the wait ends with a circular dependency.
    fn lock_for_construction(&self) -> Result<MutexGuard<'_, ()>, ResolveError> {
        let me = thread::current().id();

        loop {
            if let Some(guard) = self.init_lock.try_lock_for(WAIT_SLICE) {
                WAIT_GRAPH.lock().build(me, self.id());
                return Ok(guard);
            }

            let mut graph = WAIT_GRAPH.lock();
            graph.wait(me, self.id());
            if graph.blocks(self.id(), me) {
                graph.stop_waiting(me);
                drop(graph);

                let mut chain = ResolutionGuard::chain();
                if chain.last() != Some(&self.key) {
                    chain.push(self.key);
                }
                tracing::debug!("Deadlock while waiting for {} on {:?}", self.key, me);
                return Err(ResolveError::CircularDependency {
                    key: self.key,
                    chain,
                });
            }
        }
    }

    fn construct(&self) -> Result<Instance, ResolveError> {
        let expected = self.implementation.info();

        let Some(factory) = &self.factory else {
            return self
                .implementation
                .construct()
                .map_err(ResolveError::Construction);
        };

        let instance = factory().map_err(ResolveError::Construction)?;
        if instance.info.type_id != expected.type_id {
            return Err(ResolveError::InitializerTypeMismatch {
                key: self.key,
                expected: expected.type_name,
                actual: instance.info.type_name,
            });
        }

        Ok(instance)
    }
}

/// How long a thread waits on an init lock before checking for a deadlock
const WAIT_SLICE: Duration = Duration::from_millis(25);

static WAIT_GRAPH: Mutex<WaitGraph> = parking_lot::const_mutex(WaitGraph::new());

/// Which thread builds which singleton and which thread waits on which singleton
///
/// Items are identified by address, they stay alive while a thread builds or waits on them.
struct WaitGraph {
    builders: Vec<(usize, ThreadId)>,
    waiting: Vec<(ThreadId, usize)>,
}
impl WaitGraph {
    const fn new() -> Self {
        WaitGraph {
            builders: Vec::new(),
            waiting: Vec::new(),
        }
    }

    fn build(&mut self, thread: ThreadId, item: usize) {
        self.stop_waiting(thread);
        self.finish(item);
        self.builders.push((item, thread));
    }

    fn finish(&mut self, item: usize) {
        self.builders.retain(|(built, _)| *built != item);
    }

    fn wait(&mut self, thread: ThreadId, item: usize) {
        self.stop_waiting(thread);
        self.waiting.push((thread, item));
    }

    fn stop_waiting(&mut self, thread: ThreadId) {
        self.waiting.retain(|(waiter, _)| *waiter != thread);
    }

    /// Follows builder and waiting edges from `item`, true if they lead to `thread`
    fn blocks(&self, mut item: usize, thread: ThreadId) -> bool {
        for _ in 0..=self.waiting.len() {
            let Some(&(_, builder)) = self.builders.iter().find(|(built, _)| *built == item) else {
                return false;
            };
            if builder == thread {
                return true;
            }
            let Some(&(_, next)) = self.waiting.iter().find(|(waiter, _)| *waiter == builder)
            else {
                return false;
            };
            item = next;
        }
        false
    }
}

thread_local! {
    static RESOLVING: RefCell<Vec<(usize, Key)>> = const { RefCell::new(Vec::new()) };
}

/// Marks a key of one container as being resolved on the current thread
///
/// Entering a key of the same container which is already on the stack is a circular dependency.
pub(crate) struct ResolutionGuard {
    entry: (usize, Key),
}
impl ResolutionGuard {
    pub(crate) fn enter(container: usize, key: Key) -> Result<Self, ResolveError> {
        let entry = (container, key);
        RESOLVING.with(|stack| {
            let mut stack = stack.borrow_mut();
            if stack.contains(&entry) {
                let mut chain: Vec<Key> = stack.iter().map(|(_, key)| *key).collect();
                chain.push(key);
                return Err(ResolveError::CircularDependency { key, chain });
            }
            stack.push(entry);
            Ok(ResolutionGuard { entry })
        })
    }

    /// Keys currently being resolved on this thread, outermost first
    pub(crate) fn chain() -> Vec<Key> {
        RESOLVING.with(|stack| stack.borrow().iter().map(|(_, key)| *key).collect())
    }
}
impl Drop for ResolutionGuard {
    fn drop(&mut self) {
        RESOLVING.with(|stack| {
            let mut stack = stack.borrow_mut();
            if let Some(position) = stack.iter().rposition(|entry| *entry == self.entry) {
                stack.truncate(position);
            }
        });
    }
}
