use std::{
    sync::atomic::{AtomicU64, Ordering},
    time::{SystemTime, UNIX_EPOCH},
};

use wirebox::{
    Component, Container, Dependency, DependencyGroup, DynError, FeatureFlags, GroupRegistry,
    Implementation, Interface, Param, Registration, ResolveError, SignatureOrder,
};

/// Values the demo groups read while registering
#[derive(Debug, Clone)]
pub struct DemoConfig {
    pub greeting: String,
}

pub struct SystemClock;
impl Component for SystemClock {
    fn construct() -> Result<Self, DynError> {
        Ok(SystemClock)
    }

    fn interface() -> Interface {
        Interface::new("SystemClock").method("now", [Param::opt("zone")])
    }
}
impl SystemClock {
    pub fn now(&self) -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|elapsed| elapsed.as_secs())
            .unwrap_or_default()
    }
}

pub struct Greeter {
    greeting: String,
}
impl Component for Greeter {
    fn construct() -> Result<Self, DynError> {
        Err("a greeter needs a configured greeting".into())
    }
}
impl Greeter {
    pub fn greet(&self, name: &str) -> String {
        format!("{}, {name}!", self.greeting)
    }
}

#[derive(Default)]
pub struct RequestCounter(AtomicU64);
impl RequestCounter {
    pub fn hit(&self) -> u64 {
        self.0.fetch_add(1, Ordering::Relaxed) + 1
    }
}

pub struct AuditLog;
impl Component for AuditLog {
    fn construct() -> Result<Self, DynError> {
        Ok(AuditLog)
    }

    fn interface() -> Interface {
        Interface::new("AuditLog").method("record", [Param::req("message"), Param::req("level")])
    }
}

/// Constructed through the naming convention, nobody registers it
pub struct Banner;
impl Component for Banner {
    fn construct() -> Result<Self, DynError> {
        Ok(Banner)
    }
}
impl Banner {
    pub fn text(&self) -> &'static str {
        "== wirebox demo =="
    }
}

struct CoreServices;
impl DependencyGroup for CoreServices {
    fn register(&self, container: &Container) -> Result<(), DynError> {
        let clock = Interface::new("Clock").method("now", [Param::req("zone")]);
        container.register(Registration::of::<SystemClock>("clock").singleton().contract(clock))?;

        let config = container.config::<DemoConfig>()?;
        container.register(Registration::of::<Greeter>("greeter").factory(move || {
            Ok::<_, DynError>(Greeter {
                greeting: config.greeting.clone(),
            })
        }))?;
        Ok(())
    }
}

struct MetricsServices;
impl DependencyGroup for MetricsServices {
    fn is_valid(&self, container: &Container) -> Result<bool, DynError> {
        Ok(container.config::<FeatureFlags>()?.is_enabled("metrics"))
    }

    fn register(&self, container: &Container) -> Result<(), DynError> {
        container.register(
            Registration::new(
                "request_counter",
                Implementation::of_default::<RequestCounter>(),
            )
            .singleton(),
        )?;
        Ok(())
    }
}

/// The contract lists the parameters in another order, so the group is skipped unless signatures
/// are relaxed
struct AuditServices;
impl DependencyGroup for AuditServices {
    fn is_valid(&self, container: &Container) -> Result<bool, DynError> {
        if !container.config::<FeatureFlags>()?.is_enabled("audit") {
            return Ok(false);
        }
        if container.settings().signature_order == SignatureOrder::Strict {
            tracing::warn!("Skipping the audit feature, it needs relaxed signatures");
            return Ok(false);
        }
        Ok(true)
    }

    fn register(&self, container: &Container) -> Result<(), DynError> {
        let audit = Interface::new("Audit")
            .method("record", [Param::req("level"), Param::req("message")]);
        container.register(Registration::of::<AuditLog>("audit_log").contract(audit))?;
        Ok(())
    }
}

pub fn groups() -> GroupRegistry {
    GroupRegistry::new()
        .add(MetricsServices)
        .add(AuditServices)
        .add(CoreServices)
}

/// Consumer resolving its dependencies from the default container on first use
pub struct Signup {
    clock: Dependency<SystemClock>,
    greeter: Dependency<Greeter>,
}
impl Default for Signup {
    fn default() -> Self {
        Signup {
            clock: Dependency::new("clock"),
            greeter: Dependency::new("greeter"),
        }
    }
}
impl Signup {
    pub fn welcome(&self, name: &str) -> Result<String, ResolveError> {
        Ok(format!(
            "{} (signed up at {})",
            self.greeter.get()?.greet(name),
            self.clock.get()?.now()
        ))
    }
}
