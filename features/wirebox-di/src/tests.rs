use std::{
    fmt::Display,
    sync::{
        atomic::{AtomicUsize, Ordering},
        mpsc, Arc, Barrier,
    },
    thread,
    time::Duration,
};

use tracing_subscriber::EnvFilter;
use wirebox_config::{ConfigProvider, ContainerSettings, SignatureOrder};

use crate::{
    Component, Container, ContractError, DynError, Implementation, Interface, Key, Param,
    RegisterError, Registration, ResolveError, TypeInfo,
};

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

#[derive(Debug, Default)]
struct Mailer;

#[derive(Debug, Default)]
struct FooBar;
impl Component for FooBar {
    fn construct() -> Result<Self, DynError> {
        Ok(FooBar)
    }
}

#[derive(Debug)]
struct NeedsArguments;
impl Component for NeedsArguments {
    fn construct() -> Result<Self, DynError> {
        Err(Box::new(SmtpDown))
    }
}

#[derive(Debug)]
struct SmtpDown;
impl Display for SmtpDown {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("smtp server unreachable")
    }
}
impl std::error::Error for SmtpDown {}

struct Cache;
impl Component for Cache {
    fn construct() -> Result<Self, DynError> {
        Ok(Cache)
    }

    fn interface() -> Interface {
        Interface::new("Cache")
            .method("get", [Param::req("key")])
            .method("set", [Param::req("key"), Param::req("value"), Param::key("ttl")])
            .method("clear", [])
    }
}

fn store_contract() -> Interface {
    Interface::new("Store")
        .method("get", [Param::req("key")])
        .method("set", [Param::req("key"), Param::req("value"), Param::key("ttl")])
}

#[test]
fn registered_keys_are_reported() {
    let container = Container::new();
    assert!(!container.contains_key("mailer"));

    container
        .register(Registration::new("mailer", Implementation::of_default::<Mailer>()))
        .unwrap();

    assert!(container.contains_key("mailer"));
    assert!(container.contains_key(Key::intern("mailer")));
    assert_eq!(container.len(), 1);
}

#[test]
fn duplicate_keys_are_rejected() {
    let container = Container::new();
    container
        .register(Registration::new("mailer", Implementation::of_default::<Mailer>()))
        .unwrap();

    let err = container
        .register(Registration::new("mailer", Implementation::of_default::<String>()).singleton())
        .unwrap_err();

    assert!(matches!(err, RegisterError::DuplicateKey(key) if key == Key::new("mailer")));
    assert_eq!(
        container.item("mailer").unwrap().implementation().info(),
        TypeInfo::of::<Mailer>()
    );
}

#[test]
fn key_and_implementation_are_required() {
    let container = Container::new();
    container
        .register(Registration::new("mailer", Implementation::of_default::<Mailer>()))
        .unwrap();

    assert!(matches!(
        container.register(Registration::default()),
        Err(RegisterError::MissingKey)
    ));
    assert!(matches!(
        container.register(Registration::default().key("  ")),
        Err(RegisterError::MissingKey)
    ));
    // Checked before the duplicate check
    assert!(matches!(
        container.register(Registration::default().key("mailer")),
        Err(RegisterError::MissingImplementation)
    ));
    assert_eq!(container.len(), 1);
}

#[test]
fn transient_resolves_fresh_instances() {
    let container = Container::new();
    container
        .register(Registration::new("mailer", Implementation::of_default::<Mailer>()).transient())
        .unwrap();

    let first = container.get("mailer").unwrap();
    let second = container.get("mailer").unwrap();

    assert!(first.is::<Mailer>());
    assert!(!first.ptr_eq(&second));
}

#[test]
fn singleton_resolves_the_same_instance() {
    init_tracing();
    let container = Container::new();
    container
        .register(Registration::new("mailer", Implementation::of_default::<Mailer>()).singleton())
        .unwrap();

    let first = container.get("mailer").unwrap();
    for _ in 0..5 {
        assert!(first.ptr_eq(&container.get("mailer").unwrap()));
    }
    assert!(container.item("mailer").unwrap().is_cached());
}

#[test]
fn concurrent_singleton_resolution_constructs_once() {
    let calls = Arc::new(AtomicUsize::new(0));
    let counted = calls.clone();

    let container = Container::new();
    container
        .register(
            Registration::new("mailer", Implementation::of_default::<Mailer>())
                .singleton()
                .factory(move || {
                    counted.fetch_add(1, Ordering::SeqCst);
                    thread::sleep(Duration::from_millis(20));
                    Ok::<_, DynError>(Mailer)
                }),
        )
        .unwrap();

    let instances: Vec<_> = thread::scope(|scope| {
        let handles: Vec<_> = (0..8)
            .map(|_| scope.spawn(|| container.get("mailer").unwrap()))
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert!(instances.iter().all(|i| i.ptr_eq(&instances[0])));
}

#[test]
fn factory_must_return_the_registered_type() {
    let container = Container::new();
    container
        .register(
            Registration::new("name", Implementation::of_default::<String>())
                .factory(|| Ok::<_, DynError>(42_u32)),
        )
        .unwrap();

    match container.get("name") {
        Err(ResolveError::InitializerTypeMismatch {
            key,
            expected,
            actual,
        }) => {
            assert_eq!(key, Key::new("name"));
            assert_eq!(expected, std::any::type_name::<String>());
            assert_eq!(actual, "u32");
        }
        other => panic!("expected a type mismatch, got {other:?}"),
    }
}

#[test]
fn shared_factory_result_is_returned_as_is() {
    let shared = Arc::new(Mailer);
    let handed_out = shared.clone();

    let container = Container::new();
    container
        .register(
            Registration::new("mailer", Implementation::of_default::<Mailer>())
                .shared_factory(move || Ok::<_, DynError>(handed_out.clone())),
        )
        .unwrap();

    let resolved = container.get_as::<Mailer>("mailer").unwrap();
    assert!(Arc::ptr_eq(&resolved, &shared));
}

#[test]
fn construction_errors_pass_through_unchanged() {
    let container = Container::new();
    container
        .register(
            Registration::new("mailer", Implementation::of_default::<Mailer>())
                .factory(|| Err::<Mailer, _>(SmtpDown)),
        )
        .unwrap();
    container
        .register(Registration::of::<NeedsArguments>("needs_arguments"))
        .unwrap();

    for key in ["mailer", "needs_arguments"] {
        let err = container.get(key).unwrap_err();
        assert_eq!(err.to_string(), "smtp server unreachable");
        assert!(err
            .construction_error()
            .and_then(|e| e.downcast_ref::<SmtpDown>())
            .is_some());
    }
}

#[test]
fn typed_resolution_reports_wrong_types() {
    let container = Container::new();
    container
        .register(Registration::new("mailer", Implementation::of_default::<Mailer>()))
        .unwrap();

    match container.get_as::<String>("mailer") {
        Err(ResolveError::DowncastFailed {
            required_type,
            actual_type,
        }) => {
            assert_eq!(required_type, std::any::type_name::<String>());
            assert_eq!(actual_type, std::any::type_name::<Mailer>());
        }
        other => panic!("expected a downcast failure, got {other:?}"),
    }
}

#[test]
fn unregistered_keys_fall_back_to_the_naming_convention() {
    init_tracing();
    let container = Container::builder()
        .namespace_type::<FooBar>()
        .build()
        .unwrap();

    let first = container.get("foo_bar").unwrap();
    let second = container.get("foo_bar").unwrap();
    assert!(first.is::<FooBar>());
    assert!(!first.ptr_eq(&second));
    assert!(!container.contains_key("foo_bar"));

    match container.get("bar_baz") {
        Err(ResolveError::UnknownType { key, type_name }) => {
            assert_eq!(key, Key::new("bar_baz"));
            assert_eq!(type_name, "BarBaz");
        }
        other => panic!("expected an unknown type, got {other:?}"),
    }
}

#[test]
fn convention_fallback_propagates_construction_errors() {
    let container = Container::builder()
        .namespace_type::<NeedsArguments>()
        .build()
        .unwrap();

    assert!(matches!(
        container.get("needs_arguments"),
        Err(ResolveError::Construction(_))
    ));
}

#[test]
fn convention_fallback_can_be_disabled() {
    let container = Container::builder()
        .settings(ContainerSettings::default().convention_fallback(false))
        .namespace_type::<FooBar>()
        .build()
        .unwrap();

    assert!(matches!(
        container.get("foo_bar"),
        Err(ResolveError::NotRegistered(key)) if key == Key::new("foo_bar")
    ));
}

#[test]
fn contract_is_checked_before_storing() {
    let container = Container::new();
    container
        .register(Registration::of::<Cache>("cache").contract(store_contract()))
        .unwrap();

    let missing = Interface::new("Flushable").method("flush", []).method("get", [Param::req("key")]);
    let err = container
        .register(Registration::of::<Cache>("flushable").contract(missing))
        .unwrap_err();

    match err {
        RegisterError::Contract(ContractError::MissingMethods { contract, methods }) => {
            assert_eq!(contract, "Flushable");
            assert_eq!(methods, vec!["flush".to_string()]);
        }
        other => panic!("expected missing methods, got {other:?}"),
    }
    assert_eq!(container.keys(), vec![Key::new("cache")]);
}

#[test]
fn keyword_turned_positional_is_incompatible() {
    let contract = Interface::new("Store").method("set", [Param::req("key"), Param::key_req("value")]);
    let implementation = Implementation::of_default::<Mailer>()
        .describe(Interface::new("Positional").method("set", [Param::req("key"), Param::req("value")]));

    let container = Container::new();
    let err = container
        .register(Registration::new("store", implementation).contract(contract))
        .unwrap_err();

    assert!(matches!(
        err,
        RegisterError::Contract(ContractError::IncompatibleSignature { ref method, ref parameters, .. })
            if method == "set" && parameters == &vec!["value".to_string()]
    ));
    assert!(container.is_empty());
}

#[test]
fn signature_order_follows_container_settings() {
    let contract = Interface::new("Pair").method("put", [Param::req("left"), Param::req("right")]);
    let swapped = || {
        Implementation::of_default::<Mailer>()
            .describe(Interface::new("Swapped").method("put", [Param::req("right"), Param::req("left")]))
    };

    let strict = Container::new();
    assert!(strict
        .register(Registration::new("pair", swapped()).contract(contract.clone()))
        .is_err());

    let mut config = ConfigProvider::new();
    config
        .add_config(ContainerSettings::default().signature_order(SignatureOrder::Relaxed))
        .unwrap();
    let relaxed = Container::builder()
        // Provider settings take precedence
        .settings(ContainerSettings::default())
        .config(config)
        .build()
        .unwrap();

    assert_eq!(relaxed.settings().signature_order, SignatureOrder::Relaxed);
    relaxed
        .register(Registration::new("pair", swapped()).contract(contract))
        .unwrap();
}

#[test]
fn circular_dependencies_are_detected() {
    let container = Container::new();

    let for_left = container.clone();
    container
        .register(
            Registration::new("left", Implementation::of_default::<Mailer>())
                .singleton()
                .factory(move || -> Result<Mailer, DynError> {
                    let _right = for_left.get("right")?;
                    Ok(Mailer)
                }),
        )
        .unwrap();

    let for_right = container.clone();
    container
        .register(
            Registration::new("right", Implementation::of_default::<Mailer>()).factory(
                move || -> Result<Mailer, DynError> {
                    let _left = for_right.get("left")?;
                    Ok(Mailer)
                },
            ),
        )
        .unwrap();

    let err = container.get("left").unwrap_err();
    assert!(
        err.to_string().contains(":left -> :right -> :left"),
        "unexpected error: {err}"
    );
    assert!(!container.item("left").unwrap().is_cached());

    // The resolution stack is unwound after the failure
    container
        .register(Registration::new("plain", Implementation::of_default::<Mailer>()))
        .unwrap();
    assert!(container.get("plain").is_ok());
}

#[test]
fn delegating_to_another_container_is_not_circular() {
    let upstream = Container::new();
    upstream
        .register(Registration::new("db", Implementation::of_default::<Mailer>()).singleton())
        .unwrap();

    let local = Container::new();
    let from = upstream.clone();
    local
        .register(
            Registration::new("db", Implementation::of_default::<Mailer>())
                .singleton()
                .shared_factory(move || from.get_as::<Mailer>("db")),
        )
        .unwrap();

    let resolved = local.get_as::<Mailer>("db").unwrap();
    assert!(Arc::ptr_eq(&resolved, &upstream.get_as::<Mailer>("db").unwrap()));
}

/// Singleton whose first construction waits for the other thread before resolving `next`
fn crossing_singleton(
    container: &Container,
    key: &'static str,
    next: &'static str,
    barrier: Arc<Barrier>,
) {
    let calls = AtomicUsize::new(0);
    let handle = container.clone();
    container
        .register(
            Registration::new(key, Implementation::of_default::<Mailer>())
                .singleton()
                .factory(move || -> Result<Mailer, DynError> {
                    if calls.fetch_add(1, Ordering::SeqCst) == 0 {
                        barrier.wait();
                    }
                    handle.get(next)?;
                    Ok(Mailer)
                }),
        )
        .unwrap();
}

#[test]
fn circular_singletons_resolved_from_two_threads_fail_instead_of_deadlocking() {
    let container = Container::new();
    let barrier = Arc::new(Barrier::new(2));
    crossing_singleton(&container, "left", "right", barrier.clone());
    crossing_singleton(&container, "right", "left", barrier);

    let (sender, receiver) = mpsc::channel();
    for key in ["left", "right"] {
        let container = container.clone();
        let sender = sender.clone();
        thread::spawn(move || {
            let result = container.get(key).map(|_| ()).map_err(|e| e.to_string());
            let _ = sender.send((key, result));
        });
    }

    for _ in 0..2 {
        let (key, result) = receiver
            .recv_timeout(Duration::from_secs(10))
            .expect("resolution deadlocked");
        let err = result.expect_err("a circular singleton must not resolve");
        assert!(err.contains("Circular dependency"), "{key}: {err}");
    }
    assert!(!container.item("left").unwrap().is_cached());
    assert!(!container.item("right").unwrap().is_cached());
}

#[test]
#[allow(deprecated)]
fn deprecated_presence_check_matches_contains_key() {
    init_tracing();
    let container = Container::new();
    assert!(!container.is_registered("mailer"));

    container
        .register(Registration::new("mailer", Implementation::of_default::<Mailer>()))
        .unwrap();
    assert!(container.is_registered("mailer"));
}

#[test]
fn keys_and_debug_are_sorted() {
    let container = Container::new();
    for key in ["zeta", "alpha", "mid"] {
        container
            .register(Registration::new(key, Implementation::of_default::<Mailer>()).singleton())
            .unwrap();
    }
    container.get("mid").unwrap();

    assert_eq!(
        container.keys(),
        vec![Key::new("alpha"), Key::new("mid"), Key::new("zeta")]
    );
    assert_eq!(
        format!("{container:?}"),
        r#"Container { alpha: "singleton", mid: "singleton (constructed)", zeta: "singleton" }"#
    );
}

#[test]
fn clones_share_the_registry() {
    #[derive(Debug, Clone, PartialEq)]
    struct Region(&'static str);

    let mut config = ConfigProvider::new();
    config.add_config(Region("eu-west")).unwrap();

    let container = Container::builder().config(config).build().unwrap();
    let handle = container.clone();
    handle
        .register(Registration::new("mailer", Implementation::of_default::<Mailer>()))
        .unwrap();

    assert!(container.ptr_eq(&handle));
    assert!(container.contains_key("mailer"));
    assert_eq!(*container.config::<Region>().unwrap(), Region("eu-west"));
    assert!(!container.ptr_eq(&Container::new()));
}
