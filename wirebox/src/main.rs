use anyhow::Context;
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};
use wirebox::{
    global, ConfigProvider, Container, ContainerSettings, FeatureFlags, SignatureOrder,
};

mod app;

use app::{Banner, DemoConfig, RequestCounter, Signup};

/// Environment variable holding a comma separated list of enabled features
const FEATURES_ENV: &str = "WIREBOX_FEATURES";

#[derive(Parser, Debug)]
#[command(name = "wirebox-demo")]
#[command(author, version, about = "Wires a small application from dependency groups", long_about = None)]
struct Args {
    /// Enables a feature, may be repeated (known: metrics, audit)
    ///
    /// `audit` is skipped unless `--relaxed-signatures` is given.
    #[arg(short, long = "feature", value_name = "NAME")]
    features: Vec<String>,

    /// Fail on unregistered keys instead of constructing a type named after them
    #[arg(long)]
    no_fallback: bool,

    /// Ignore the order of positional parameters when checking contracts
    #[arg(long)]
    relaxed_signatures: bool,

    /// Greeting used by the greeter service
    #[arg(long, default_value = "Hello")]
    greeting: String,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(fmt::layer().with_target(false))
        .init();

    let features = FeatureFlags::new(&args.features).merge(FeatureFlags::from_env(FEATURES_ENV));
    let order = if args.relaxed_signatures {
        SignatureOrder::Relaxed
    } else {
        SignatureOrder::Strict
    };
    tracing::info!("Enabled features: {:?}", features.iter().collect::<Vec<_>>());

    let mut config = ConfigProvider::new();
    config
        .add_config(
            ContainerSettings::default()
                .signature_order(order)
                .convention_fallback(!args.no_fallback),
        )?
        .add_config(features)?
        .add_config(DemoConfig {
            greeting: args.greeting,
        })?;

    let container = Container::builder()
        .config(config)
        .namespace_type::<Banner>()
        .groups(app::groups())
        .build_default()
        .context("failed to wire the application")?;
    tracing::info!("Registered dependencies: {:?}", container.keys());

    match container.get_as::<Banner>("banner") {
        Ok(banner) => println!("{}", banner.text()),
        Err(e) => tracing::warn!("No banner: {e}"),
    }

    let signup = Signup::default();
    for name in ["Ada", "Grace"] {
        println!("{}", signup.welcome(name)?);
        if container.contains_key("request_counter") {
            let counter = container.get_as::<RequestCounter>("request_counter")?;
            println!("requests served: {}", counter.hit());
        }
    }

    if container.contains_key("audit_log") {
        println!("audit log registered with relaxed signatures");
    }

    println!("{container:?}");
    global::clear();
    Ok(())
}
