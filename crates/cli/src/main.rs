//! Domain registry command line interface
//!
//! Drives an in-process registry: either the built-in `mango` walkthrough or
//! a JSON script of calls.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use domains_registry::{
    AccountId, Amount, BroadcastEventSink, DomainRegistry, RegistryConfig, RegistryEvent,
};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::broadcast::error::RecvError;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod script;

use script::{run_script, Script};

const DEFAULT_NAMESPACE: &str = "mango";
const DEFAULT_MIN_PRICE: &str = "0.1";
const DEFAULT_ADMINISTRATOR_SEED: &str = "deployer";

#[derive(Parser)]
#[command(name = "domains-cli")]
#[command(about = "Domain name registry command line interface", long_about = None)]
#[command(version)]
struct Cli {
    /// Registry configuration file (TOML); DOMAINS_* variables override it
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Log filter used when RUST_LOG is unset
    #[arg(long, default_value = "info")]
    log_level: String,

    /// Log output style
    #[arg(long, value_enum, default_value_t = LogFormat::Pretty)]
    log_format: LogFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum LogFormat {
    Pretty,
    Compact,
}

#[derive(Subcommand)]
enum Commands {
    /// Register `smart`, set its record and resolve it
    Demo {
        /// Label to register
        #[arg(long, default_value = "smart")]
        label: String,
        /// Record to attach
        #[arg(long, default_value = "A very studious fruit")]
        record: String,
    },
    /// Apply a JSON script of registry calls
    Run {
        /// Path to the script
        script: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(&cli.log_level, cli.log_format);

    let config = load_config(cli.config.as_deref())?;

    match cli.command {
        Commands::Demo { label, record } => run_demo(config, &label, &record).await,
        Commands::Run { script } => run_script_file(config, &script),
    }
}

fn init_logging(level: &str, format: LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    match format {
        LogFormat::Pretty => tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().pretty())
            .init(),
        LogFormat::Compact => tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().compact())
            .init(),
    }
}

fn default_config() -> Result<RegistryConfig> {
    Ok(RegistryConfig::new(
        DEFAULT_NAMESPACE,
        Amount::parse(DEFAULT_MIN_PRICE)?,
        AccountId::derive(DEFAULT_ADMINISTRATOR_SEED),
    ))
}

fn load_config(path: Option<&Path>) -> Result<RegistryConfig> {
    let defaults = default_config()?;
    let config = RegistryConfig::load_with_defaults(&defaults, path)
        .context("Failed to load registry configuration")?;
    info!(
        namespace = %config.namespace,
        min_price = %config.min_price,
        "Loaded registry configuration"
    );
    Ok(config)
}

async fn run_demo(config: RegistryConfig, label: &str, record: &str) -> Result<()> {
    let sink = BroadcastEventSink::new(64);
    let mut events = sink.subscribe();
    let observer = tokio::spawn(async move {
        loop {
            match events.recv().await {
                Ok(event) => log_event(&event),
                Err(RecvError::Lagged(skipped)) => {
                    warn!(target: "events", skipped, "Event observer lagged")
                }
                Err(RecvError::Closed) => break,
            }
        }
    });

    let min_price = config.min_price;
    let registry = DomainRegistry::with_event_sink(config, Arc::new(sink))?;
    println!("Registry deployed for namespace: {}", registry.namespace());

    let owner = AccountId::derive("alice");
    let rival = AccountId::derive("bob");

    let minted = registry.register(&owner, label, min_price)?;
    println!("Minted domain {}", minted.full_name(registry.namespace()));

    registry.set_record(&owner, label, record)?;
    println!("Record set successfully!");

    println!("Record: {}", registry.get_record(label)?);
    println!("Owner of domain {}: {}", label, registry.get_owner(label)?);

    match registry.register(&rival, label, min_price) {
        Ok(_) => anyhow::bail!("second registration of {} unexpectedly succeeded", label),
        Err(err) => println!("Second registration rejected: {}", err),
    }

    println!("Registry balance: {}", registry.get_balance());

    // Dropping the registry closes the channel and ends the observer.
    drop(registry);
    observer.await.context("Event observer task failed")?;

    Ok(())
}

fn log_event(event: &RegistryEvent) {
    match event {
        RegistryEvent::Registered {
            label,
            owner,
            payment,
        } => info!(target: "events", %label, %owner, %payment, "Registered"),
        RegistryEvent::RecordUpdated { label } => {
            info!(target: "events", %label, "RecordUpdated")
        }
        RegistryEvent::Withdrawn { to, amount } => {
            info!(target: "events", %to, %amount, "Withdrawn")
        }
    }
}

fn run_script_file(config: RegistryConfig, path: &Path) -> Result<()> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("Failed to read script {}", path.display()))?;
    let script: Script = serde_json::from_str(&raw)
        .with_context(|| format!("Failed to parse script {}", path.display()))?;

    let registry = DomainRegistry::new(config)?;
    let outcomes = run_script(&registry, &script);

    let rejected = outcomes.iter().filter(|o| !o.is_ok()).count();
    for outcome in &outcomes {
        println!("{}", serde_json::to_string(outcome)?);
    }

    info!(
        applied = outcomes.len() - rejected,
        rejected,
        "Script finished"
    );

    println!("{}", serde_json::to_string_pretty(&registry.snapshot())?);
    Ok(())
}
