use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use serde_json::Value;
use std::path::PathBuf;
use tenable_inventory::config::default_config_path;
use tenable_inventory::{AssetsPlugin, Inventory, ProcessEnv};
use tracing::Level;
use tracing_subscriber::fmt::writer::MakeWriterExt;

/// Ansible dynamic inventory from Tenable assets
#[derive(Parser, Debug)]
#[command(name = "tenable-inventory", version, about, long_about = None)]
struct Args {
    /// List all hosts (default)
    #[arg(long, conflicts_with = "host")]
    list: bool,

    /// Print variables of a single host
    #[arg(long, value_name = "HOST")]
    host: Option<String>,

    /// Inventory config file (reads `api_endpoint`)
    #[arg(short, long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Pretty-print JSON output
    #[arg(long)]
    pretty: bool,

    /// Log level, written to stderr
    #[arg(long, value_enum, default_value = "off")]
    log_level: LogLevel,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum LogLevel {
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    fn to_tracing_level(self) -> Option<Level> {
        match self {
            LogLevel::Off => None,
            LogLevel::Error => Some(Level::ERROR),
            LogLevel::Warn => Some(Level::WARN),
            LogLevel::Info => Some(Level::INFO),
            LogLevel::Debug => Some(Level::DEBUG),
            LogLevel::Trace => Some(Level::TRACE),
        }
    }
}

/// Stdout carries the inventory JSON, so logs go to stderr.
fn setup_logging(level: LogLevel) -> Option<tracing_appender::non_blocking::WorkerGuard> {
    let tracing_level = level.to_tracing_level()?;

    let (non_blocking, guard) = tracing_appender::non_blocking(std::io::stderr());

    tracing_subscriber::fmt()
        .with_max_level(tracing_level)
        .with_writer(non_blocking.with_max_level(tracing_level))
        .with_ansi(false)
        .with_target(true)
        .init();

    tracing::debug!("tenable-inventory started with log level: {:?}", level);

    Some(guard)
}

fn print_json(value: &Value, pretty: bool) -> Result<()> {
    let output = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    println!("{}", output);
    Ok(())
}

async fn run(args: &Args) -> Result<()> {
    let mut inventory = Inventory::new();

    // Hosts never carry variables, so there is nothing to fetch
    if let Some(host) = &args.host {
        return print_json(&inventory.host_vars(host), args.pretty);
    }

    tracing::debug!("Listing hosts (explicit --list: {})", args.list);
    let path = args
        .config
        .clone()
        .unwrap_or_else(|| default_config_path(&ProcessEnv));
    tracing::info!("Using inventory config: {:?}", path);

    let plugin = AssetsPlugin::from_process();
    if !plugin.verify_file(&path) {
        anyhow::bail!("Unsupported inventory config: {}", path.display());
    }

    plugin
        .parse(&mut inventory, &path)
        .await
        .context("Failed to build Tenable inventory")?;
    tracing::info!("Inventory holds {} hosts", inventory.len());

    print_json(&inventory.to_list_json(), args.pretty)
}

#[tokio::main]
async fn main() {
    let args = Args::parse();
    let log_guard = setup_logging(args.log_level);

    let result = run(&args).await;
    if let Err(err) = &result {
        eprintln!("Error: {:#}", err);
    }

    // Flush pending log lines before exiting
    drop(log_guard);
    if result.is_err() {
        std::process::exit(1);
    }
}
