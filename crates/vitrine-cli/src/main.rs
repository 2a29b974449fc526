use std::fs::OpenOptions;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use anyhow::{anyhow, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use vitrine_core::{AppConfig, Capabilities, EnvProbe};

mod commands;

#[derive(Parser)]
#[command(name = "vitrine")]
#[command(author, version, about = "Preview scroll-driven page presentation in the terminal")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Use this config file instead of ~/.config/vitrine/config.toml
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Behave as if the user prefers reduced motion
    #[arg(long, global = true)]
    reduced_motion: bool,

    /// Behave as if visibility observation is unavailable
    #[arg(long, global = true)]
    no_observer: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Open a page in the terminal preview
    Run {
        /// Page description (TOML)
        page: PathBuf,
    },
    /// Parse a page and print what it registers
    Check {
        page: PathBuf,
    },
    /// Validate an inquiry against a page's form and store it if accepted
    Submit {
        page: PathBuf,
        /// Field value as name=value; repeatable
        #[arg(short = 'f', long = "field", value_parser = parse_field)]
        fields: Vec<(String, String)>,
    },
    /// List captured inquiries
    Inquiries,
    /// Inspect or create the configuration file
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Print the effective configuration
    Show,
    /// Write a default configuration file
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
    /// Print the configuration file path
    Path,
}

/// Parse a `name=value` pair
fn parse_field(raw: &str) -> Result<(String, String), String> {
    let (name, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected name=value, got '{}'", raw))?;
    let name = name.trim();
    if name.is_empty() {
        return Err(format!("missing field name in '{}'", raw));
    }
    Ok((name.to_string(), value.to_string()))
}

/// Install the tracing subscriber; the terminal preview logs to a file
fn init_logging(config: &AppConfig, log_to_file: bool) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.general.log_level));
    let registry = tracing_subscriber::registry().with(filter);

    if log_to_file {
        let path = config.log_file_path();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let file = OpenOptions::new().create(true).append(true).open(&path)?;
        registry
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_ansi(false)
                    .with_writer(Mutex::new(file)),
            )
            .init();
    } else {
        registry
            .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
            .init();
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config_path = cli.config.clone().unwrap_or_else(AppConfig::config_path);
    let mut config = AppConfig::load_from(&config_path)
        .map_err(|e| anyhow!("Failed to load {}: {}", config_path.display(), e))?;

    if cli.reduced_motion {
        config.capabilities.reduced_motion = Some(true);
    }
    if cli.no_observer {
        config.capabilities.observer_supported = Some(false);
    }

    init_logging(&config, matches!(cli.command, Commands::Run { .. }))?;

    let config = Arc::new(config);
    let capabilities = || Capabilities::detect(&EnvProbe, &config.capabilities);

    match cli.command {
        Commands::Run { page } => commands::run::run(config.clone(), &page, capabilities()).await,
        Commands::Check { page } => commands::check::run(&config, &page, capabilities()),
        Commands::Submit { page, fields } => commands::submit::run(&config, &page, &fields).await,
        Commands::Inquiries => commands::inquiries::run(&config).await,
        Commands::Config { action } => match action {
            ConfigAction::Show => commands::config::show(&config),
            ConfigAction::Init { force } => commands::config::init(&config_path, force),
            ConfigAction::Path => commands::config::path(&config_path),
        },
    }
}
