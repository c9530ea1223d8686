//! Deckgen server - HTTP front end for presentation generation.

#![allow(clippy::print_stdout)] // CLI program intentionally uses stdout

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand};
use deckgen::config::config_path;
use deckgen::prelude::*;
use tracing::Level;
use tracing_subscriber::EnvFilter;

/// Deckgen - illustrated slide decks from a single request
#[derive(Parser)]
#[command(name = "deckgen-server")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Configuration file path
    #[arg(short, long, env = "DECKGEN_CONFIG", global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP API (default)
    Serve(ServeArgs),

    /// Validate configuration and credentials without serving
    Check,

    /// Print the default configuration file path
    ConfigPath,
}

/// Arguments for the serve command
#[derive(Args, Default)]
struct ServeArgs {
    /// Listen address (overrides config)
    #[arg(short, long, env = "DECKGEN_BIND")]
    bind: Option<String>,
}

fn main() -> ExitCode {
    load_dotenv();
    let cli = Cli::parse();

    init_logging(cli.verbose);

    let rt = match tokio::runtime::Runtime::new() {
        Ok(rt) => rt,
        Err(e) => {
            tracing::error!("failed to create tokio runtime: {e}");
            return ExitCode::FAILURE;
        }
    };

    match rt.block_on(run(cli)) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{e}");
            ExitCode::FAILURE
        }
    }
}

/// Load `.env.local` then `.env`; values already in the environment win.
fn load_dotenv() {
    for file in [".env.local", ".env"] {
        let _ = dotenvy::from_filename(file);
    }
}

/// Initialize logging with the given verbosity level.
fn init_logging(verbosity: u8) {
    let level = match verbosity {
        0 => Level::INFO,
        1 => Level::DEBUG,
        _ => Level::TRACE,
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "deckgen_server={level},deckgen={level},{}",
            if verbosity >= 2 { "tower_http=debug,debug" } else { "warn" }
        ))
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(verbosity >= 2)
        .init();
}

async fn run(cli: Cli) -> Result<()> {
    match cli.command.unwrap_or(Commands::Serve(ServeArgs::default())) {
        Commands::Serve(args) => cmd_serve(args, cli.config).await,
        Commands::Check => cmd_check(cli.config).await,
        Commands::ConfigPath => {
            println!("{}", config_path().display());
            Ok(())
        }
    }
}

/// Start the HTTP API.
async fn cmd_serve(args: ServeArgs, config_file: Option<PathBuf>) -> Result<()> {
    let config = load_config(config_file.as_deref()).await?;
    let credentials = Credentials::from_env(&config)?;

    tracing::info!(
        model = %config.generation.model,
        web_search = config.generation.web_search,
        images = %config.images.source,
        rate_limit = config.server.rate_limit_per_minute,
        "Starting deckgen server"
    );

    let service = PresentationService::from_config(&config, &credentials)?;
    let state = AppState::new(service, &config)?;
    let app = router(state, &config.server.base_path);

    let bind = args.bind.unwrap_or_else(|| config.server.bind.clone());
    serve(app, &bind, shutdown_signal()).await
}

/// Resolves on Ctrl+C.
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("failed to listen for shutdown signal: {e}");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutting down...");
}

/// Report configuration problems and missing credentials.
async fn cmd_check(config_file: Option<PathBuf>) -> Result<()> {
    let path = config_file.clone().unwrap_or_else(config_path);
    println!("Configuration: {}", path.display());

    let config = load_config(config_file.as_deref()).await?;
    for issue in config.validate() {
        println!("  {issue}");
    }

    println!("  Model:        {}", config.generation.model);
    println!("  Web search:   {}", config.generation.web_search);
    println!("  Image source: {}", config.images.source);
    println!("  Listen:       {}{}", config.server.bind, config.server.base_path);

    println!();
    println!("Credentials:");
    for key in config.required_credentials() {
        let status = if std::env::var(key).is_ok_and(|v| !v.trim().is_empty()) {
            "set"
        } else {
            "missing"
        };
        println!("  {key}: {status}");
    }

    Credentials::from_env(&config)?;
    println!();
    println!("Configuration is valid");
    Ok(())
}
