//! Staybook CLI
//!
//! ```sh
//! # Run the API with the default config (~/.config/staybook/config.toml)
//! staybook
//!
//! # Custom config path and port
//! staybook serve --config /etc/staybook/config.toml --api-port 8080
//!
//! # Validate the config without starting
//! staybook check
//!
//! # Load sample data, wiping existing listings first
//! staybook seed --clear
//! ```

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use tracing::{error, info};

use staybook::config::{AppConfig, CONFIG_ENV};
use staybook::server::{init_tracing, seed_database, ServerHandle, ServerOptions};

#[derive(Parser, Debug)]
#[command(
    name = "staybook",
    version,
    about = "Booking marketplace API: listings, bookings and reviews",
    long_about = "Staybook REST API server and maintenance commands.\n\n\
                  Default config: ~/.config/staybook/config.toml"
)]
struct Cli {
    /// Path to the configuration file (TOML).
    #[arg(short, long, global = true, env = CONFIG_ENV)]
    config: Option<PathBuf>,

    /// Override the log level (trace, debug, info, warn, error).
    #[arg(short, long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the REST API server (default).
    Serve(ServeArgs),
    /// Validate the configuration file and exit.
    Check,
    /// Populate the database with sample hosts, listings, bookings and reviews.
    Seed {
        /// Delete existing listings, bookings and reviews first.
        #[arg(long)]
        clear: bool,
    },
}

#[derive(Args, Debug, Default)]
struct ServeArgs {
    /// Override the REST API listen port.
    #[arg(long)]
    api_port: Option<u16>,

    /// Skip database migrations on startup.
    #[arg(long)]
    no_migrate: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config_path = cli.config.unwrap_or_else(staybook::default_config_path);

    let mut config = match AppConfig::load(&config_path) {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("Failed to load config from {}: {}", config_path.display(), e);
            std::process::exit(1);
        }
    };
    if let Some(level) = cli.log_level {
        config.logging.level = level;
    }
    init_tracing(&config);
    info!("Configuration loaded from {}", config_path.display());

    match cli.command.unwrap_or(Command::Serve(ServeArgs::default())) {
        Command::Check => {
            println!("✅ Configuration is valid");
            println!("   Config file : {}", config_path.display());
            println!("   API address : {}", config.api_address());
            println!("   Database    : {}", config.database.display_url());
            println!("   Log level   : {}", config.logging.level);
            println!(
                "   Overlap     : {}",
                if config.bookings.strict_overlap_check { "strict" } else { "allowed" }
            );
            Ok(())
        }
        Command::Seed { clear } => {
            let report = seed_database(&config, clear).await.map_err(|e| {
                error!("Seeding failed: {}", e);
                e
            })?;
            if clear {
                println!("Cleared {} listings", report.cleared_listings);
            }
            println!(
                "Seeded {} hosts, {} guests, {} listings, {} bookings, {} reviews ({} host responses)",
                report.hosts,
                report.guests,
                report.listings,
                report.bookings,
                report.reviews,
                report.host_responses
            );
            Ok(())
        }
        Command::Serve(args) => {
            if let Some(port) = args.api_port {
                info!("CLI override: api_port = {}", port);
                config.server.api_port = port;
            }

            let handle = ServerHandle::start(ServerOptions {
                config,
                auto_migrate: !args.no_migrate,
            })
            .await?;

            handle.install_signal_handler();
            info!("🚀 Press Ctrl+C to shut down gracefully.");

            handle.shutdown_signal().wait().await;
            handle.wait().await;
            Ok(())
        }
    }
}
