use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use fitmalta_core::{Catalog, FavoritesStore};

mod commands;
mod config;
mod session;

use commands::{AccountCommand, CatalogCommand, ConfigCommand, FavoritesCommand, FavoritesContext};
use config::Config;

#[derive(Parser)]
#[command(name = "fitmalta")]
#[command(version)]
#[command(about = "Save and browse FitMalta meal plans and workouts", long_about = None)]
struct Cli {
    /// Path to config file
    #[arg(long, short, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage saved meal plans and workouts
    Favorites(FavoritesCommand),

    /// Browse available meal plans and workouts
    Catalog(CatalogCommand),

    /// Sign in and out
    Account(AccountCommand),

    /// Manage configuration
    Config(ConfigCommand),
}

fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config = Config::load(cli.config)?;
    tracing::debug!("Data directory: {}", config.data_dir.value.display());

    let session_storage = config.session_storage();

    match cli.command {
        Some(Commands::Favorites(cmd)) => {
            let mut store = FavoritesStore::open(config.repository());
            let catalog = Catalog::builtin()?;
            let mut session = session_storage.load()?;
            cmd.run(FavoritesContext {
                store: &mut store,
                catalog: &catalog,
                session: &mut session,
                session_storage: &session_storage,
            })?;
        }
        Some(Commands::Catalog(cmd)) => {
            let store = FavoritesStore::open(config.repository());
            let catalog = Catalog::builtin()?;
            cmd.run(&catalog, &store)?;
        }
        Some(Commands::Account(cmd)) => {
            let mut session = session_storage.load()?;
            cmd.run(&mut session, &session_storage)?;
        }
        Some(Commands::Config(cmd)) => {
            cmd.run(&config)?;
        }
        None => {
            println!("Use --help to see available commands");
        }
    }

    Ok(())
}
