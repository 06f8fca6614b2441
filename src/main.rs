//! `unperline` server binary.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context as _, Result};
use clap::{Parser, Subcommand};

use unperline::config::{Backend, Config};
use unperline::repository::{HashMapRepository, Repository};
use unperline::{handlers, service, telemetry};

#[derive(Parser)]
#[command(name = "unperline", about = "Reading-log service", version)]
struct Cli {
    /// TOML configuration file.
    #[arg(long, short, global = true, env = "UNPERLINE_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP server (the default).
    Serve {
        /// Address to bind, overriding the config file.
        #[arg(long, env = "UNPERLINE_BIND")]
        bind: Option<String>,

        /// SQLite database file. Switches storage to sqlite.
        #[arg(long, env = "UNPERLINE_DATABASE")]
        database: Option<PathBuf>,
    },

    /// Print the effective configuration as TOML.
    Config,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let mut config = Config::load(cli.config.as_deref())?;

    match cli.command.unwrap_or(Commands::Serve {
        bind: None,
        database: None,
    }) {
        Commands::Serve { bind, database } => {
            if let Some(bind) = bind {
                config.bind = bind;
            }
            if let Some(path) = database {
                config.storage.backend = Backend::Sqlite;
                config.storage.path = path;
            }
            telemetry::init(&config.log_filter);
            run_server(config).await
        }
        Commands::Config => {
            print!("{}", config.to_toml()?);
            Ok(())
        }
    }
}

async fn run_server(config: Config) -> Result<()> {
    tracing::info!(
        bind = %config.bind,
        backend = ?config.storage.backend,
        "starting unperline"
    );

    match config.storage.backend {
        Backend::Memory => serve(HashMapRepository::new(), &config).await,
        Backend::Sqlite => serve_sqlite(&config).await,
    }
}

#[cfg(feature = "sqlite")]
async fn serve_sqlite(config: &Config) -> Result<()> {
    let repo = unperline::repository::SqliteRepository::open(&config.storage.path)
        .with_context(|| format!("opening {}", config.storage.path.display()))?;
    serve(repo, config).await
}

#[cfg(not(feature = "sqlite"))]
async fn serve_sqlite(_config: &Config) -> Result<()> {
    anyhow::bail!("sqlite storage requires building with the `sqlite` feature")
}

async fn serve<R>(repo: R, config: &Config) -> Result<()>
where
    R: Repository + Send + Sync + 'static,
{
    let app = Arc::new(handlers::service(repo, config.settings()));
    service::serve(app, &config.bind)
        .await
        .with_context(|| format!("serving on {}", config.bind))
}
