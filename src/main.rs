//! Number Vault server
//!
//! Run with: cargo run -- serve
//!
//! # Configuration
//!
//! Read from `--config`, or the first of `~/.config/numvault/config.toml`,
//! `/etc/numvault/config.toml` and `./numvault.toml`. Environment variables
//! override the file:
//! - `NUMVAULT_HOST`, `NUMVAULT_PORT`: Address to bind (default: 0.0.0.0:8085)
//! - `NUMVAULT_BACKEND`: `supabase` (default) or `memory`
//! - `SUPABASE_URL`, `SUPABASE_ANON_KEY`: Supabase project
//! - `NUMVAULT_TABLE`: Table holding the numbers (default: numbers)
//! - `NUMVAULT_LOG_LEVEL`, `NUMVAULT_LOG_FORMAT`: Logging (`pretty` or `json`)
//! - `RUST_LOG`: Overrides the log filter entirely

use anyhow::Context;
use clap::{Parser, Subcommand};
use numvault::backend::{Backend, MemoryBackend, SupabaseBackend};
use numvault::config::{generate_default_config, BackendKind, Config, LoggingConfig};
use numvault::web::{serve, AppState};
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser)]
#[command(name = "numvault")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Keep your personal numbers behind an account")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the web server
    Serve {
        /// Config file (default: search the usual locations)
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// Host to bind to
        #[arg(long)]
        host: Option<String>,
        /// Port to listen on
        #[arg(short, long)]
        port: Option<u16>,
        /// Use the in-memory backend instead of Supabase
        #[arg(long)]
        memory: bool,
    },

    /// Print a default config file
    Config,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Config => {
            print!("{}", generate_default_config());
            Ok(())
        }
        Commands::Serve {
            config,
            host,
            port,
            memory,
        } => {
            let mut config = match config {
                Some(path) => Config::load_with_env(&path)
                    .with_context(|| format!("loading {}", path.display()))?,
                None => Config::load_default(),
            };
            if let Some(host) = host {
                config.server.host = host;
            }
            if let Some(port) = port {
                config.server.port = port;
            }
            if memory {
                config.backend.kind = BackendKind::Memory;
            }

            init_tracing(&config.logging);
            run(config).await
        }
    }
}

fn init_tracing(logging: &LoggingConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| format!("numvault={},tower_http=info", logging.level).into());

    let registry = tracing_subscriber::registry().with(filter);
    if logging.format == "json" {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}

async fn run(config: Config) -> anyhow::Result<()> {
    tracing::info!("Starting Number Vault v{}", env!("CARGO_PKG_VERSION"));
    config.validate()?;

    match config.backend.kind {
        BackendKind::Supabase => {
            tracing::info!("Using Supabase backend at {}", config.backend.url);
            let backend = Arc::new(SupabaseBackend::new(config.backend.supabase())?);
            start(backend, &config).await
        }
        BackendKind::Memory => {
            tracing::warn!("Using in-memory backend; accounts and numbers are lost on exit");
            start(Arc::new(MemoryBackend::new()), &config).await
        }
    }
}

async fn start<B: Backend + 'static>(backend: Arc<B>, config: &Config) -> anyhow::Result<()> {
    match backend.health_check().await {
        Ok(()) => tracing::info!("Backend {} is reachable", backend.name()),
        Err(e) => tracing::warn!("Backend {} not available: {}", backend.name(), e),
    }

    let state = AppState::with_sessions(
        backend,
        config.web(),
        config.session.hub(),
        config.session.manager(),
    );
    serve(state).await?;

    tracing::info!("Number Vault stopped");
    Ok(())
}
