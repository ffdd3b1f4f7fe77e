//! Index server binary

use clap::{Parser, Subcommand};
use mkv::common::{config::INDEX_CONFIG_ENV, parse_volume_list, IndexConfig};
use mkv::IndexServer;
use std::net::SocketAddr;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "mkv-index")]
#[command(about = "mkv index server")]
#[command(version)]
struct Cli {
    /// TOML config file (falls back to $MKV_INDEX_CONFIG)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, global = true, default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the index server
    Serve {
        /// Bind address for HTTP
        #[arg(long)]
        bind: Option<SocketAddr>,

        /// Index database directory
        #[arg(long)]
        db: Option<PathBuf>,

        /// Volume server addresses (comma-separated)
        #[arg(long)]
        volumes: Option<String>,

        /// Timeout for calls to volumes, in seconds
        #[arg(long)]
        volume_timeout: Option<u64>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| cli.log_level.clone().into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    match cli.command {
        Commands::Serve {
            bind,
            db,
            volumes,
            volume_timeout,
        } => {
            let file = cli
                .config
                .or_else(|| std::env::var_os(INDEX_CONFIG_ENV).map(PathBuf::from));

            // File and environment first, CLI flags override
            let mut config = IndexConfig::load(file.as_deref())?;
            if let Some(bind) = bind {
                config.bind_addr = bind;
            }
            if let Some(db) = db {
                config.db_path = db;
            }
            if let Some(volumes) = volumes {
                config.volumes = parse_volume_list(&volumes);
            }
            if let Some(secs) = volume_timeout {
                config.volume_timeout_secs = secs;
            }

            if let Err(e) = config.validate() {
                tracing::error!("{}", e);
                anyhow::bail!(e);
            }

            IndexServer::new(config).serve().await?;
        }
    }

    Ok(())
}
