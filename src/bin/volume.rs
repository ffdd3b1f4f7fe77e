use anyhow::Result;
use clap::{Parser, Subcommand};
use mkv::common::{config::VOLUME_CONFIG_ENV, VolumeConfig};
use mkv::VolumeServer;
use std::net::SocketAddr;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(name = "mkv-volume")]
#[command(about = "mkv reference volume server - stores values as files")]
#[command(version)]
struct Cli {
    /// TOML config file (falls back to $MKV_VOLUME_CONFIG)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, global = true, default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Start the volume server
    Serve {
        /// Bind address for HTTP
        #[arg(long)]
        bind: Option<SocketAddr>,

        /// Data directory for stored values
        #[arg(long)]
        data: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| cli.log_level.clone().into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    match cli.command {
        Commands::Serve { bind, data } => {
            let file = cli
                .config
                .or_else(|| std::env::var_os(VOLUME_CONFIG_ENV).map(PathBuf::from));

            let mut config = VolumeConfig::load(file.as_deref())?;
            if let Some(bind) = bind {
                config.bind_addr = bind;
            }
            if let Some(data) = data {
                config.data_path = data;
            }

            VolumeServer::new(config).serve().await?;
        }
    }

    Ok(())
}
