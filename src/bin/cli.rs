//! Client CLI for an mkv index

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use mkv::common::{format_bytes, key_to_path};
use reqwest::StatusCode;

#[derive(Parser)]
#[command(name = "mkv")]
#[command(about = "mkv object store CLI")]
#[command(version)]
struct Cli {
    /// Index URL
    #[arg(long, default_value = "http://localhost:3000")]
    index: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Put a blob
    Put {
        /// Key
        key: String,

        /// File path
        #[arg(long)]
        file: std::path::PathBuf,
    },

    /// Get a blob (follows the redirect to its volume)
    Get {
        /// Key
        key: String,

        /// Output file
        #[arg(long)]
        output: std::path::PathBuf,
    },

    /// Print the volume URL a key resolves to
    Locate {
        /// Key
        key: String,
    },

    /// Delete a blob
    Delete {
        /// Key
        key: String,
    },
}

fn url(index: &str, key: &str) -> String {
    format!("{}{}", index.trim_end_matches('/'), key_to_path(key.as_bytes()))
}

fn explain(status: StatusCode) -> &'static str {
    match status {
        StatusCode::NOT_FOUND => "key not found",
        StatusCode::CONFLICT => "key already exists",
        StatusCode::LENGTH_REQUIRED => "empty value",
        _ => "request failed",
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    let client = reqwest::Client::new();

    match cli.command {
        Commands::Put { key, file } => {
            let data = tokio::fs::read(&file)
                .await
                .with_context(|| format!("reading {}", file.display()))?;
            let size = data.len() as u64;
            let resp = client.put(url(&cli.index, &key)).body(data).send().await?;
            if resp.status() != StatusCode::CREATED {
                bail!("PUT {}: {} ({})", key, resp.status(), explain(resp.status()));
            }
            println!("Stored {} ({})", key, format_bytes(size));
        }

        Commands::Get { key, output } => {
            let resp = client.get(url(&cli.index, &key)).send().await?;
            if !resp.status().is_success() {
                bail!("GET {}: {} ({})", key, resp.status(), explain(resp.status()));
            }
            let data = resp.bytes().await?;
            tokio::fs::write(&output, &data)
                .await
                .with_context(|| format!("writing {}", output.display()))?;
            println!(
                "Wrote {} to {}",
                format_bytes(data.len() as u64),
                output.display()
            );
        }

        Commands::Locate { key } => {
            let client = reqwest::Client::builder()
                .redirect(reqwest::redirect::Policy::none())
                .build()?;
            let resp = client.head(url(&cli.index, &key)).send().await?;
            if resp.status() != StatusCode::FOUND {
                bail!("HEAD {}: {} ({})", key, resp.status(), explain(resp.status()));
            }
            let location = resp
                .headers()
                .get(reqwest::header::LOCATION)
                .and_then(|v| v.to_str().ok())
                .context("redirect without Location header")?;
            println!("{}", location);
        }

        Commands::Delete { key } => {
            let resp = client.delete(url(&cli.index, &key)).send().await?;
            if resp.status() != StatusCode::NO_CONTENT {
                bail!("DELETE {}: {} ({})", key, resp.status(), explain(resp.status()));
            }
            println!("Deleted {}", key);
        }
    }

    Ok(())
}
