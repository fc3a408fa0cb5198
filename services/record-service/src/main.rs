use anyhow::Context;
use clap::Parser;
use record_service::{Config, Handler, RecordService};
use std::io::Read;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Run one record handler against one request body.
///
/// The response envelope `{"statusCode","body"}` is written to stdout; logs
/// go to stderr.
#[derive(Parser, Debug)]
#[command(name = "record-service", version, about = "Transaction record handlers")]
struct Cli {
    /// validate | anonymize | encrypt | risk-assessment | store | retrieve
    handler: Handler,

    /// Request body as inline JSON
    #[arg(long, conflicts_with = "body_file")]
    body: Option<String>,

    /// Read the request body from a file
    #[arg(long)]
    body_file: Option<PathBuf>,

    /// TOML configuration file (environment variables are used otherwise)
    #[arg(long, env = "RECORD_SERVICE_CONFIG")]
    config: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .json()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    // Load configuration
    let config = match &cli.config {
        Some(path) => Config::from_file(path)?,
        None => Config::from_env().context("Failed to load configuration")?,
    };
    info!(
        storage_dir = %config.storage.base_dir.display(),
        cipher_mode = ?config.encryption.mode,
        "Configuration loaded"
    );

    let service = RecordService::new(&config)?;

    let body = match (cli.body, cli.body_file) {
        (Some(body), _) => body,
        (None, Some(path)) => std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read {}", path.display()))?,
        (None, None) => {
            let mut body = String::new();
            std::io::stdin()
                .read_to_string(&mut body)
                .context("Failed to read request body from stdin")?;
            body
        }
    };

    let response = service.dispatch(cli.handler, Some(&body));
    println!("{}", serde_json::to_string(&response)?);

    Ok(())
}
