//! Back-office API command line
//!
//! Issues requests through the same client the back-office screens use, so
//! caching, auth and error classification can be exercised from a shell.

use std::process::ExitCode;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use reqwest::Method;
use serde_json::Value;
use tracing::{debug, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use backoffice_api::auth::{AuthTokenProvider, FileTokenStore};
use backoffice_api::{
    format_error_for_component, spawn_cleanup_task, ApiClient, Config, ErrorInput, RequestConfig,
};

#[derive(Debug, Parser)]
#[command(name = "backoffice_api", version, about = "Call the back-office API from the command line")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Send a request and print the JSON payload
    Request(RequestArgs),
    /// Persist an auth token for later requests
    Login {
        /// Bearer token issued by the API
        token: String,
    },
    /// Forget the persisted auth token
    Logout,
}

#[derive(Debug, Args)]
struct RequestArgs {
    /// HTTP method (GET, POST, PUT, PATCH, DELETE)
    method: String,
    /// Endpoint, relative to API_BASE_URL
    endpoint: String,
    /// JSON request body
    #[arg(short, long)]
    data: Option<String>,
    /// Cache lifetime for GET responses, in milliseconds
    #[arg(long)]
    cache_ttl_ms: Option<u64>,
    /// Request timeout, in milliseconds
    #[arg(long)]
    timeout_ms: Option<u64>,
    /// Extra transport option as key=JSON, e.g. params='{"page":2}'
    #[arg(short = 'o', long = "option")]
    options: Vec<String>,
    /// Send the request this many times (repeated GETs hit the cache)
    #[arg(long, default_value_t = 1)]
    repeat: u32,
}

#[tokio::main]
async fn main() -> ExitCode {
    // Defaults to "info" level, can be overridden with RUST_LOG env var
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "backoffice_api=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let config = Config::from_env();
    debug!("Configuration loaded: {:?}", config);

    match run(cli.command, &config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{}", format_error_for_component(&ErrorInput::from(&err)));
            ExitCode::FAILURE
        }
    }
}

async fn run(command: Command, config: &Config) -> Result<()> {
    match command {
        Command::Request(args) => request(args, config).await,
        Command::Login { token } => {
            let store = token_store(config)?;
            store
                .store(&token)
                .with_context(|| format!("Failed to write token to {}", store.path().display()))?;
            info!("Token stored at {}", store.path().display());
            Ok(())
        }
        Command::Logout => {
            token_store(config)?.clear();
            info!("Logged out");
            Ok(())
        }
    }
}

async fn request(args: RequestArgs, config: &Config) -> Result<()> {
    let method = Method::from_bytes(args.method.to_uppercase().as_bytes())
        .with_context(|| format!("Invalid HTTP method '{}'", args.method))?;
    let data = args
        .data
        .as_deref()
        .map(serde_json::from_str::<Value>)
        .transpose()
        .context("--data must be valid JSON")?;
    let request_config = request_config(&args)?;

    let client = ApiClient::from_config(config);
    let sweeper = (config.cleanup_interval > 0)
        .then(|| spawn_cleanup_task(client.cache(), config.cleanup_interval));

    let mut outcome = Ok(());
    for _ in 0..args.repeat.max(1) {
        match client
            .api_request::<Value>(method.clone(), &args.endpoint, data.clone(), request_config.clone())
            .await
        {
            Ok(payload) => println!("{}", serde_json::to_string_pretty(&payload)?),
            Err(err) => {
                outcome = Err(err.into());
                break;
            }
        }
    }

    let stats = client.cache_stats().await;
    info!(
        "Cache: hits={}, misses={}, entries={}, hit_rate={:.2}",
        stats.hits,
        stats.misses,
        stats.total_entries,
        stats.hit_rate()
    );

    if let Some(handle) = sweeper {
        handle.abort();
    }
    outcome
}

fn request_config(args: &RequestArgs) -> Result<RequestConfig> {
    let mut config = RequestConfig::new();
    if let Some(ms) = args.cache_ttl_ms {
        config = config.cache_ttl(Duration::from_millis(ms));
    }
    if let Some(ms) = args.timeout_ms {
        config = config.timeout(Duration::from_millis(ms));
    }
    for option in &args.options {
        let (key, raw) = option
            .split_once('=')
            .with_context(|| format!("Option '{}' must look like key=JSON", option))?;
        // Bare words are accepted as JSON strings
        let value = serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()));
        config = config.option(key, value);
    }
    Ok(config)
}

fn token_store(config: &Config) -> Result<FileTokenStore> {
    let path = config
        .auth_token_path
        .clone()
        .context("No data directory available, set AUTH_TOKEN_PATH")?;
    Ok(FileTokenStore::new(path))
}
