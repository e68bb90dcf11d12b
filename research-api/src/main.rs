//! research-api - Read-only HTTP API over research results
//!
//! Serves runs and papers from the results database and files from the
//! export directory.

use anyhow::{Context, Result};
use clap::Parser;
use research_common::config::{ConfigOverrides, ServiceConfig, TomlConfig};
use research_api::{build_router, AppState};
use std::path::PathBuf;
use tokio::signal;
use tracing::{info, warn};

/// Command-line arguments for research-api
#[derive(Parser, Debug)]
#[command(name = "research-api")]
#[command(about = "Read-only HTTP API over research results")]
#[command(version)]
struct Args {
    /// TOML config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Folder that relative database/export paths are resolved against
    #[arg(long)]
    root_folder: Option<PathBuf>,

    /// SQLite results database
    #[arg(long)]
    database: Option<PathBuf>,

    /// Directory of export files
    #[arg(long)]
    exports: Option<PathBuf>,

    /// Address to bind
    #[arg(long)]
    host: Option<String>,

    /// Port to listen on
    #[arg(short, long)]
    port: Option<u16>,

    /// Log level used when RUST_LOG is not set
    #[arg(long)]
    log_level: Option<String>,
}

impl Args {
    fn into_overrides(self) -> ConfigOverrides {
        ConfigOverrides {
            root_folder: self.root_folder,
            database_path: self.database,
            exports_path: self.exports,
            host: self.host,
            port: self.port,
            config_file: self.config,
            log_level: self.log_level,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let overrides = args
        .into_overrides()
        .or(ConfigOverrides::from_env().context("Invalid environment configuration")?);

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| {
                    format!("{},tower_http=debug", overrides.log_level()).into()
                }),
        )
        .init();

    info!("Starting research-api v{}", env!("CARGO_PKG_VERSION"));

    let file = match overrides.config_file_path() {
        Some(path) => {
            let loaded = TomlConfig::load(&path).context("Failed to load config file")?;
            match loaded {
                Some(file) => {
                    info!("Loaded config file {}", path.display());
                    Some(file)
                }
                None => {
                    warn!("Config file {} not found, using defaults", path.display());
                    None
                }
            }
        }
        None => None,
    };

    let config = ServiceConfig::resolve(&overrides, file.as_ref());
    info!("Database path: {}", config.database_path.display());
    info!("Exports path: {}", config.exports_path.display());

    if !config.database_path.exists() {
        warn!("Database not found yet; run endpoints will answer 404 until it exists");
    }

    let app = build_router(AppState::from_config(&config));

    let addr = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;
    info!("research-api listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server shutdown complete");
    Ok(())
}

/// Resolves on Ctrl+C or SIGTERM
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                warn!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, shutting down");
        }
        _ = terminate => {
            info!("Received SIGTERM, shutting down");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_args_map_to_overrides() {
        let args = Args::parse_from([
            "research-api",
            "--port",
            "8081",
            "--exports",
            "/srv/exports",
            "--config",
            "research.toml",
        ]);
        let overrides = args.into_overrides();

        assert_eq!(overrides.port, Some(8081));
        assert_eq!(overrides.exports_path, Some(PathBuf::from("/srv/exports")));
        assert_eq!(overrides.config_file, Some(PathBuf::from("research.toml")));
        assert_eq!(overrides.host, None);
    }
}
