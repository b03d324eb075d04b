pub mod api;
pub mod cli;
pub mod clients;
pub mod config;
pub mod db;
pub mod domain;
pub mod entities;
pub mod models;
pub mod services;
pub mod state;

use anyhow::Context;
use clap::Parser;
use tokio::signal;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use cli::{Cli, Commands};
pub use config::Config;
use models::ProductFilter;

pub async fn run(config: Config) -> anyhow::Result<()> {
    let cli = Cli::parse();
    let command = cli.command.unwrap_or(Commands::Serve { port: None });

    if matches!(command, Commands::Init) {
        if Config::create_default_if_missing()? {
            println!("✓ Config file created. Edit config.toml and run again.");
        } else {
            println!("config.toml already exists, leaving it untouched.");
        }
        return Ok(());
    }

    config.validate()?;
    init_logging(&config);

    match command {
        Commands::Serve { port } => {
            let prometheus_handle = if config.observability.metrics_enabled {
                use metrics_exporter_prometheus::PrometheusBuilder;
                let handle = PrometheusBuilder::new()
                    .install_recorder()
                    .context("Failed to install Prometheus recorder")?;
                info!("Prometheus metrics recorder initialized");
                Some(handle)
            } else {
                None
            };
            run_server(config, port, prometheus_handle).await
        }
        Commands::Models => cli::cmd_list_models(&config).await,
        Commands::Products {
            marketplace,
            category,
            limit,
        } => {
            let filter = ProductFilter {
                marketplace,
                category,
            };
            cli::cmd_list_products(&config, filter, limit).await
        }
        Commands::Init => Ok(()),
    }
}

fn init_logging(config: &Config) {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.effective_log_level()));

    let registry = tracing_subscriber::registry().with(env_filter);

    if config.observability.log_format.eq_ignore_ascii_case("json") {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}

async fn run_server(
    config: Config,
    port_override: Option<u16>,
    prometheus_handle: Option<metrics_exporter_prometheus::PrometheusHandle>,
) -> anyhow::Result<()> {
    info!(
        "{} v{} starting (api version {})",
        config.api.title,
        env!("CARGO_PKG_VERSION"),
        config.api.version
    );

    let host = config.server.host.clone();
    let port = port_override.unwrap_or(config.server.port);

    let state = api::create_app_state_from_config(config, prometheus_handle).await?;
    let app = api::router(state.clone());

    let listener = tokio::net::TcpListener::bind((host.as_str(), port))
        .await
        .with_context(|| format!("Failed to bind {host}:{port}"))?;

    info!("🌐 Web Server running at http://{}:{}", host, port);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Web server error")?;

    state.shared.shutdown().await?;
    info!("Server stopped");

    Ok(())
}

async fn shutdown_signal() {
    match signal::ctrl_c().await {
        Ok(()) => info!("Shutdown signal received"),
        Err(e) => error!("Error listening for shutdown: {}", e),
    }
}
