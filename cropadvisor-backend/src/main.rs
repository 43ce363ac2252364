//! Crop Advisor server
//!
//! Entry point: configuration loading, tracing, state assembly and HTTP
//! server startup.

use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use tokio::net::TcpListener;

use cropadvisor_backend::config_helpers::parse_bind_address;
use cropadvisor_backend::state::{AppState, StartupError};
use cropadvisor_backend::{build_maintenance_router, build_router_with_timeout};

mod cli;
mod tracing_setup;

use cli::CliArgs;
use tracing_setup::install_tracing_from_config;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = CliArgs::parse();

    if args.help_requested {
        CliArgs::print_help();
        return Ok(());
    }

    // Resolve config path: CLI > environment variable
    let config_path = args
        .config_path
        .or_else(|| std::env::var("CROPADVISOR_CONFIG_PATH").ok());

    eprintln!("[STARTUP] Loading config from: {:?}", config_path);
    let config = load_config(config_path.as_deref())?;

    install_tracing_from_config(&config.logging);

    tracing::info!(
        users_file = %config.storage.users_file,
        password_scheme = %config.storage.password_scheme,
        model = %config.model.path,
        translation = config.translation.enabled,
        "configuration loaded"
    );

    let app = match AppState::from_config(&config) {
        Ok(state) => {
            let timeout = Duration::from_secs(config.server.request_timeout_secs);
            build_router_with_timeout(Arc::new(state), timeout)
        }
        Err(StartupError::Model(e)) => {
            tracing::error!(error = %e, "entering maintenance mode");
            build_maintenance_router(&e.to_string())
        }
        Err(e) => return Err(e.into()),
    };

    serve(app, &config.server.host, config.server.port).await
}

/// Load configuration from file or defaults.
fn load_config(path: Option<&str>) -> anyhow::Result<cropadvisor_config::Config> {
    cropadvisor_config::load_config(path).map_err(|e| {
        eprintln!("failed to load configuration: {e}");
        anyhow::anyhow!(e.to_string())
    })
}

async fn serve(app: Router, host: &str, port: u16) -> anyhow::Result<()> {
    let addr = parse_bind_address(host, port);
    let listener = TcpListener::bind(addr).await?;
    tracing::info!(%addr, "listening");

    axum::serve(listener, app.into_make_service()).await?;
    Ok(())
}
