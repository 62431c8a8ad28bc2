use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use updater_core::project::ProjectFormController;
use updater_core::session::AuthSession;
use updater_infrastructure::{ConfigService, HttpBackend};

mod commands;
mod helper;
mod render;
mod repl;
mod screens;

use repl::Repl;
use screens::{ScreenNavigator, TerminalConfirmation};

#[derive(Parser)]
#[command(name = "project-updater")]
#[command(about = "Portfolio Updater - add projects to the remote catalog", long_about = None)]
struct Cli {
    /// Path to config.toml (defaults to the platform config directory)
    #[arg(long)]
    config: Option<PathBuf>,

    /// API base URL, overriding config and environment
    #[arg(long)]
    base_url: Option<String>,

    /// Log filter directives, e.g. `info` or `updater_core=debug`
    #[arg(long)]
    log_level: Option<String>,
}

/// Used when neither `--log-level` nor `RUST_LOG` is given.
const DEFAULT_LOG_FILTER: &str =
    "warn,updater_core=info,updater_infrastructure=info,project_updater=info";

fn log_filter(directives: Option<&str>) -> EnvFilter {
    match directives {
        Some(directives) => EnvFilter::new(directives),
        None => EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER)),
    }
}

fn init_tracing(directives: Option<&str>) {
    let filter = log_filter(directives);

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.log_level.as_deref());

    let config_service = match cli.config {
        Some(path) => ConfigService::with_path(path),
        None => ConfigService::new()?,
    };
    let mut config = config_service
        .load()
        .with_context(|| format!("Failed to load {}", config_service.path().display()))?;
    if let Some(base_url) = cli.base_url {
        config.api.base_url = base_url;
    }

    let backend = Arc::new(HttpBackend::from_config(&config)?);
    info!(base_url = %backend.base_url(), "Backend configured");

    let navigator = Arc::new(ScreenNavigator::new());
    let session = Arc::new(AuthSession::new(backend.clone(), navigator.clone()));
    let controller = ProjectFormController::new(
        session.clone(),
        backend.clone(),
        Arc::new(backend.token_source()),
        Arc::new(TerminalConfirmation),
        config.form.clone(),
    );

    Repl::new(session, controller, navigator).run().await
}
