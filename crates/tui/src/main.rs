mod app;
mod format;

use anyhow::{Context, Result};
use std::fs::{self, OpenOptions};

use ecotrip_core::{config, AppConfig, Calculator, RouteTable};
use tracing_subscriber::{prelude::*, EnvFilter};

#[tokio::main]
async fn main() -> Result<()> {
    init_logging()?;

    config::ensure_default_config()?;
    let config = AppConfig::load().context("failed to load configuration")?;

    let routes = match &config.routes_file {
        Some(path) => RouteTable::from_json_file(path)
            .with_context(|| format!("failed to load routes from {}", path.display()))?,
        None => RouteTable::builtin(),
    };
    let calculator = Calculator::new(config.factors.clone(), config.carbon_credit);

    let mut app = app::EcotripApp::new(config, routes, calculator);
    app.run().await
}

fn init_logging() -> Result<()> {
    let log_dir = std::env::current_dir()?.join("logs");
    fs::create_dir_all(&log_dir)?;
    let log_path = log_dir.join("ecotrip.log");

    let env_filter = EnvFilter::from_default_env();

    let file_layer = tracing_subscriber::fmt::layer()
        .with_target(true)
        .compact()
        .with_writer(move || {
            OpenOptions::new()
                .create(true)
                .append(true)
                .open(&log_path)
                .expect("failed to open log file")
        });

    tracing_subscriber::registry()
        .with(env_filter)
        .with(file_layer)
        .init();

    Ok(())
}
