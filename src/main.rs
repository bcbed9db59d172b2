use std::env;

use dotenvy::dotenv;
use payroll_engine::api::{AppState, create_router};
use payroll_engine::calculation::validate_catalog;
use payroll_engine::config::ConfigLoader;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

const DEFAULT_ADDR: &str = "0.0.0.0:3000";
const DEFAULT_CONFIG_DIR: &str = "./config/standard";

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let config_dir = env::var("PAYROLL_CONFIG_DIR").unwrap_or_else(|_| DEFAULT_CONFIG_DIR.into());
    let addr = env::var("PAYROLL_ADDR").unwrap_or_else(|_| DEFAULT_ADDR.into());

    let config = ConfigLoader::load(&config_dir)?;
    info!(
        config_dir = %config_dir,
        name = %config.metadata().name,
        version = %config.metadata().version,
        components = config.components().len(),
        structures = config.structures().len(),
        "Payroll configuration loaded"
    );

    // Lenient evaluation still serves a catalog that fails strict checks
    if let Err(err) = validate_catalog(config.config()) {
        warn!(error = %err, "Component catalog failed validation");
    }

    let router = create_router(AppState::new(config));
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!(addr = %addr, "Payroll engine listening");

    axum::serve(listener, router).await?;
    Ok(())
}
