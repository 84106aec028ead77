//! Help Ireland server binary.
//!
//! # Startup Sequence
//!
//! 1. Load configuration from `help-ireland.yaml` (or `HELP_IRELAND_CONFIG`)
//! 2. Initialize structured logging (tracing)
//! 3. Build the image judge backend
//! 4. Open the profile store (Dragonfly or in-memory)
//! 5. Open the session and seed the community if empty
//! 6. Serve the API until `Ctrl-C`

mod error;

use std::path::PathBuf;
use std::sync::Arc;

use shamrock_core::{App, AppConfig, LoggingConfig, open_store};
use shamrock_server::{AppState, Server};
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::error::StartupError;

/// Config file read when `HELP_IRELAND_CONFIG` is unset.
const DEFAULT_CONFIG_PATH: &str = "help-ireland.yaml";

#[tokio::main]
async fn main() -> Result<(), StartupError> {
    // 1. Load configuration.
    let (config, loaded_from) = load_config()?;

    // 2. Initialize structured logging.
    init_tracing(&config.logging);
    info!(
        config = loaded_from.as_deref().unwrap_or("defaults"),
        host = %config.server.host,
        port = config.server.port,
        "help-ireland starting"
    );

    // 3. Build the image judge.
    let judge = shamrock_verify::create_backend(&config.verification.judge)?;

    // 4. Open the store.
    let store = open_store(&config.store).await?;

    // 5. Open the session.
    let app = Arc::new(App::open(&config, store, judge).await?);
    let state = Arc::new(AppState::new(app));

    // 6. Serve.
    let server = Server::bind(&config.server, state).await?;
    info!(addr = %server.local_addr(), "help-ireland ready");
    server.serve().await?;
    Ok(())
}

fn init_tracing(logging: &LoggingConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&logging.level));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true);
    if logging.json {
        builder.json().init();
    } else {
        builder.init();
    }
}

/// Load the config file if present, otherwise defaults. Environment
/// overrides apply either way.
fn load_config() -> Result<(AppConfig, Option<String>), StartupError> {
    let path = std::env::var("HELP_IRELAND_CONFIG")
        .map_or_else(|_| PathBuf::from(DEFAULT_CONFIG_PATH), PathBuf::from);
    if path.exists() {
        let config = AppConfig::from_file(&path)?;
        Ok((config, Some(path.display().to_string())))
    } else {
        let mut config = AppConfig::default();
        config.apply_env_overrides()?;
        Ok((config, None))
    }
}
