mod config;
pub mod controller;
mod error;
mod logging;
mod runtime;

pub use config::AppConfig;
pub use error::AppError;

/// Starts the dashboard with its operator view.
pub fn run() -> Result<(), AppError> {
    let config = bootstrap()?;
    runtime::run_view(config)
}

/// Starts the dashboard headless, rendering element updates to the log.
pub fn run_watch() -> Result<(), AppError> {
    let config = bootstrap()?;
    runtime::run_watch(config)
}

fn bootstrap() -> Result<AppConfig, AppError> {
    logging::init()?;
    crate::adapters::push_channel::install_tls_provider();

    let config = AppConfig::from_env()?;

    tracing::info!(
        api_base_url = %config.api_base_url,
        push_url = %config.push_url,
        device = config.device.id(),
        record_limit = config.record_limit,
        push_filter = ?config.push_filter,
        view_bind = %config.view_bind,
        "application bootstrap initialized"
    );

    Ok(config)
}
