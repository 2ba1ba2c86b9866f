use actix_cors::Cors;
use actix_web::{App, HttpServer, web};
use tokio::sync::mpsc;

use crate::adapters::document::SharedDocument;
use crate::adapters::log_surface;
use crate::adapters::render_target::DashboardTargets;
use crate::adapters::telemetry_api::HttpTelemetryClient;
use crate::adapters::view::{ViewState, configure_routes};
use crate::app::config::AppConfig;
use crate::app::controller::{DashboardController, DashboardSettings};
use crate::app::error::AppError;

/// Runs the controller against an in-memory document served by the operator
/// view. Controller work stays on the system thread; view workers only read
/// snapshots and forward commands.
pub fn run_view(config: AppConfig) -> Result<(), AppError> {
    actix_web::rt::System::new().block_on(async move {
        let document = SharedDocument::new();
        let controller = build_controller(&config, document.targets())?;
        let (commands, receiver) = mpsc::unbounded_channel();

        controller.start(config.push_url.clone());
        let command_loop = controller.clone();
        tokio::spawn(async move { command_loop.run_commands(receiver).await });

        let view_state = ViewState { document, commands };

        tracing::info!(bind = %config.view_bind, "operator view starting");

        HttpServer::new(move || {
            App::new()
                .wrap(Cors::permissive())
                .app_data(web::Data::new(view_state.clone()))
                .configure(configure_routes)
        })
        .bind(&config.view_bind)
        .map_err(AppError::runtime)?
        .run()
        .await
        .map_err(AppError::runtime)
    })
}

/// Runs the controller headless, logging every element update, until Ctrl-C.
pub fn run_watch(config: AppConfig) -> Result<(), AppError> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(AppError::runtime)?;

    runtime.block_on(async move {
        let controller = build_controller(&config, log_surface::targets())?;
        controller.start(config.push_url.clone());

        tokio::signal::ctrl_c().await.map_err(AppError::runtime)?;
        tracing::info!("shutdown requested");
        Ok(())
    })
}

fn build_controller(
    config: &AppConfig,
    targets: DashboardTargets,
) -> Result<DashboardController<HttpTelemetryClient>, AppError> {
    let source =
        HttpTelemetryClient::new(config.api_base_url.as_str()).map_err(AppError::runtime)?;
    let settings = DashboardSettings {
        api_base_url: config.api_base_display(),
        record_limit: config.record_limit,
        timestamp_format: config.timestamp_format.clone(),
        push_filter: config.push_filter,
    };

    Ok(DashboardController::new(
        source,
        settings,
        targets,
        config.device,
    ))
}
