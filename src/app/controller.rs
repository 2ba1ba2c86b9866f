use std::sync::{Arc, Mutex, PoisonError};

use tokio::sync::mpsc::UnboundedReceiver;
use tokio::task::JoinHandle;
use url::Url;

use crate::adapters::push_channel::{self, PushEvent};
use crate::adapters::render_target::DashboardTargets;
use crate::adapters::telemetry_api::{MOVEMENTS_PATH, OBSTACLES_PATH, TelemetrySource};
use crate::domain::models::{ConnectionState, DeviceSelector};
use crate::domain::panels::{
    render_movement_detail, render_movement_list, render_obstacle_detail, render_obstacle_list,
};
use crate::domain::push_message::{PushDecision, PushFilter};
use crate::domain::telemetry_payload::{MovementRecord, ObstacleRecord};
use crate::domain::timestamp::PLACEHOLDER;

const STATUS_LOADING: &str = "Cargando…";
const STATUS_READY: &str = "Listo";
const EMPTY_CLASS: &str = "empty";
const CHIP_OK_CLASS: &str = "chip-ok";
const CHIP_ERROR_CLASS: &str = "chip-err";

/// Operator actions forwarded from an outer surface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DashboardCommand {
    Refresh,
    SelectDevice(Option<String>),
}

#[derive(Debug, Clone)]
pub struct DashboardSettings {
    pub api_base_url: String,
    pub record_limit: u32,
    pub timestamp_format: String,
    pub push_filter: PushFilter,
}

/// Fetches telemetry and renders it into the dashboard targets.
///
/// Clones share state. Load cycles are never deduplicated: two overlapping
/// cycles both render, and whichever finishes last wins.
pub struct DashboardController<S> {
    inner: Arc<Inner<S>>,
}

struct Inner<S> {
    source: S,
    settings: DashboardSettings,
    targets: DashboardTargets,
    device: Mutex<DeviceSelector>,
}

impl<S> Clone for DashboardController<S> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<S> DashboardController<S>
where
    S: TelemetrySource,
{
    pub fn new(
        source: S,
        settings: DashboardSettings,
        targets: DashboardTargets,
        device: DeviceSelector,
    ) -> Self {
        Self {
            inner: Arc::new(Inner {
                source,
                settings,
                targets,
                device: Mutex::new(device),
            }),
        }
    }

    pub fn device(&self) -> DeviceSelector {
        *self
            .inner
            .device
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// Startup sequence: health ping, push channel and the first load.
    pub fn start(&self, push_url: Url) {
        self.inner
            .targets
            .device_input
            .set_text(&self.device().to_string());

        let controller = self.clone();
        tokio::spawn(async move { controller.ping_health().await });

        let controller = self.clone();
        tokio::spawn(async move { controller.listen_for_pushes(push_url).await });

        self.spawn_refresh();
    }

    pub async fn ping_health(&self) {
        let badge = &self.inner.targets.api_badge;

        match self.inner.source.check_health().await {
            Ok(()) => {
                badge.remove_class(CHIP_ERROR_CLASS);
                badge.add_class(CHIP_OK_CLASS);
                badge.set_text(&format!("API OK: {}", self.inner.settings.api_base_url));
            }
            Err(error) => {
                tracing::warn!(error = %error, "API health check failed");
                badge.remove_class(CHIP_OK_CLASS);
                badge.add_class(CHIP_ERROR_CLASS);
                badge.set_text(&format!("API ERROR: {error}"));
            }
        }
    }

    /// One refresh cycle. Both lists are fetched concurrently and nothing is
    /// rendered unless both succeed.
    pub async fn load_data(&self, device: DeviceSelector) {
        let limit = self.inner.settings.record_limit;
        let source = &self.inner.source;
        self.set_status(STATUS_LOADING);

        let fetched = tokio::try_join!(
            source.fetch_records(MOVEMENTS_PATH, device, limit),
            source.fetch_records(OBSTACLES_PATH, device, limit),
        );

        match fetched {
            Ok((movement_rows, obstacle_rows)) => {
                let movements: Vec<MovementRecord> =
                    movement_rows.iter().map(MovementRecord::from_row).collect();
                let obstacles: Vec<ObstacleRecord> =
                    obstacle_rows.iter().map(ObstacleRecord::from_row).collect();

                self.render_last_movement(movements.first());
                self.render_last_obstacle(obstacles.first());
                self.render_movement_list(&movements);
                self.render_obstacle_list(&obstacles);
                self.set_status(STATUS_READY);

                tracing::info!(
                    device = device.id(),
                    movements = movements.len(),
                    obstacles = obstacles.len(),
                    "telemetry refreshed"
                );
            }
            Err(error) => {
                tracing::error!(device = device.id(), error = %error, "telemetry refresh failed");
                self.set_status(&format!("Error: {error}"));
            }
        }
    }

    pub async fn refresh(&self) {
        self.load_data(self.device()).await;
    }

    pub fn spawn_refresh(&self) -> JoinHandle<()> {
        let controller = self.clone();
        tokio::spawn(async move { controller.refresh().await })
    }

    /// Stores the coerced device id and starts a load for it.
    pub fn select_device(&self, input: Option<&str>) -> JoinHandle<()> {
        let device = DeviceSelector::from_input(input);
        *self
            .inner
            .device
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = device;
        self.inner.targets.device_input.set_text(&device.to_string());
        tracing::info!(device = device.id(), "device selected");

        self.spawn_refresh()
    }

    pub fn render_last_movement(&self, record: Option<&MovementRecord>) {
        let target = &self.inner.targets.last_movement;
        match record {
            None => {
                target.add_class(EMPTY_CLASS);
                target.set_text(PLACEHOLDER);
            }
            Some(record) => {
                target.remove_class(EMPTY_CLASS);
                target.set_html(&render_movement_detail(record, self.timestamp_format()));
            }
        }
    }

    pub fn render_last_obstacle(&self, record: Option<&ObstacleRecord>) {
        let target = &self.inner.targets.last_obstacle;
        match record {
            None => {
                target.add_class(EMPTY_CLASS);
                target.set_text(PLACEHOLDER);
            }
            Some(record) => {
                target.remove_class(EMPTY_CLASS);
                target.set_html(&render_obstacle_detail(record, self.timestamp_format()));
            }
        }
    }

    pub fn render_movement_list(&self, records: &[MovementRecord]) {
        self.inner
            .targets
            .movements
            .set_html(&render_movement_list(records, self.timestamp_format()));
    }

    pub fn render_obstacle_list(&self, records: &[ObstacleRecord]) {
        self.inner
            .targets
            .obstacles
            .set_html(&render_obstacle_list(records, self.timestamp_format()));
    }

    pub fn set_connection_state(&self, state: ConnectionState) {
        self.inner.targets.ws_badge.set_text(state.label());
    }

    /// Applies the push filter; a reload runs as its own task and is
    /// returned so callers can await it.
    pub fn handle_push_message(&self, message: &str) -> Option<JoinHandle<()>> {
        match self.inner.settings.push_filter.classify(message) {
            PushDecision::Reload => {
                tracing::debug!("push message triggered reload");
                Some(self.spawn_refresh())
            }
            PushDecision::Ignore => None,
        }
    }

    pub async fn listen_for_pushes(&self, url: Url) {
        let result = push_channel::listen(&url, |event| match event {
            PushEvent::State(state) => self.set_connection_state(state),
            PushEvent::Message(message) => {
                self.handle_push_message(&message);
            }
        })
        .await;

        if let Err(error) = result {
            tracing::warn!(url = %url, error = %error, "push channel stopped");
        }
    }

    /// Serves operator commands until every sender is dropped.
    pub async fn run_commands(&self, mut commands: UnboundedReceiver<DashboardCommand>) {
        while let Some(command) = commands.recv().await {
            match command {
                DashboardCommand::Refresh => {
                    self.spawn_refresh();
                }
                DashboardCommand::SelectDevice(input) => {
                    self.select_device(input.as_deref());
                }
            }
        }
    }

    fn set_status(&self, text: &str) {
        self.inner.targets.status.set_text(text);
    }

    fn timestamp_format(&self) -> &str {
        &self.inner.settings.timestamp_format
    }
}
