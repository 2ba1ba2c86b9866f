use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use actix_web::dev::ServerHandle;
use actix_web::{App, HttpServer, web};
use async_trait::async_trait;
use serde_json::Value;

use crate::adapters::document::SharedDocument;
use crate::adapters::telemetry_api::{RequestError, TelemetrySource};
use crate::app::controller::{DashboardController, DashboardSettings};
use crate::domain::models::DeviceSelector;
use crate::domain::push_message::PushFilter;
use crate::domain::timestamp::DEFAULT_DISPLAY_FORMAT;

pub const TEST_API_BASE: &str = "http://telemetry.test";

#[derive(Debug, Clone)]
pub enum ScriptedResponse {
    Rows(Vec<Value>),
    Status(u16, &'static str),
}

#[derive(Debug, Default)]
struct Script {
    health: Option<ScriptedResponse>,
    responses: HashMap<String, ScriptedResponse>,
    requests: Vec<(String, u64, u32)>,
}

/// In-memory `TelemetrySource`: unscripted resources answer with no rows.
#[derive(Debug, Clone, Default)]
pub struct ScriptedSource {
    script: Arc<Mutex<Script>>,
}

impl ScriptedSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(self, path: &str, response: ScriptedResponse) -> Self {
        self.set(path, response);
        self
    }

    pub fn with_health(self, response: ScriptedResponse) -> Self {
        self.script.lock().expect("script lock").health = Some(response);
        self
    }

    pub fn set(&self, path: &str, response: ScriptedResponse) {
        self.script
            .lock()
            .expect("script lock")
            .responses
            .insert(path.to_string(), response);
    }

    pub fn requests(&self) -> Vec<(String, u64, u32)> {
        self.script.lock().expect("script lock").requests.clone()
    }

    pub fn fetch_count(&self, path: &str) -> usize {
        self.requests()
            .iter()
            .filter(|(requested, _, _)| requested == path)
            .count()
    }
}

#[async_trait]
impl TelemetrySource for ScriptedSource {
    async fn check_health(&self) -> Result<(), RequestError> {
        let health = self.script.lock().expect("script lock").health.clone();
        match health {
            Some(ScriptedResponse::Status(code, _)) => Err(RequestError::HealthStatus(code)),
            _ => Ok(()),
        }
    }

    async fn fetch_records(
        &self,
        resource_path: &str,
        device: DeviceSelector,
        limit: u32,
    ) -> Result<Vec<Value>, RequestError> {
        let mut script = self.script.lock().expect("script lock");
        script
            .requests
            .push((resource_path.to_string(), device.id(), limit));

        match script.responses.get(resource_path) {
            Some(ScriptedResponse::Rows(rows)) => Ok(rows.clone()),
            Some(ScriptedResponse::Status(code, reason)) => Err(RequestError::Status {
                code: *code,
                reason: reason.to_string(),
            }),
            None => Ok(Vec::new()),
        }
    }
}

pub fn build_controller(
    source: ScriptedSource,
    push_filter: PushFilter,
) -> (DashboardController<ScriptedSource>, SharedDocument) {
    let document = SharedDocument::new();
    let controller = DashboardController::new(
        source,
        DashboardSettings {
            api_base_url: TEST_API_BASE.to_string(),
            record_limit: 10,
            timestamp_format: DEFAULT_DISPLAY_FORMAT.to_string(),
            push_filter,
        },
        document.targets(),
        DeviceSelector::default(),
    );
    (controller, document)
}

pub struct TestBackend {
    pub base_url: String,
    handle: ServerHandle,
}

impl TestBackend {
    pub async fn stop(self) {
        self.handle.stop(false).await;
    }
}

/// Serves `configure` on a loopback port, standing in for the telemetry API.
/// Must be called from inside an actix runtime.
pub fn spawn_backend<F>(configure: F) -> TestBackend
where
    F: Fn(&mut web::ServiceConfig) + Send + Clone + 'static,
{
    let server = HttpServer::new(move || App::new().configure(configure.clone()))
        .workers(1)
        .disable_signals()
        .bind(("127.0.0.1", 0))
        .expect("test backend should bind");
    let port = server
        .addrs()
        .first()
        .expect("test backend should expose an address")
        .port();
    let server = server.run();
    let handle = server.handle();
    actix_web::rt::spawn(server);

    TestBackend {
        base_url: format!("http://127.0.0.1:{port}"),
        handle,
    }
}
