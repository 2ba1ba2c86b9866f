use actix_web::{HttpResponse, Responder, get, http::header, post, web};
use serde::Deserialize;
use tokio::sync::mpsc::UnboundedSender;

use crate::adapters::document::{Document, ElementId, SharedDocument};
use crate::app::controller::DashboardCommand;

#[derive(Clone)]
pub struct ViewState {
    pub document: SharedDocument,
    pub commands: UnboundedSender<DashboardCommand>,
}

#[derive(Debug, Deserialize)]
pub struct DeviceForm {
    pub device_id: Option<String>,
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(index)
        .service(document_snapshot)
        .service(refresh)
        .service(select_device)
        .service(health);
}

#[get("/health")]
async fn health() -> impl Responder {
    HttpResponse::Ok().json(serde_json::json!({ "status": "ok" }))
}

#[get("/")]
async fn index(state: web::Data<ViewState>) -> impl Responder {
    HttpResponse::Ok()
        .content_type("text/html; charset=utf-8")
        .body(render_page(&state.document.snapshot()))
}

#[get("/document")]
async fn document_snapshot(state: web::Data<ViewState>) -> impl Responder {
    HttpResponse::Ok().json(state.document.snapshot())
}

#[post("/refresh")]
async fn refresh(state: web::Data<ViewState>) -> impl Responder {
    dispatch(&state, DashboardCommand::Refresh)
}

#[post("/device")]
async fn select_device(state: web::Data<ViewState>, form: web::Form<DeviceForm>) -> impl Responder {
    let form = form.into_inner();
    dispatch(&state, DashboardCommand::SelectDevice(form.device_id))
}

fn dispatch(state: &ViewState, command: DashboardCommand) -> HttpResponse {
    if state.commands.send(command).is_err() {
        tracing::warn!("dashboard controller is no longer running");
        return HttpResponse::ServiceUnavailable().json(serde_json::json!({
            "error": "dashboard controller stopped"
        }));
    }

    HttpResponse::SeeOther()
        .insert_header((header::LOCATION, "/"))
        .finish()
}

fn render_page(document: &Document) -> String {
    let device = document.element(ElementId::DeviceInput).content.inner_html();

    format!(
        r#"<!doctype html>
<html lang="es">
<head><meta charset="utf-8"><title>Telemetría del dispositivo</title></head>
<body>
<header>{api}{ws}</header>
<form method="post" action="/device">
<input id="deviceId" name="device_id" type="number" min="0" value="{device}">
<button type="submit">Cambiar</button>
</form>
<form method="post" action="/refresh"><button id="refreshBtn" type="submit">Actualizar</button></form>
{status}
<section>{last_move}{last_obs}</section>
<section>{moves}{obs}</section>
</body>
</html>
"#,
        api = element(document, ElementId::ApiBadge, "span"),
        ws = element(document, ElementId::WsBadge, "span"),
        status = element(document, ElementId::Status, "p"),
        last_move = element(document, ElementId::LastMovement, "div"),
        last_obs = element(document, ElementId::LastObstacle, "div"),
        moves = element(document, ElementId::Movements, "div"),
        obs = element(document, ElementId::Obstacles, "div"),
    )
}

fn element(document: &Document, id: ElementId, tag: &str) -> String {
    let state = document.element(id);
    format!(
        r#"<{tag} id="{}" class="{}">{}</{tag}>"#,
        id.dom_id(),
        state.class_attr(),
        state.content.inner_html()
    )
}
