use std::sync::Arc;

/// A writable element of the dashboard's rendering surface.
pub trait RenderTarget: Send + Sync {
    fn set_text(&self, text: &str);
    fn set_html(&self, html: &str);
    fn add_class(&self, class: &str);
    fn remove_class(&self, class: &str);
}

pub type TargetHandle = Arc<dyn RenderTarget>;

/// The handles the controller writes to. Built once at startup by whichever
/// surface hosts the dashboard.
#[derive(Clone)]
pub struct DashboardTargets {
    pub api_badge: TargetHandle,
    pub ws_badge: TargetHandle,
    pub device_input: TargetHandle,
    pub status: TargetHandle,
    pub last_movement: TargetHandle,
    pub last_obstacle: TargetHandle,
    pub movements: TargetHandle,
    pub obstacles: TargetHandle,
}
