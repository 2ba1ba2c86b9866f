pub mod document;
pub mod log_surface;
pub mod push_channel;
pub mod render_target;
pub mod telemetry_api;
pub mod view;
