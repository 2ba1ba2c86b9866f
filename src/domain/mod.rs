pub mod models;
pub mod panels;
pub mod push_message;
pub mod response_shape;
pub mod telemetry_payload;
pub mod timestamp;
