use std::sync::Arc;

use crate::adapters::render_target::{DashboardTargets, RenderTarget};

/// Headless rendering surface: element updates become log events.
#[derive(Debug, Clone, Copy)]
pub struct LogElement {
    name: &'static str,
}

impl LogElement {
    pub fn new(name: &'static str) -> Self {
        Self { name }
    }
}

impl RenderTarget for LogElement {
    fn set_text(&self, text: &str) {
        tracing::info!(element = self.name, text, "element updated");
    }

    fn set_html(&self, html: &str) {
        tracing::info!(element = self.name, text = %visible_text(html), "element updated");
    }

    fn add_class(&self, class: &str) {
        tracing::debug!(element = self.name, class, "class added");
    }

    fn remove_class(&self, class: &str) {
        tracing::debug!(element = self.name, class, "class removed");
    }
}

pub fn targets() -> DashboardTargets {
    DashboardTargets {
        api_badge: Arc::new(LogElement::new("api_badge")),
        ws_badge: Arc::new(LogElement::new("ws_badge")),
        device_input: Arc::new(LogElement::new("device")),
        status: Arc::new(LogElement::new("status")),
        last_movement: Arc::new(LogElement::new("last_movement")),
        last_obstacle: Arc::new(LogElement::new("last_obstacle")),
        movements: Arc::new(LogElement::new("movements")),
        obstacles: Arc::new(LogElement::new("obstacles")),
    }
}

/// Strips tags from rendered markup, joining text runs with ` | `.
fn visible_text(html: &str) -> String {
    let mut runs = Vec::new();
    let mut current = String::new();
    let mut in_tag = false;

    for char in html.chars() {
        match char {
            '<' => {
                in_tag = true;
                push_run(&mut runs, &mut current);
            }
            '>' => in_tag = false,
            other if !in_tag => current.push(other),
            _ => {}
        }
    }
    push_run(&mut runs, &mut current);

    unescape(&runs.join(" | "))
}

fn push_run(runs: &mut Vec<String>, current: &mut String) {
    let run = std::mem::take(current);
    let trimmed = run.trim();
    if !trimmed.is_empty() {
        runs.push(trimmed.to_string());
    }
}

fn unescape(text: &str) -> String {
    text.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&amp;", "&")
}
