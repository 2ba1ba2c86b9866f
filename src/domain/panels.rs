use crate::domain::telemetry_payload::{MovementRecord, ObstacleRecord, format_number};
use crate::domain::timestamp::{PLACEHOLDER, format_timestamp};

pub const NO_DATA_BLOCK: &str = r#"<div class="card empty">Sin datos</div>"#;

pub fn render_movement_detail(record: &MovementRecord, timestamp_format: &str) -> String {
    let speed = speed_text(record.speed);

    [
        labeled_row("Movimiento", Some("value"), or_placeholder(&record.description)),
        labeled_row("Origen", None, or_placeholder(&record.origin)),
        labeled_row("Resultado", None, or_placeholder(&record.result)),
        labeled_row("Velocidad", None, &speed),
        labeled_row(
            "Fecha",
            None,
            &format_timestamp(record.timestamp.as_deref(), timestamp_format),
        ),
    ]
    .concat()
}

pub fn render_obstacle_detail(record: &ObstacleRecord, timestamp_format: &str) -> String {
    let distance = format!("{} cm", or_placeholder(&record.distance_cm));

    [
        labeled_row("Obstáculo", Some("value"), or_placeholder(&record.description)),
        labeled_row("Distancia", None, &distance),
        labeled_row("Lado", None, or_placeholder(&record.side)),
        labeled_row(
            "Fecha",
            None,
            &format_timestamp(record.timestamp.as_deref(), timestamp_format),
        ),
    ]
    .concat()
}

/// One summary item per record, in the order received.
pub fn render_movement_list(records: &[MovementRecord], timestamp_format: &str) -> String {
    if records.is_empty() {
        return NO_DATA_BLOCK.to_string();
    }

    records
        .iter()
        .map(|record| {
            summary_item(&[
                format_timestamp(record.timestamp.as_deref(), timestamp_format),
                or_placeholder(&record.description).to_string(),
                format!(
                    "Origen: {} • Res: {}",
                    or_placeholder(&record.origin),
                    or_placeholder(&record.result)
                ),
                format!(
                    "Modelo: {} • Vel: {}",
                    or_placeholder(&record.model_key),
                    speed_text(record.speed)
                ),
            ])
        })
        .collect()
}

pub fn render_obstacle_list(records: &[ObstacleRecord], timestamp_format: &str) -> String {
    if records.is_empty() {
        return NO_DATA_BLOCK.to_string();
    }

    records
        .iter()
        .map(|record| {
            summary_item(&[
                format_timestamp(record.timestamp.as_deref(), timestamp_format),
                or_placeholder(&record.description).to_string(),
                format!(
                    "Dist: {} cm • Lado: {}",
                    or_placeholder(&record.distance_cm),
                    or_placeholder(&record.side)
                ),
                format!("Modelo: {}", or_placeholder(&record.model_key)),
            ])
        })
        .collect()
}

pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for char in text.chars() {
        match char {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            other => escaped.push(other),
        }
    }
    escaped
}

fn labeled_row(label: &str, value_class: Option<&str>, value: &str) -> String {
    let open = match value_class {
        Some(class) => format!(r#"<span class="{class}">"#),
        None => "<span>".to_string(),
    };
    format!(
        r#"<div class="row"><span class="key">{label}</span>{open}{}</span></div>"#,
        escape_html(value)
    )
}

fn summary_item(lines: &[String]) -> String {
    let body: String = lines
        .iter()
        .map(|line| format!("<div>{}</div>", escape_html(line)))
        .collect();
    format!(r#"<div class="item">{body}</div>"#)
}

fn or_placeholder(value: &Option<String>) -> &str {
    value.as_deref().unwrap_or(PLACEHOLDER)
}

fn speed_text(speed: Option<f64>) -> String {
    speed.map_or_else(|| PLACEHOLDER.to_string(), format_number)
}
