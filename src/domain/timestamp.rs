use std::fmt::Write;

use chrono::{DateTime, Local, NaiveDate, NaiveDateTime, TimeZone};

pub const PLACEHOLDER: &str = "—";
pub const DEFAULT_DISPLAY_FORMAT: &str = "%d/%m/%Y, %H:%M:%S";

const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
];

/// Renders an API timestamp (`YYYY-MM-DD HH:MM:SS`) for display. Absent or
/// empty input renders as the placeholder; input that cannot be parsed or
/// rendered with `display_format` is returned unchanged.
pub fn format_timestamp(raw: Option<&str>, display_format: &str) -> String {
    let Some(raw) = raw.filter(|value| !value.is_empty()) else {
        return PLACEHOLDER.to_string();
    };

    parse_timestamp(raw)
        .and_then(|datetime| render(datetime, display_format))
        .unwrap_or_else(|| raw.to_string())
}

// Rendered in local time so offset items (`%z`, `%Z`) have an offset to print.
fn render(datetime: NaiveDateTime, display_format: &str) -> Option<String> {
    let mut rendered = String::new();
    let written = match Local.from_local_datetime(&datetime).earliest() {
        Some(local) => write!(rendered, "{}", local.format(display_format)),
        None => write!(rendered, "{}", datetime.format(display_format)),
    };

    written.ok().map(|()| rendered)
}

fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    let candidate = raw.trim().replacen(' ', "T", 1);

    if let Ok(datetime) = DateTime::parse_from_rfc3339(&candidate) {
        return Some(datetime.with_timezone(&Local).naive_local());
    }

    if let Some(naive) = NAIVE_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(&candidate, format).ok())
    {
        return Some(naive);
    }

    // Date-only values are midnight UTC.
    NaiveDate::parse_from_str(&candidate, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|midnight| midnight.and_utc().with_timezone(&Local).naive_local())
}
