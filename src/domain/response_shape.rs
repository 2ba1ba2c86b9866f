use serde_json::Value;

use crate::domain::telemetry_payload::is_truthy;

/// The shapes the telemetry API is known to answer with.
#[derive(Debug, Clone, PartialEq)]
pub enum ResponseShape {
    /// A bare JSON array of rows.
    Bare(Vec<Value>),
    /// `{ "ok": true, "data": [...] }`; a missing `data` field means no rows.
    Envelope(Vec<Value>),
    /// Anything else, kept as received.
    Other(Value),
}

impl ResponseShape {
    pub fn classify(payload: Value) -> Self {
        match payload {
            Value::Array(rows) => Self::Bare(rows),
            Value::Object(mut object) if object.get("ok").is_some_and(is_truthy) => {
                match object.remove("data") {
                    None | Some(Value::Null) => Self::Envelope(Vec::new()),
                    Some(Value::Array(rows)) => Self::Envelope(rows),
                    Some(other) => {
                        object.insert("data".to_string(), other);
                        Self::Other(Value::Object(object))
                    }
                }
            }
            other => Self::Other(other),
        }
    }

    /// Collapses the shape into the row sequence rendered by the dashboard.
    /// Unrecognized payloads have no rows.
    pub fn into_rows(self) -> Vec<Value> {
        match self {
            Self::Bare(rows) | Self::Envelope(rows) => rows,
            Self::Other(payload) => {
                tracing::debug!(payload = %payload, "unrecognized response shape, treating as empty");
                Vec::new()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::ResponseShape;
    use serde_json::json;

    #[test]
    fn bare_array_rows_pass_through() {
        let rows = vec![json!({"id_mov": 1}), json!({"id_mov": 2})];

        let shape = ResponseShape::classify(json!(rows.clone()));

        assert_eq!(shape, ResponseShape::Bare(rows.clone()));
        assert_eq!(shape.into_rows(), rows);
    }

    #[test]
    fn envelope_rows_equal_data_field() {
        let rows = vec![json!({"id_obs": 9})];

        let shape = ResponseShape::classify(json!({"ok": true, "data": rows.clone()}));

        assert_eq!(shape.into_rows(), rows);
    }

    #[test]
    fn envelope_without_data_is_empty() {
        let shape = ResponseShape::classify(json!({"ok": true}));

        assert_eq!(shape, ResponseShape::Envelope(Vec::new()));
    }

    #[test]
    fn failed_envelope_falls_back_unmodified() {
        let payload = json!({"ok": false, "error": "db down"});

        let shape = ResponseShape::classify(payload.clone());

        assert_eq!(shape, ResponseShape::Other(payload));
        assert!(shape.into_rows().is_empty());
    }

    #[test]
    fn envelope_with_non_array_data_is_kept_as_other() {
        let payload = json!({"ok": 1, "data": {"id_mov": 1}});

        let shape = ResponseShape::classify(payload.clone());

        assert_eq!(shape, ResponseShape::Other(payload));
    }
}
