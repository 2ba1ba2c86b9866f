use serde_json::{Map, Value};

const MOVEMENT_DESCRIPTION_KEYS: &[&str] = &["mov_desc", "mov_clave", "id_mov"];
const OBSTACLE_DESCRIPTION_KEYS: &[&str] = &["obs_desc", "obs_clave", "id_obs"];

const ORIGIN_KEY: &str = "origen";
const RESULT_KEY: &str = "resultado";
const TIMESTAMP_KEY: &str = "ts";
const MODEL_KEY: &str = "clave_modelo";
const PARAMETERS_KEY: &str = "parametros_json";
const SPEED_KEY: &str = "velocidad";
const DISTANCE_KEY: &str = "distancia_cm";
const SIDE_KEY: &str = "lado";

/// One movement row as reported by `/api/movimientos`.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct MovementRecord {
    pub description: Option<String>,
    pub origin: Option<String>,
    pub result: Option<String>,
    pub speed: Option<f64>,
    pub timestamp: Option<String>,
    pub model_key: Option<String>,
}

/// One obstacle row as reported by `/api/obstaculos`.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ObstacleRecord {
    pub description: Option<String>,
    pub distance_cm: Option<String>,
    pub side: Option<String>,
    pub timestamp: Option<String>,
    pub model_key: Option<String>,
}

impl MovementRecord {
    pub fn from_row(row: &Value) -> Self {
        let object = row.as_object();

        Self {
            description: first_truthy(object, MOVEMENT_DESCRIPTION_KEYS),
            origin: display_field(object, ORIGIN_KEY),
            result: display_field(object, RESULT_KEY),
            speed: extract_speed(row),
            timestamp: display_field(object, TIMESTAMP_KEY),
            model_key: display_field(object, MODEL_KEY),
        }
    }
}

impl ObstacleRecord {
    pub fn from_row(row: &Value) -> Self {
        let object = row.as_object();

        Self {
            description: first_truthy(object, OBSTACLE_DESCRIPTION_KEYS),
            distance_cm: display_field(object, DISTANCE_KEY),
            side: display_field(object, SIDE_KEY),
            timestamp: display_field(object, TIMESTAMP_KEY),
            model_key: display_field(object, MODEL_KEY),
        }
    }
}

/// Reads `parametros_json.velocidad`, accepting the parameters either as an
/// object or as a JSON-encoded string. Malformed payloads yield `None`.
pub fn extract_speed(row: &Value) -> Option<f64> {
    let parameters = row.get(PARAMETERS_KEY).filter(|value| is_truthy(value))?;

    let decoded;
    let payload = match parameters {
        Value::String(text) => {
            decoded = serde_json::from_str::<Value>(text).ok()?;
            &decoded
        }
        Value::Object(_) | Value::Array(_) => parameters,
        _ => return None,
    };

    coerce_number(payload.get(SPEED_KEY)?)
}

pub fn format_number(value: f64) -> String {
    if value.is_infinite() {
        return if value > 0.0 { "Infinity" } else { "-Infinity" }.to_string();
    }
    if value == 0.0 {
        return "0".to_string();
    }

    value.to_string()
}

pub fn display_value(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        Value::Number(number) if number.is_f64() => {
            number.as_f64().map(format_number).unwrap_or_default()
        }
        other => other.to_string(),
    }
}

fn coerce_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(number) => number.as_f64(),
        Value::String(text) => parse_numeric_text(text),
        _ => None,
    }
}

fn parse_numeric_text(text: &str) -> Option<f64> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Some(0.0);
    }

    for (prefix, radix) in [("0x", 16), ("0X", 16), ("0o", 8), ("0O", 8), ("0b", 2), ("0B", 2)] {
        if let Some(digits) = trimmed.strip_prefix(prefix) {
            return u64::from_str_radix(digits, radix).ok().map(|v| v as f64);
        }
    }

    match trimmed {
        "Infinity" | "+Infinity" => return Some(f64::INFINITY),
        "-Infinity" => return Some(f64::NEG_INFINITY),
        _ => {}
    }

    trimmed
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
}

fn field<'a>(object: Option<&'a Map<String, Value>>, key: &str) -> Option<&'a Value> {
    object
        .and_then(|object| object.get(key))
        .filter(|value| !value.is_null())
}

fn display_field(object: Option<&Map<String, Value>>, key: &str) -> Option<String> {
    field(object, key).map(display_value)
}

fn first_truthy(object: Option<&Map<String, Value>>, keys: &[&str]) -> Option<String> {
    keys.iter()
        .filter_map(|key| field(object, key))
        .find(|value| is_truthy(value))
        .map(display_value)
}

pub(crate) fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(flag) => *flag,
        Value::Number(number) => number.as_f64().is_some_and(|v| v != 0.0 && !v.is_nan()),
        Value::String(text) => !text.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

#[cfg(test)]
mod tests {
    use super::{MovementRecord, ObstacleRecord, display_value, extract_speed, format_number};
    use serde_json::json;

    #[test]
    fn extracts_speed_from_object_parameters() {
        let row = json!({"parametros_json": {"velocidad": 12}});

        assert_eq!(extract_speed(&row), Some(12.0));
    }

    #[test]
    fn extracts_speed_from_encoded_parameters() {
        let row = json!({"parametros_json": "{\"velocidad\":\"12\"}"});

        assert_eq!(extract_speed(&row), Some(12.0));
    }

    #[test]
    fn speed_is_absent_without_usable_parameters() {
        assert_eq!(extract_speed(&json!({})), None);
        assert_eq!(extract_speed(&json!({"parametros_json": null})), None);
        assert_eq!(extract_speed(&json!({"parametros_json": ""})), None);
        assert_eq!(extract_speed(&json!({"parametros_json": "{not json"})), None);
        assert_eq!(extract_speed(&json!({"parametros_json": "null"})), None);
        assert_eq!(extract_speed(&json!({"parametros_json": 42})), None);
        assert_eq!(extract_speed(&json!({"parametros_json": [1, 2]})), None);
    }

    #[test]
    fn speed_is_absent_for_non_numeric_values() {
        assert_eq!(
            extract_speed(&json!({"parametros_json": {"velocidad": "rapido"}})),
            None
        );
        assert_eq!(
            extract_speed(&json!({"parametros_json": {"velocidad": true}})),
            None
        );
        assert_eq!(
            extract_speed(&json!({"parametros_json": {"velocidad": {"v": 1}}})),
            None
        );
        assert_eq!(
            extract_speed(&json!({"parametros_json": {"velocidad": "nan"}})),
            None
        );
    }

    #[test]
    fn coerces_loose_numeric_strings() {
        assert_eq!(
            extract_speed(&json!({"parametros_json": {"velocidad": " 7.5 "}})),
            Some(7.5)
        );
        assert_eq!(
            extract_speed(&json!({"parametros_json": {"velocidad": "0x10"}})),
            Some(16.0)
        );
        assert_eq!(
            extract_speed(&json!({"parametros_json": {"velocidad": ""}})),
            Some(0.0)
        );
    }

    #[test]
    fn movement_description_skips_falsy_candidates() {
        let row = json!({"mov_desc": "", "mov_clave": null, "id_mov": 15, "origen": "app"});

        let record = MovementRecord::from_row(&row);

        assert_eq!(record.description.as_deref(), Some("15"));
        assert_eq!(record.origin.as_deref(), Some("app"));
        assert_eq!(record.result, None);
    }

    #[test]
    fn movement_keeps_present_but_falsy_display_fields() {
        let row = json!({"mov_desc": "Adelante", "resultado": 0, "origen": ""});

        let record = MovementRecord::from_row(&row);

        assert_eq!(record.result.as_deref(), Some("0"));
        assert_eq!(record.origin.as_deref(), Some(""));
    }

    #[test]
    fn parses_obstacle_row() {
        let row = json!({
            "obs_clave": "OBS_FRONT",
            "distancia_cm": 23.0,
            "lado": "izquierda",
            "ts": "2024-01-05 10:30:00",
            "clave_modelo": "RC-1"
        });

        let record = ObstacleRecord::from_row(&row);

        assert_eq!(
            record,
            ObstacleRecord {
                description: Some("OBS_FRONT".to_string()),
                distance_cm: Some("23".to_string()),
                side: Some("izquierda".to_string()),
                timestamp: Some("2024-01-05 10:30:00".to_string()),
                model_key: Some("RC-1".to_string()),
            }
        );
    }

    #[test]
    fn non_object_rows_produce_empty_records() {
        assert_eq!(MovementRecord::from_row(&json!(5)), MovementRecord::default());
        assert_eq!(ObstacleRecord::from_row(&json!("x")), ObstacleRecord::default());
    }

    #[test]
    fn formats_numbers_without_trailing_zero() {
        assert_eq!(format_number(12.0), "12");
        assert_eq!(format_number(12.25), "12.25");
        assert_eq!(format_number(-0.0), "0");
        assert_eq!(display_value(&json!(true)), "true");
    }
}
