use std::str::FromStr;

use serde_json::Value;

const MOVEMENT_TYPE: &str = "movimiento";
const OBSTACLE_TYPE: &str = "obstaculo";
const TOLERANT_MARKERS: &[&str] = &["mov", "obst"];

/// Decides which push notifications trigger a data reload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PushFilter {
    /// Reload on malformed messages, untyped messages and any `type`
    /// containing `mov` or `obst` (case-insensitive).
    #[default]
    Tolerant,
    /// Reload only on `type` equal to `movimiento` or `obstaculo`.
    Exact,
}

impl FromStr for PushFilter {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "tolerant" => Ok(Self::Tolerant),
            "exact" => Ok(Self::Exact),
            other => Err(format!("unknown push filter `{other}`")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PushDecision {
    Reload,
    Ignore,
}

impl PushFilter {
    pub fn classify(self, message: &str) -> PushDecision {
        let parsed = match serde_json::from_str::<Value>(message) {
            Ok(value) => value,
            Err(error) => {
                tracing::debug!(error = %error, "push message is not JSON");
                return match self {
                    Self::Tolerant => PushDecision::Reload,
                    Self::Exact => PushDecision::Ignore,
                };
            }
        };

        let message_type = parsed.get("type").filter(|value| !value.is_null());

        let reload = match self {
            Self::Tolerant => match message_type {
                None => true,
                Some(value) => {
                    let text = match value {
                        Value::String(text) => text.to_lowercase(),
                        other => other.to_string().to_lowercase(),
                    };
                    TOLERANT_MARKERS.iter().any(|marker| text.contains(marker))
                }
            },
            Self::Exact => message_type
                .and_then(Value::as_str)
                .is_some_and(|text| text == MOVEMENT_TYPE || text == OBSTACLE_TYPE),
        };

        if reload {
            PushDecision::Reload
        } else {
            PushDecision::Ignore
        }
    }
}
