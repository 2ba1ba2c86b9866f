use std::fmt;

pub const DEFAULT_DEVICE_ID: u64 = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeviceSelector(pub u64);

impl DeviceSelector {
    /// Coerces operator input into a device id. Device ids are whole numbers,
    /// so `"3.0"` selects device 3 while `"2.5"` is not a valid id and, like
    /// blank, negative or non-numeric input, falls back to the default device.
    pub fn from_input(input: Option<&str>) -> Self {
        let Some(raw) = input.map(str::trim).filter(|value| !value.is_empty()) else {
            return Self::default();
        };

        if let Ok(id) = raw.parse::<u64>() {
            return Self(id);
        }

        match raw.parse::<f64>() {
            Ok(value) if value.is_finite() && value >= 0.0 && value.fract() == 0.0 => {
                Self(value as u64)
            }
            _ => Self::default(),
        }
    }

    pub fn id(self) -> u64 {
        self.0
    }
}

impl Default for DeviceSelector {
    fn default() -> Self {
        Self(DEFAULT_DEVICE_ID)
    }
}

impl fmt::Display for DeviceSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    Connected,
    Disconnected,
    Error,
}

impl ConnectionState {
    pub fn label(self) -> &'static str {
        match self {
            Self::Connected => "WS: conectado",
            Self::Disconnected => "WS: desconectado",
            Self::Error => "WS: error",
        }
    }
}
