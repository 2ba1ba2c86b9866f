use std::collections::HashMap;
use std::path::Path;

use chrono::format::{Item, StrftimeItems};
use url::Url;

use crate::adapters::push_channel::derive_push_url;
use crate::app::AppError;
use crate::domain::models::DeviceSelector;
use crate::domain::push_message::PushFilter;
use crate::domain::timestamp::DEFAULT_DISPLAY_FORMAT;

const DEFAULT_API_BASE_URL: &str = "http://localhost:5500";
const DEFAULT_VIEW_BIND: &str = "127.0.0.1:8080";
const DEFAULT_RECORD_LIMIT: u32 = 10;
const ENV_FILE_KEY: &str = "DASHBOARD_ENV_FILE";

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub api_base_url: Url,
    pub push_url: Url,
    pub device: DeviceSelector,
    pub record_limit: u32,
    pub push_filter: PushFilter,
    pub view_bind: String,
    pub timestamp_format: String,
}

impl AppConfig {
    /// Reads the process environment, falling back to values from the file
    /// named by `DASHBOARD_ENV_FILE` or, when unset, a `.env` file if present.
    pub fn from_env() -> Result<Self, AppError> {
        let file_values = match std::env::var(ENV_FILE_KEY).ok() {
            Some(path) => read_env_file(Path::new(&path))?,
            None => match dotenvy::dotenv_iter() {
                Ok(iter) => collect_env_file(iter)?,
                Err(_) => HashMap::new(),
            },
        };

        Self::from_lookup(|key| {
            std::env::var(key)
                .ok()
                .or_else(|| file_values.get(key).cloned())
        })
    }

    pub(crate) fn from_lookup<F>(lookup: F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_base_url = lookup_trimmed(&lookup, "API_BASE_URL")
            .unwrap_or_else(|| DEFAULT_API_BASE_URL.to_string());
        let api_base_url = Url::parse(&api_base_url)
            .map_err(|error| AppError::config(format!("API_BASE_URL is invalid: {error}")))?;

        let push_url = match lookup_trimmed(&lookup, "PUSH_URL") {
            Some(raw) => Url::parse(&raw)
                .map_err(|error| AppError::config(format!("PUSH_URL is invalid: {error}")))?,
            None => derive_push_url(&api_base_url)
                .map_err(|error| AppError::config(format!("API_BASE_URL: {error}")))?,
        };

        let record_limit = parse_or_default(&lookup, "RECORD_LIMIT", DEFAULT_RECORD_LIMIT)?;
        if record_limit == 0 {
            return Err(AppError::config("RECORD_LIMIT must be at least 1"));
        }

        let push_filter = match lookup_trimmed(&lookup, "PUSH_FILTER") {
            Some(raw) => raw
                .parse::<PushFilter>()
                .map_err(|error| AppError::config(format!("PUSH_FILTER: {error}")))?,
            None => PushFilter::default(),
        };

        let timestamp_format = lookup("TIMESTAMP_FORMAT")
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_DISPLAY_FORMAT.to_string());
        if StrftimeItems::new(&timestamp_format).any(|item| matches!(item, Item::Error)) {
            return Err(AppError::config(
                "TIMESTAMP_FORMAT must be a valid strftime pattern",
            ));
        }

        Ok(Self {
            api_base_url,
            push_url,
            device: DeviceSelector::from_input(lookup("DEVICE_ID").as_deref()),
            record_limit,
            push_filter,
            view_bind: lookup_trimmed(&lookup, "VIEW_BIND")
                .unwrap_or_else(|| DEFAULT_VIEW_BIND.to_string()),
            timestamp_format,
        })
    }

    /// The base address as shown to the operator, without a trailing slash.
    pub fn api_base_display(&self) -> String {
        self.api_base_url.as_str().trim_end_matches('/').to_string()
    }
}

fn read_env_file(path: &Path) -> Result<HashMap<String, String>, AppError> {
    let iter = dotenvy::from_path_iter(path).map_err(|error| {
        AppError::config(format!("cannot read env file {}: {error}", path.display()))
    })?;
    collect_env_file(iter)
}

fn collect_env_file<R: std::io::Read>(
    iter: dotenvy::Iter<R>,
) -> Result<HashMap<String, String>, AppError> {
    iter.collect::<Result<HashMap<_, _>, _>>()
        .map_err(|error| AppError::config(format!("invalid env file: {error}")))
}

fn lookup_trimmed<F>(lookup: &F, key: &str) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(key)
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parse_or_default<T, F>(lookup: &F, key: &str, default: T) -> Result<T, AppError>
where
    T: std::str::FromStr + Copy,
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .map_err(|_| AppError::config(format!("{key} must be a valid number"))),
        None => Ok(default),
    }
}
