//! Configuration layer: typed settings with layered precedence (file → env → CLI).

use std::{num::NonZeroU32, str::FromStr, time::Duration};

use chrono_tz::Tz;
use clap::Parser;
use config::{Config, Environment, File};
use serde::Deserialize;
use thiserror::Error;
use tracing::level_filters::LevelFilter;
use url::Url;

use crate::application::fetcher::{DEFAULT_LIST_LIMIT, DEFAULT_NEWS_LIMIT, DEFAULT_TIMEOUT};

mod cli;

pub use cli::{
    CliArgs, Command, ListArgs, RenderArgs, SearchArgs, SettingsOverrides, ShowArgs,
};

const DEFAULT_CONFIG_BASENAME: &str = "config/default";
const LOCAL_CONFIG_BASENAME: &str = "edgesite";
const ENV_PREFIX: &str = "EDGESITE";
/// Endpoint variable understood by earlier deployments of the site.
pub const LEGACY_ENDPOINT_VAR: &str = "GRAPHQL_ENDPOINT_URL";
const DEFAULT_BACKEND_TIMEOUT_SECS: u64 = DEFAULT_TIMEOUT.as_secs();
const DEFAULT_TIMEZONE: Tz = Tz::Asia__Tokyo;

/// Fully-resolved settings after precedence resolution and validation.
#[derive(Debug, Clone)]
pub struct Settings {
    pub logging: LoggingSettings,
    pub backend: BackendSettings,
    pub fetch: FetchSettings,
    pub display: DisplaySettings,
}

#[derive(Debug, Clone)]
pub struct LoggingSettings {
    pub level: LevelFilter,
    pub format: LogFormat,
}

#[derive(Debug, Clone, Copy)]
pub enum LogFormat {
    Json,
    Compact,
}

#[derive(Debug, Clone)]
pub struct BackendSettings {
    /// `None` leaves the site running in its "content unavailable" state.
    pub endpoint: Option<Url>,
    pub timeout: Duration,
}

#[derive(Debug, Clone)]
pub struct FetchSettings {
    pub list_limit: NonZeroU32,
    pub news_limit: NonZeroU32,
}

#[derive(Debug, Clone)]
pub struct DisplaySettings {
    pub timezone: Tz,
}

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to build configuration: {0}")]
    Build(#[from] config::ConfigError),
    #[error("invalid configuration for `{key}`: {reason}")]
    Invalid { key: &'static str, reason: String },
}

impl LoadError {
    fn invalid(key: &'static str, reason: impl Into<String>) -> Self {
        Self::Invalid {
            key,
            reason: reason.into(),
        }
    }
}

/// Load settings using the configured precedence (file → environment → CLI).
pub fn load(cli: &CliArgs) -> Result<Settings, LoadError> {
    let mut builder = Config::builder()
        .add_source(File::with_name(DEFAULT_CONFIG_BASENAME).required(false))
        .add_source(File::with_name(LOCAL_CONFIG_BASENAME).required(false));

    if let Some(path) = cli.config_file.as_ref() {
        builder = builder.add_source(File::from(path.as_path()).required(true));
    }

    builder = builder.add_source(Environment::with_prefix(ENV_PREFIX).separator("__"));

    let mut raw: RawSettings = builder.build()?.try_deserialize()?;
    raw.apply_overrides(&cli.overrides);
    raw.apply_legacy_endpoint(std::env::var(LEGACY_ENDPOINT_VAR).ok());

    Settings::from_raw(raw)
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawSettings {
    logging: RawLoggingSettings,
    backend: RawBackendSettings,
    fetch: RawFetchSettings,
    display: RawDisplaySettings,
}

impl RawSettings {
    fn apply_overrides(&mut self, overrides: &SettingsOverrides) {
        if let Some(level) = overrides.log_level.as_ref() {
            self.logging.level = Some(level.clone());
        }
        if let Some(json) = overrides.log_json {
            self.logging.json = Some(json);
        }
        if let Some(endpoint) = overrides.backend_endpoint.as_ref() {
            self.backend.endpoint = Some(endpoint.clone());
        }
        if let Some(seconds) = overrides.backend_timeout_seconds {
            self.backend.timeout_seconds = Some(seconds);
        }
        if let Some(timezone) = overrides.display_timezone.as_ref() {
            self.display.timezone = Some(timezone.clone());
        }
    }

    /// Only fills the endpoint when no other layer provided a non-blank one.
    fn apply_legacy_endpoint(&mut self, value: Option<String>) {
        let configured = self
            .backend
            .endpoint
            .as_deref()
            .is_some_and(|endpoint| !endpoint.trim().is_empty());
        if !configured {
            if let Some(value) = value {
                self.backend.endpoint = Some(value);
            }
        }
    }
}

impl Settings {
    fn from_raw(raw: RawSettings) -> Result<Self, LoadError> {
        let RawSettings {
            logging,
            backend,
            fetch,
            display,
        } = raw;

        let logging = build_logging_settings(logging)?;
        let backend = build_backend_settings(backend)?;
        let fetch = build_fetch_settings(fetch)?;
        let display = build_display_settings(display)?;

        Ok(Self {
            logging,
            backend,
            fetch,
            display,
        })
    }
}

fn build_logging_settings(logging: RawLoggingSettings) -> Result<LoggingSettings, LoadError> {
    let level = match logging.level {
        Some(level) => LevelFilter::from_str(level.as_str()).map_err(|err| {
            LoadError::invalid("logging.level", format!("failed to parse: {err}"))
        })?,
        None => LevelFilter::INFO,
    };

    let format = if logging.json.unwrap_or(false) {
        LogFormat::Json
    } else {
        LogFormat::Compact
    };

    Ok(LoggingSettings { level, format })
}

fn build_backend_settings(backend: RawBackendSettings) -> Result<BackendSettings, LoadError> {
    let endpoint = match backend.endpoint.as_deref().map(str::trim) {
        None | Some("") => None,
        Some(value) => Some(parse_endpoint(value)?),
    };

    let timeout_seconds = backend
        .timeout_seconds
        .unwrap_or(DEFAULT_BACKEND_TIMEOUT_SECS);
    if timeout_seconds == 0 {
        return Err(LoadError::invalid(
            "backend.timeout_seconds",
            "must be greater than zero",
        ));
    }

    Ok(BackendSettings {
        endpoint,
        timeout: Duration::from_secs(timeout_seconds),
    })
}

fn build_fetch_settings(fetch: RawFetchSettings) -> Result<FetchSettings, LoadError> {
    let list_limit = non_zero_u32(
        fetch.list_limit.unwrap_or(u64::from(DEFAULT_LIST_LIMIT)),
        "fetch.list_limit",
    )?;
    let news_limit = non_zero_u32(
        fetch.news_limit.unwrap_or(u64::from(DEFAULT_NEWS_LIMIT)),
        "fetch.news_limit",
    )?;

    Ok(FetchSettings {
        list_limit,
        news_limit,
    })
}

fn build_display_settings(display: RawDisplaySettings) -> Result<DisplaySettings, LoadError> {
    let timezone = match display.timezone.as_deref().map(str::trim) {
        None | Some("") => DEFAULT_TIMEZONE,
        Some(name) => Tz::from_str(name).map_err(|err| {
            LoadError::invalid("display.timezone", format!("unknown timezone `{name}`: {err}"))
        })?,
    };

    Ok(DisplaySettings { timezone })
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawLoggingSettings {
    level: Option<String>,
    json: Option<bool>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawBackendSettings {
    endpoint: Option<String>,
    timeout_seconds: Option<u64>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawFetchSettings {
    list_limit: Option<u64>,
    news_limit: Option<u64>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawDisplaySettings {
    timezone: Option<String>,
}

fn parse_endpoint(value: &str) -> Result<Url, LoadError> {
    let url = Url::parse(value)
        .map_err(|err| LoadError::invalid("backend.endpoint", format!("invalid url: {err}")))?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(LoadError::invalid(
            "backend.endpoint",
            format!("unsupported scheme `{other}`"),
        )),
    }
}

fn non_zero_u32(value: u64, key: &'static str) -> Result<NonZeroU32, LoadError> {
    if value == 0 {
        return Err(LoadError::invalid(key, "must be greater than zero"));
    }
    let value_u32: u32 = value
        .try_into()
        .map_err(|_| LoadError::invalid(key, "value exceeds supported range for u32"))?;
    NonZeroU32::new(value_u32).ok_or_else(|| LoadError::invalid(key, "must be greater than zero"))
}

/// Resolve configuration using the process arguments, returning both for downstream use.
pub fn load_with_cli() -> Result<(CliArgs, Settings), LoadError> {
    let args = CliArgs::parse();
    let settings = load(&args)?;
    Ok((args, settings))
}
