use std::fmt;
use std::path::Path;

use error_stack::Report;

use crate::error::ConfigError;

const DEFAULT_EXCHANGE: &str = "BINANCE";
const DEFAULT_INTERVAL: &str = "24h";
const DEFAULT_WATCH_LIST: &str = "BTC/USDT,ETH/USDT";
const DEFAULT_TAAPI_BASE_URL: &str = "https://api.taapi.io";
const DEFAULT_TELEGRAM_API_URL: &str = "https://api.telegram.org";
const DEFAULT_LOG_LEVEL: &str = "info";
const DEFAULT_LOG_FORMAT: &str = "text";

const REQUIRED_VARS: [&str; 3] = ["TAAPI_API_KEY", "TELEGRAM_BOT_TOKEN", "TELEGRAM_CHAT_ID"];
const VALID_LOG_FORMATS: &[&str] = &["text", "json"];

/// A credential that must never show up in `Debug` output.
#[derive(Clone, PartialEq, Eq)]
pub struct Secret(String);

impl Secret {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Secret(***)")
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub taapi: TaapiConfig,
    pub telegram: TelegramConfig,
    /// Symbols in evaluation order. Duplicates are kept.
    pub watch_list: Vec<String>,
    pub log_level: String,
    /// Accepted values: `"text"` | `"json"`
    pub log_format: String,
}

#[derive(Debug, Clone)]
pub struct TaapiConfig {
    pub api_key: Secret,
    pub base_url: String,
    pub exchange: String,
    pub interval: String,
}

#[derive(Debug, Clone)]
pub struct TelegramConfig {
    pub bot_token: Secret,
    pub chat_id: String,
    pub api_url: String,
}

/// Load the configuration from the process environment.
///
/// Variables from `env_file` are merged in first when the file exists; values
/// already present in the environment win.
pub fn load(env_file: &Path) -> Result<AppConfig, Report<ConfigError>> {
    match dotenvy::from_path(env_file) {
        Ok(()) => {}
        Err(dotenvy::Error::Io(e)) if e.kind() == std::io::ErrorKind::NotFound => {}
        Err(e) => {
            return Err(Report::new(ConfigError::Validation {
                field: format!("env file {}: {e}", env_file.display()),
            }));
        }
    }

    from_lookup(|key| std::env::var(key).ok())
}

/// Build an `AppConfig` from an arbitrary variable lookup.
///
/// Empty values count as unset.
pub fn from_lookup<F>(lookup: F) -> Result<AppConfig, Report<ConfigError>>
where
    F: Fn(&str) -> Option<String>,
{
    let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
    let get_or = |key: &str, default: &str| get(key).unwrap_or_else(|| default.to_owned());

    let missing: Vec<&str> = REQUIRED_VARS
        .into_iter()
        .filter(|key| get(*key).is_none())
        .collect();
    if !missing.is_empty() {
        return Err(Report::new(ConfigError::Missing {
            vars: missing.join(", "),
        }));
    }

    let config = AppConfig {
        taapi: TaapiConfig {
            api_key: Secret::new(get_or("TAAPI_API_KEY", "")),
            base_url: get_or("TAAPI_BASE_URL", DEFAULT_TAAPI_BASE_URL),
            exchange: get_or("EXCHANGE", DEFAULT_EXCHANGE),
            interval: get_or("INTERVAL", DEFAULT_INTERVAL),
        },
        telegram: TelegramConfig {
            bot_token: Secret::new(get_or("TELEGRAM_BOT_TOKEN", "")),
            chat_id: get_or("TELEGRAM_CHAT_ID", ""),
            api_url: get_or("TELEGRAM_API_URL", DEFAULT_TELEGRAM_API_URL),
        },
        watch_list: parse_watch_list(&get_or("WATCH_LIST", DEFAULT_WATCH_LIST)),
        log_level: get_or("LOG_LEVEL", DEFAULT_LOG_LEVEL),
        log_format: get_or("LOG_FORMAT", DEFAULT_LOG_FORMAT),
    };

    validate(&config)?;

    Ok(config)
}

fn parse_watch_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_owned)
        .collect()
}

fn validate(config: &AppConfig) -> Result<(), Report<ConfigError>> {
    if config.watch_list.is_empty() {
        return Err(Report::new(ConfigError::Validation {
            field: "WATCH_LIST: no symbols configured".into(),
        }));
    }

    if !VALID_LOG_FORMATS.contains(&config.log_format.as_str()) {
        return Err(Report::new(ConfigError::Validation {
            field: format!("LOG_FORMAT \"{}\" is not valid", config.log_format),
        }));
    }

    Ok(())
}
