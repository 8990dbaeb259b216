// config.rs
use std::net::SocketAddr;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;
use tracing::warn;

pub const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_CHAT_MODEL: &str = "gpt-3.5-turbo";
pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 5000;
pub const DEFAULT_MAX_WORKERS: usize = 8;
pub const DEFAULT_IMAGE_FETCH_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_TRANSCRIPTION_TIMEOUT_SECS: u64 = 120;
pub const DEFAULT_CHAT_TIMEOUT_SECS: u64 = 60;
/// The speech endpoint refuses files above 25 MiB anyway.
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 25 * 1024 * 1024;
pub const DEFAULT_MAX_IMAGE_BYTES: usize = 20 * 1024 * 1024;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} is not set")]
    Missing(&'static str),
    #[error("invalid bind address {addr}: {reason}")]
    BindAddr { addr: String, reason: String },
}

/// Process-wide settings, read once at startup.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub api_key: String,
    pub openai_base_url: String,
    pub chat_model: String,
    pub host: String,
    pub port: u16,
    pub max_workers: usize,
    pub image_fetch_timeout: Duration,
    pub transcription_timeout: Duration,
    pub chat_timeout: Duration,
    pub max_upload_bytes: usize,
    pub max_image_bytes: usize,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the config from any key lookup. Blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let api_key = get("OPENAI_KEY").ok_or(ConfigError::Missing("OPENAI_KEY"))?;

        Ok(Self {
            api_key,
            openai_base_url: get("OPENAI_BASE_URL")
                .unwrap_or_else(|| DEFAULT_OPENAI_BASE_URL.to_string()),
            chat_model: get("OPENAI_CHAT_MODEL").unwrap_or_else(|| DEFAULT_CHAT_MODEL.to_string()),
            host: get("HOST").unwrap_or_else(|| DEFAULT_HOST.to_string()),
            port: parse_or(&get, "PORT", DEFAULT_PORT),
            max_workers: parse_or(&get, "MAX_WORKERS", DEFAULT_MAX_WORKERS).max(1),
            image_fetch_timeout: Duration::from_secs(parse_or(
                &get,
                "IMAGE_FETCH_TIMEOUT_SECS",
                DEFAULT_IMAGE_FETCH_TIMEOUT_SECS,
            )),
            transcription_timeout: Duration::from_secs(parse_or(
                &get,
                "TRANSCRIPTION_TIMEOUT_SECS",
                DEFAULT_TRANSCRIPTION_TIMEOUT_SECS,
            )),
            chat_timeout: Duration::from_secs(parse_or(
                &get,
                "CHAT_TIMEOUT_SECS",
                DEFAULT_CHAT_TIMEOUT_SECS,
            )),
            max_upload_bytes: parse_or(&get, "MAX_UPLOAD_BYTES", DEFAULT_MAX_UPLOAD_BYTES),
            max_image_bytes: parse_or(&get, "MAX_IMAGE_BYTES", DEFAULT_MAX_IMAGE_BYTES),
        })
    }

    pub fn bind_addr(&self) -> Result<SocketAddr, ConfigError> {
        let addr = format!("{}:{}", self.host, self.port);
        addr.parse().map_err(|e: std::net::AddrParseError| ConfigError::BindAddr {
            addr,
            reason: e.to_string(),
        })
    }
}

/// Merge the nearest `.env` file into the process environment. Variables
/// already set in the environment keep their values.
pub fn load_dotenv() -> Option<PathBuf> {
    dotenv_outcome(dotenvy::dotenv())
}

fn dotenv_outcome(result: Result<PathBuf, dotenvy::Error>) -> Option<PathBuf> {
    match result {
        Ok(path) => Some(path),
        Err(e) if e.not_found() => None,
        Err(e) => {
            warn!("Ignoring unreadable .env file: {e}");
            None
        }
    }
}

fn parse_or<T, G>(get: &G, key: &str, default: T) -> T
where
    T: FromStr + Copy + std::fmt::Display,
    G: Fn(&str) -> Option<String>,
{
    match get(key) {
        Some(raw) => match raw.parse::<T>() {
            Ok(parsed) => parsed,
            Err(_) => {
                warn!("Invalid {key}='{raw}', falling back to {default}");
                default
            }
        },
        None => default,
    }
}
