use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use anyhow::{Context, Result};

pub const DEFAULT_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_PRIMARY_MODEL: &str = "gemini-3-flash-preview";
pub const DEFAULT_FALLBACK_MODEL: &str = "gemini-flash-lite-latest";
const STORE_FILE_NAME: &str = "store.json";

/// Application configuration loaded from environment variables.
/// The API key is optional here; only commands that call the model require it.
#[derive(Debug, Clone)]
pub struct Config {
    pub api_key: Option<String>,
    pub api_base: String,
    pub primary_model: String,
    pub fallback_model: String,
    pub store_path: PathBuf,
    pub retry_delay: Duration,
    pub max_retries: u32,
    pub cooldown: Duration,
    pub http_timeout: Duration,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            api_key: optional_env("GEMINI_API_KEY").or_else(|| optional_env("GOOGLE_API_KEY")),
            api_base: optional_env("GEMINI_API_BASE")
                .unwrap_or_else(|| DEFAULT_API_BASE.to_string()),
            primary_model: optional_env("GEMINI_PRIMARY_MODEL")
                .unwrap_or_else(|| DEFAULT_PRIMARY_MODEL.to_string()),
            fallback_model: optional_env("GEMINI_FALLBACK_MODEL")
                .unwrap_or_else(|| DEFAULT_FALLBACK_MODEL.to_string()),
            store_path: match optional_env("STYLESENSE_STORE_PATH") {
                Some(path) => PathBuf::from(path),
                None => default_store_path()?,
            },
            retry_delay: Duration::from_millis(parse_env("STYLESENSE_RETRY_DELAY_MS", 2000)?),
            max_retries: parse_env("STYLESENSE_MAX_RETRIES", 2)?,
            cooldown: Duration::from_secs(parse_env("STYLESENSE_COOLDOWN_SECS", 20)?),
            http_timeout: Duration::from_secs(parse_env("STYLESENSE_HTTP_TIMEOUT_SECS", 120)?),
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }

    pub fn api_key(&self) -> Result<&str> {
        self.api_key
            .as_deref()
            .context("Required environment variable 'GEMINI_API_KEY' is not set")
    }
}

fn optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn parse_env<T>(key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match optional_env(key) {
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .with_context(|| format!("{key} must be a valid number, got '{raw}'")),
        None => Ok(default),
    }
}

fn default_store_path() -> Result<PathBuf> {
    let dir = dirs::data_dir()
        .context("Could not determine a data directory; set STYLESENSE_STORE_PATH")?;
    Ok(dir.join("stylesense").join(STORE_FILE_NAME))
}
