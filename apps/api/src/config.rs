use std::path::PathBuf;

use anyhow::{Context, Result};

const DEFAULT_REDIS_URL: &str = "redis://localhost:6379/0";

/// Application configuration loaded from environment variables.
/// Everything has a default except the optional model key and dictionary.
#[derive(Debug, Clone)]
pub struct Config {
    pub gemini_api_key: Option<String>,
    pub redis_url: String,
    pub upload_dir: PathBuf,
    pub dictionary_path: Option<PathBuf>,
    pub blind_mode: bool,
    pub job_ttl_secs: u64,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            gemini_api_key: optional_env("GEMINI_API_KEY"),
            redis_url: optional_env("REDIS_URL")
                .or_else(|| optional_env("CELERY_BROKER_URL"))
                .unwrap_or_else(|| DEFAULT_REDIS_URL.to_string()),
            upload_dir: optional_env("UPLOAD_DIR")
                .unwrap_or_else(|| "uploads".to_string())
                .into(),
            dictionary_path: optional_env("DICTIONARY_PATH").map(PathBuf::from),
            blind_mode: optional_env("BLIND_MODE")
                .map(|v| parse_flag(&v))
                .transpose()?
                .unwrap_or(false),
            job_ttl_secs: optional_env("JOB_TTL_SECS")
                .unwrap_or_else(|| "86400".to_string())
                .parse::<u64>()
                .context("JOB_TTL_SECS must be a number of seconds")?,
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "5000".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }
}

/// Unset and blank variables are treated the same.
fn optional_env(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parse_flag(value: &str) -> Result<bool> {
    match value.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => anyhow::bail!("BLIND_MODE must be true or false, got '{other}'"),
    }
}
