use std::path::PathBuf;

use thiserror::Error;

use crate::app_config::{AppConfig, Environment};

const DEFAULT_API_BASE_URL: &str = "https://api-bettabeal.dgeo.id/api";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for env var {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if a set env var holds an unparsable value.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the
/// process. Unlike [`load_app_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if a set env var holds an unparsable value.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// This is the core parsing/validation logic, decoupled from the actual
/// environment so it can be tested with a pure `HashMap` lookup — no
/// `set_var`/`remove_var` needed.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let parse_u32 = |var: &str, default: &str| -> Result<u32, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u32>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u64>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let env = match or_default("BCOD_ENV", "development").as_str() {
        "production" => Environment::Production,
        "test" => Environment::Test,
        _ => Environment::Development,
    };

    let api_base_url = or_default("BCOD_API_BASE_URL", DEFAULT_API_BASE_URL);
    if api_base_url.trim().is_empty() {
        return Err(ConfigError::InvalidEnvVar {
            var: "BCOD_API_BASE_URL".to_string(),
            reason: "must not be empty".to_string(),
        });
    }

    let token_path = lookup("BCOD_TOKEN_PATH").map_or_else(
        |_| {
            let home = lookup("HOME").unwrap_or_else(|_| ".".to_string());
            PathBuf::from(home).join(".config/bcod/token")
        },
        PathBuf::from,
    );

    Ok(AppConfig {
        env,
        api_base_url,
        http_timeout_secs: parse_u64("BCOD_HTTP_TIMEOUT_SECS", "30")?,
        user_agent: or_default("BCOD_USER_AGENT", "bcod/0.1 (campus-marketplace)"),
        per_page: parse_u32("BCOD_PER_PAGE", "12")?,
        search_debounce_ms: parse_u64("BCOD_SEARCH_DEBOUNCE_MS", "700")?,
        log_level: or_default("BCOD_LOG_LEVEL", "info"),
        token_path,
    })
}
