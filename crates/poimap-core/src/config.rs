use std::str::FromStr;

use crate::app_config::{AppConfig, Environment};
use crate::ConfigError;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Decoupled from the real environment so tests can feed a `HashMap` lookup.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    let require = |var: &str| -> Result<String, ConfigError> {
        lookup(var)
            .ok()
            .filter(|v| !v.trim().is_empty())
            .ok_or_else(|| ConfigError::MissingEnvVar(var.to_string()))
    };

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let api_key = require("POIMAP_API_KEY")?;
    let env = parse_environment(&or_default("POIMAP_ENV", "development"))?;
    let log_level = or_default("POIMAP_LOG_LEVEL", "info");

    let base_url = or_default("POIMAP_BASE_URL", "https://apis.openapi.sk.com");
    if !base_url.starts_with("http://") && !base_url.starts_with("https://") {
        return Err(ConfigError::InvalidEnvVar {
            var: "POIMAP_BASE_URL".to_string(),
            reason: format!("expected an http(s) URL, got '{base_url}'"),
        });
    }

    let api_version: u32 = parse_var(&or_default("POIMAP_API_VERSION", "1"), "POIMAP_API_VERSION")?;

    let page_size: u32 = parse_var(&or_default("POIMAP_PAGE_SIZE", "30"), "POIMAP_PAGE_SIZE")?;
    if !(1..=200).contains(&page_size) {
        return Err(ConfigError::InvalidEnvVar {
            var: "POIMAP_PAGE_SIZE".to_string(),
            reason: format!("must be between 1 and 200, got {page_size}"),
        });
    }

    let connect_timeout_secs: u64 = parse_var(
        &or_default("POIMAP_CONNECT_TIMEOUT_SECS", "5"),
        "POIMAP_CONNECT_TIMEOUT_SECS",
    )?;
    let camera_zoom: f32 = parse_var(&or_default("POIMAP_CAMERA_ZOOM", "17"), "POIMAP_CAMERA_ZOOM")?;
    let location_min_interval_ms: u64 = parse_var(
        &or_default("POIMAP_LOCATION_MIN_INTERVAL_MS", "3000"),
        "POIMAP_LOCATION_MIN_INTERVAL_MS",
    )?;
    let location_min_distance_m: f32 = parse_var(
        &or_default("POIMAP_LOCATION_MIN_DISTANCE_M", "100"),
        "POIMAP_LOCATION_MIN_DISTANCE_M",
    )?;

    Ok(AppConfig {
        env,
        log_level,
        api_key,
        base_url,
        api_version,
        page_size,
        connect_timeout_secs,
        camera_zoom,
        location_min_interval_ms,
        location_min_distance_m,
    })
}

fn parse_var<T>(raw: &str, var: &str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    raw.trim()
        .parse::<T>()
        .map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
}

/// Parse a string into an `Environment` variant.
fn parse_environment(s: &str) -> Result<Environment, ConfigError> {
    match s {
        "development" => Ok(Environment::Development),
        "test" => Ok(Environment::Test),
        "production" => Ok(Environment::Production),
        other => Err(ConfigError::InvalidEnvVar {
            var: "POIMAP_ENV".to_string(),
            reason: format!("expected development, test or production, got '{other}'"),
        }),
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
