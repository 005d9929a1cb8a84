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
/// Decoupled from the process environment so it can be tested with a plain
/// `HashMap` lookup.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::net::SocketAddr;
    use std::path::PathBuf;

    let require = |var: &str| -> Result<String, ConfigError> {
        lookup(var)
            .ok()
            .filter(|v| !v.trim().is_empty())
            .ok_or_else(|| ConfigError::MissingEnvVar(var.to_string()))
    };

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let parse_addr = |var: &str, default: &str| -> Result<SocketAddr, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<SocketAddr>()
            .map_err(|e| ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: e.to_string(),
            })
    };

    let parse_optional_u64 = |var: &str| -> Result<Option<u64>, ConfigError> {
        match lookup(var) {
            Ok(raw) if !raw.trim().is_empty() => raw
                .trim()
                .parse::<u64>()
                .map(Some)
                .map_err(|e| ConfigError::InvalidEnvVar {
                    var: var.to_string(),
                    reason: e.to_string(),
                }),
            _ => Ok(None),
        }
    };

    let backend_url = require("SUPABASE_URL")?;
    let backend_api_key = require("SUPABASE_ANON_KEY")?;

    let env = parse_environment(&or_default("VALDIR_ENV", "development"))?;

    let bind_addr = parse_addr("VALDIR_BIND_ADDR", "0.0.0.0:3000")?;
    let log_level = or_default("VALDIR_LOG_LEVEL", "info");
    let locator_path = PathBuf::from(or_default("VALDIR_LOCATOR_PATH", "./config/locator.yaml"));
    let storage_path = PathBuf::from(or_default(
        "VALDIR_STORAGE_PATH",
        "./.valdir/storage.json",
    ));
    let site_url = or_default("VALDIR_SITE_URL", "http://localhost:5173/");

    let viacep_base_url = or_default("VALDIR_VIACEP_BASE_URL", "https://viacep.com.br/ws/");
    let nominatim_base_url = or_default(
        "VALDIR_NOMINATIM_BASE_URL",
        "https://nominatim.openstreetmap.org/",
    );
    let geocoder_user_agent = or_default("VALDIR_GEOCODER_USER_AGENT", "ValdirMoveis/1.0");
    let http_timeout_secs = parse_optional_u64("VALDIR_HTTP_TIMEOUT_SECS")?;

    let api_keys = parse_api_keys(&or_default("VALDIR_API_KEYS", ""));
    if api_keys.is_empty() && env == Environment::Production {
        return Err(ConfigError::MissingEnvVar("VALDIR_API_KEYS".to_string()));
    }

    Ok(AppConfig {
        backend_url,
        backend_api_key,
        env,
        bind_addr,
        log_level,
        locator_path,
        storage_path,
        site_url,
        viacep_base_url,
        nominatim_base_url,
        geocoder_user_agent,
        http_timeout_secs,
        api_keys,
    })
}

/// Parse a string into an `Environment` variant.
///
/// # Errors
///
/// Returns `ConfigError::InvalidEnvVar` for anything other than
/// `development`, `test`, or `production`.
fn parse_environment(s: &str) -> Result<Environment, ConfigError> {
    match s {
        "development" => Ok(Environment::Development),
        "test" => Ok(Environment::Test),
        "production" => Ok(Environment::Production),
        other => Err(ConfigError::InvalidEnvVar {
            var: "VALDIR_ENV".to_string(),
            reason: format!("unknown environment '{other}'"),
        }),
    }
}

fn parse_api_keys(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(ToOwned::to_owned)
        .collect()
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
