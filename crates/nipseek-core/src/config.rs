use crate::app_config::{AppConfig, Environment};
use crate::ConfigError;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if values are present but invalid.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files, which keeps
/// test setups in charge of their own environment.
///
/// # Errors
///
/// Returns `ConfigError` if values are present but invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// The parsing/validation logic is decoupled from the real environment so it
/// can be tested against a plain `HashMap` lookup.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::net::SocketAddr;
    use std::path::PathBuf;

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

    let parse_usize = |var: &str, default: &str| -> Result<usize, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<usize>()
            .map_err(|e| ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: e.to_string(),
            })
    };

    let parse_bool = |var: &str, default: &str| -> Result<bool, ConfigError> {
        let raw = or_default(var, default);
        match raw.as_str() {
            "true" | "1" => Ok(true),
            "false" | "0" => Ok(false),
            other => Err(ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: format!("expected true/false, got {other:?}"),
            }),
        }
    };

    let env = parse_environment(&or_default("NIPSEEK_ENV", "development"));
    let bind_addr = parse_addr("NIPSEEK_BIND_ADDR", "0.0.0.0:8000")?;
    let log_level = or_default("NIPSEEK_LOG_LEVEL", "info");

    let base_url = or_default("NIPSEEK_BASE_URL", "https://aleo.com/pl");
    let nav_timeout_ms = parse_u64("NIPSEEK_NAV_TIMEOUT_MS", "20000")?;
    if nav_timeout_ms == 0 {
        return Err(ConfigError::InvalidEnvVar {
            var: "NIPSEEK_NAV_TIMEOUT_MS".to_string(),
            reason: "must be greater than zero".to_string(),
        });
    }
    let max_concurrent_sessions = parse_usize("NIPSEEK_MAX_CONCURRENT_SESSIONS", "2")?;
    if max_concurrent_sessions == 0 {
        return Err(ConfigError::InvalidEnvVar {
            var: "NIPSEEK_MAX_CONCURRENT_SESSIONS".to_string(),
            reason: "must be greater than zero".to_string(),
        });
    }

    let chromium_path = lookup("NIPSEEK_CHROMIUM_PATH").ok().map(PathBuf::from);
    let headless = parse_bool("NIPSEEK_HEADLESS", "true")?;

    let detail_max_retries = parse_u32("NIPSEEK_DETAIL_MAX_RETRIES", "1")?;
    let detail_retry_backoff_ms = parse_u64("NIPSEEK_DETAIL_RETRY_BACKOFF_MS", "500")?;

    Ok(AppConfig {
        env,
        bind_addr,
        log_level,
        base_url,
        nav_timeout_ms,
        max_concurrent_sessions,
        chromium_path,
        headless,
        detail_max_retries,
        detail_retry_backoff_ms,
    })
}

/// Parse a string into an `Environment` variant.
///
/// Unrecognized values default to `Environment::Development`.
fn parse_environment(s: &str) -> Environment {
    match s {
        "production" => Environment::Production,
        "test" => Environment::Test,
        _ => Environment::Development,
    }
}
