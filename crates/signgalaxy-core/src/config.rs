use std::str::FromStr;

use rust_decimal::Decimal;

use crate::app_config::{AppConfig, Environment};
use crate::pricing::PricingPolicy;
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
/// Decoupled from the process environment so tests can drive it from a map.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    let require = |var: &str| -> Result<String, ConfigError> {
        lookup(var).map_err(|_| ConfigError::MissingEnvVar(var.to_string()))
    };

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let database_url = require("DATABASE_URL")?;
    let env = parse_environment(&or_default("SIGNGALAXY_ENV", "development"))?;

    let bind_addr = parse_var(
        "SIGNGALAXY_BIND_ADDR",
        &or_default("SIGNGALAXY_BIND_ADDR", "0.0.0.0:5000"),
    )?;
    let log_level = or_default("SIGNGALAXY_LOG_LEVEL", "info");

    let db_max_connections =
        parse_var("SIGNGALAXY_DB_MAX_CONNECTIONS", &or_default("SIGNGALAXY_DB_MAX_CONNECTIONS", "10"))?;
    let db_min_connections =
        parse_var("SIGNGALAXY_DB_MIN_CONNECTIONS", &or_default("SIGNGALAXY_DB_MIN_CONNECTIONS", "1"))?;
    let db_acquire_timeout_secs = parse_var(
        "SIGNGALAXY_DB_ACQUIRE_TIMEOUT_SECS",
        &or_default("SIGNGALAXY_DB_ACQUIRE_TIMEOUT_SECS", "10"),
    )?;

    let defaults = PricingPolicy::default();
    let markup_multiplier = parse_positive_decimal(
        "SIGNGALAXY_PRICING_MARKUP",
        lookup("SIGNGALAXY_PRICING_MARKUP").ok(),
        defaults.markup_multiplier,
    )?;
    let min_absolute_gap = parse_positive_decimal(
        "SIGNGALAXY_PRICING_MIN_GAP",
        lookup("SIGNGALAXY_PRICING_MIN_GAP").ok(),
        defaults.min_absolute_gap,
    )?;
    let min_ratio = parse_positive_decimal(
        "SIGNGALAXY_PRICING_MIN_RATIO",
        lookup("SIGNGALAXY_PRICING_MIN_RATIO").ok(),
        defaults.min_ratio,
    )?;

    let api_keys = parse_api_keys(&or_default("SIGNGALAXY_API_KEYS", ""));

    Ok(AppConfig {
        database_url,
        env,
        bind_addr,
        log_level,
        db_max_connections,
        db_min_connections,
        db_acquire_timeout_secs,
        pricing: PricingPolicy {
            markup_multiplier,
            min_absolute_gap,
            min_ratio,
            ..defaults
        },
        api_keys,
    })
}

/// Splits a comma-separated key list, dropping blanks.
fn parse_api_keys(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(ToOwned::to_owned)
        .collect()
}

fn parse_var<T>(var: &str, raw: &str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    raw.parse::<T>().map_err(|e| ConfigError::InvalidEnvVar {
        var: var.to_string(),
        reason: e.to_string(),
    })
}

fn parse_positive_decimal(
    var: &str,
    raw: Option<String>,
    default: Decimal,
) -> Result<Decimal, ConfigError> {
    let Some(raw) = raw else {
        return Ok(default);
    };
    let value: Decimal = parse_var(var, raw.trim())?;
    if value <= Decimal::ZERO {
        return Err(ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: format!("must be greater than zero, got {value}"),
        });
    }
    Ok(value)
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
            var: "SIGNGALAXY_ENV".to_string(),
            reason: format!("expected development, test, or production, got '{other}'"),
        }),
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
