//! # Configuration Module
//!
//! This module defines configuration structures for the bot: provider
//! endpoints, recovery settings for outbound calls, and the values read
//! from the environment at startup.

use anyhow::{anyhow, Context, Result};
use std::str::FromStr;

// Constants for provider configuration
pub const DEFAULT_PLACES_API_URL: &str = "https://catalog.api.2gis.com/3.0/items";
pub const DEFAULT_GEOCODER_URL: &str = "https://nominatim.openstreetmap.org/search";
pub const DEFAULT_MAP_LINK_BASE: &str = "https://yandex.ru/maps/";
pub const DEFAULT_LANGUAGE: &str = "ru";
pub const USER_AGENT: &str = concat!("barfinder/", env!("CARGO_PKG_VERSION"));

/// Recovery configuration for outbound HTTP calls
#[derive(Debug, Clone)]
pub struct RecoveryConfig {
    /// Maximum number of retry attempts after the first request
    pub max_retries: u32,
    /// Base delay between retries in milliseconds
    pub base_retry_delay_ms: u64,
    /// Maximum delay between retries in milliseconds
    pub max_retry_delay_ms: u64,
    /// Timeout for a single HTTP request in seconds
    pub request_timeout_secs: u64,
    /// Circuit breaker failure threshold
    pub circuit_breaker_threshold: u32,
    /// Circuit breaker reset timeout in seconds
    pub circuit_breaker_reset_secs: u64,
}

impl Default for RecoveryConfig {
    fn default() -> Self {
        Self {
            max_retries: 2,
            base_retry_delay_ms: 500,
            max_retry_delay_ms: 5000,
            request_timeout_secs: 10,
            circuit_breaker_threshold: 5,
            circuit_breaker_reset_secs: 60, // 1 minute
        }
    }
}

/// Endpoints and credentials of the external providers
#[derive(Debug, Clone)]
pub struct ProviderConfig {
    /// Places-search endpoint (2GIS catalog items)
    pub places_api_url: String,
    /// API key sent as the `key` query parameter
    pub places_api_key: String,
    /// Fallback geocoding endpoint (Nominatim search)
    pub geocoder_url: String,
    /// Base of the generated map links
    pub map_link_base: String,
    /// Timeouts, retries and circuit breaker settings
    pub recovery: RecoveryConfig,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            places_api_url: DEFAULT_PLACES_API_URL.to_string(),
            places_api_key: String::new(),
            geocoder_url: DEFAULT_GEOCODER_URL.to_string(),
            map_link_base: DEFAULT_MAP_LINK_BASE.to_string(),
            recovery: RecoveryConfig::default(),
        }
    }
}

/// Everything the binary needs at startup
#[derive(Debug, Clone)]
pub struct BotConfig {
    pub telegram_token: String,
    /// PostgreSQL URL; locations are kept in memory when absent
    pub database_url: Option<String>,
    /// Language used when a user's Telegram language is not supported
    pub default_language: String,
    /// Emit logs as JSON lines instead of human-readable text
    pub json_logs: bool,
    pub provider: ProviderConfig,
}

impl BotConfig {
    /// Read configuration from the process environment
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &str| -> Result<String> {
            lookup(key)
                .filter(|value| !value.trim().is_empty())
                .ok_or_else(|| anyhow!("{key} must be set"))
        };
        let optional = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let defaults = RecoveryConfig::default();
        let recovery = RecoveryConfig {
            max_retries: parse_or(&lookup, "HTTP_MAX_RETRIES", defaults.max_retries)?,
            request_timeout_secs: parse_or(
                &lookup,
                "HTTP_TIMEOUT_SECS",
                defaults.request_timeout_secs,
            )?,
            circuit_breaker_threshold: parse_or(
                &lookup,
                "CIRCUIT_BREAKER_THRESHOLD",
                defaults.circuit_breaker_threshold,
            )?,
            circuit_breaker_reset_secs: parse_or(
                &lookup,
                "CIRCUIT_BREAKER_RESET_SECS",
                defaults.circuit_breaker_reset_secs,
            )?,
            ..defaults
        };
        if recovery.request_timeout_secs == 0 {
            return Err(anyhow!("HTTP_TIMEOUT_SECS must be greater than zero"));
        }

        let provider = ProviderConfig {
            places_api_url: optional("PLACES_API_URL")
                .unwrap_or_else(|| DEFAULT_PLACES_API_URL.to_string()),
            places_api_key: required("PLACES_API_KEY")?,
            geocoder_url: optional("GEOCODER_URL")
                .unwrap_or_else(|| DEFAULT_GEOCODER_URL.to_string()),
            map_link_base: optional("MAP_LINK_BASE")
                .unwrap_or_else(|| DEFAULT_MAP_LINK_BASE.to_string()),
            recovery,
        };

        Ok(Self {
            telegram_token: required("TELEGRAM_BOT_TOKEN")?,
            database_url: optional("DATABASE_URL"),
            default_language: optional("DEFAULT_LANGUAGE")
                .unwrap_or_else(|| DEFAULT_LANGUAGE.to_string()),
            json_logs: optional("LOG_FORMAT").is_some_and(|v| v.eq_ignore_ascii_case("json")),
            provider,
        })
    }
}

fn parse_or<T, F>(lookup: &F, key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        Some(raw) if !raw.trim().is_empty() => raw
            .trim()
            .parse()
            .with_context(|| format!("Invalid value for {key}: {raw:?}")),
        _ => Ok(default),
    }
}
