use std::net::SocketAddr;
use std::str::FromStr;
use std::time::Duration;

use thiserror::Error;
use url::Url;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{key} has invalid value `{value}`: {reason}")]
    Invalid {
        key: &'static str,
        value: String,
        reason: String,
    },
}

/// Window sizes used to shape each chart view
#[derive(Debug, Clone, PartialEq)]
pub struct ViewPresets {
    pub daily_eval_window: usize,
    pub daily_forecast_horizon: usize,
    pub monthly_history_context: usize,
    pub monthly_eval_context: usize,
    pub max_days_ahead: i64,
}

impl Default for ViewPresets {
    fn default() -> Self {
        Self {
            daily_eval_window: 15,
            daily_forecast_horizon: 10,
            monthly_history_context: 60,
            monthly_eval_context: 30,
            max_days_ahead: 60,
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub bind_addr: SocketAddr,
    pub forecast_api_url: Url,
    pub spot_api_url: Url,
    pub http_timeout: Duration,
    pub presets: ViewPresets,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the config from any key lookup; `from_env` passes the process environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = ViewPresets::default();

        let presets = ViewPresets {
            daily_eval_window: parse_or(&lookup, "DAILY_EVAL_WINDOW", defaults.daily_eval_window)?,
            daily_forecast_horizon: parse_or(
                &lookup,
                "DAILY_FORECAST_HORIZON",
                defaults.daily_forecast_horizon,
            )?,
            monthly_history_context: parse_or(
                &lookup,
                "MONTHLY_HISTORY_CONTEXT",
                defaults.monthly_history_context,
            )?,
            monthly_eval_context: parse_or(
                &lookup,
                "MONTHLY_EVAL_CONTEXT",
                defaults.monthly_eval_context,
            )?,
            max_days_ahead: parse_or(&lookup, "MAX_DAYS_AHEAD", defaults.max_days_ahead)?,
        };

        if presets.max_days_ahead < 1 {
            return Err(ConfigError::Invalid {
                key: "MAX_DAYS_AHEAD",
                value: presets.max_days_ahead.to_string(),
                reason: "must be at least 1".to_string(),
            });
        }

        let http_timeout_secs: u64 = parse_or(&lookup, "HTTP_TIMEOUT_SECS", 10)?;
        if http_timeout_secs < 1 {
            return Err(ConfigError::Invalid {
                key: "HTTP_TIMEOUT_SECS",
                value: http_timeout_secs.to_string(),
                reason: "must be at least 1".to_string(),
            });
        }

        Ok(Self {
            bind_addr: parse_or(&lookup, "BIND_ADDR", SocketAddr::from(([0, 0, 0, 0], 3000)))?,
            forecast_api_url: parse_url(&lookup, "FORECAST_API_URL", "http://127.0.0.1:8001")?,
            spot_api_url: parse_url(&lookup, "SPOT_API_URL", "https://api.binance.com")?,
            http_timeout: Duration::from_secs(http_timeout_secs),
            presets,
        })
    }
}

fn parse_or<F, T>(lookup: &F, key: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::fmt::Display,
{
    let Some(value) = lookup(key) else {
        return Ok(default);
    };
    let parsed = value.trim().parse::<T>();
    parsed.map_err(|e| ConfigError::Invalid {
        key,
        reason: e.to_string(),
        value,
    })
}

fn parse_url<F>(lookup: &F, key: &'static str, default: &str) -> Result<Url, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let value = lookup(key).unwrap_or_else(|| default.to_string());
    Url::parse(&value).map_err(|e| ConfigError::Invalid {
        key,
        reason: e.to_string(),
        value,
    })
}
