//! Service configuration from environment variables (and `.env`).

use std::net::SocketAddr;
use std::path::PathBuf;
use std::str::FromStr;

use anyhow::{Context, Result};
use rust_decimal::Decimal;

/// Runtime configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    /// Postgres catalog when set, fixture catalog otherwise
    pub database_url: Option<String>,
    /// JSON array of bikes for the fixture catalog
    pub bikes_fixture: Option<PathBuf>,
    pub service_fee: Decimal,
    pub tax_rate: Decimal,
    pub booking_hourly_rate: Decimal,
    pub currency: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            database_url: None,
            bikes_fixture: None,
            service_fee: Decimal::from(500),
            tax_rate: Decimal::new(18, 2),
            booking_hourly_rate: Decimal::from(500),
            currency: "INR".to_string(),
        }
    }
}

impl Config {
    /// Read configuration from the process environment.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read configuration through `lookup`, falling back to defaults for unset keys.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let config = Self {
            host: get("HOST").unwrap_or(defaults.host),
            port: parse_or(get("PORT"), "PORT", defaults.port)?,
            database_url: get("DATABASE_URL"),
            bikes_fixture: get("BIKES_FIXTURE").map(PathBuf::from),
            service_fee: parse_or(get("SERVICE_FEE"), "SERVICE_FEE", defaults.service_fee)?,
            tax_rate: parse_or(get("TAX_RATE"), "TAX_RATE", defaults.tax_rate)?,
            booking_hourly_rate: parse_or(
                get("BOOKING_HOURLY_RATE"),
                "BOOKING_HOURLY_RATE",
                defaults.booking_hourly_rate,
            )?,
            currency: get("CURRENCY").unwrap_or(defaults.currency),
        };

        if config.service_fee < Decimal::ZERO {
            anyhow::bail!("SERVICE_FEE must not be negative");
        }
        if config.tax_rate < Decimal::ZERO {
            anyhow::bail!("TAX_RATE must not be negative");
        }
        if config.booking_hourly_rate < Decimal::ZERO {
            anyhow::bail!("BOOKING_HOURLY_RATE must not be negative");
        }

        Ok(config)
    }

    pub fn socket_addr(&self) -> Result<SocketAddr> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .with_context(|| format!("Invalid listen address {}:{}", self.host, self.port))
    }
}

fn parse_or<T>(raw: Option<String>, key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match raw {
        Some(value) => value
            .trim()
            .parse()
            .with_context(|| format!("Invalid value for {}: {:?}", key, value)),
        None => Ok(default),
    }
}
