use std::{env, time::Duration};

use thiserror::Error;

const DAY: u64 = 24 * 3600;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Invalid value for {name}: {value}")]
    Invalid { name: &'static str, value: String },
    #[error("No store address configured")]
    NoStoreAddress,
}

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Production constants (default: false)
    pub is_prod: bool,
    /// Start with the origin kill switch engaged (default: false)
    pub failover_mode: bool,
    /// Recommendation service address (default: "127.0.0.1:9090")
    pub reco_addr: String,
    /// Detail-information service address (default: "127.0.0.1:9091")
    pub di_addr: String,
    /// Store URLs. The first one takes every write; reads rotate over all.
    pub redis_addresses: Vec<String>,
    /// Probability that a list/set result is written back (default: 1.0)
    pub cache_write_probability: f64,
    /// Initial cache versions as `(name, version)` pairs
    pub cache_versions: Vec<(String, u32)>,
    /// Soft capacity of set-shaped entries (default: 10)
    pub set_capacity: usize,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Environment variables:
    /// - `IS_PROD` - production constants (default: false)
    /// - `FAILOVER_MODE` - initial failover switch (default: false)
    /// - `RECO_ADDR` - recommendation service (default: "127.0.0.1:9090")
    /// - `DI_ADDR` - detail service (default: "127.0.0.1:9091")
    /// - `REDIS_ADDRESSES` - comma separated store URLs (default: "redis://127.0.0.1:6379")
    /// - `CACHE_WRITE_PROBABILITY` - write-back sampling (default: 1.0)
    /// - `CACHE_VERSIONS` - `name=version` pairs, comma separated (default: empty)
    /// - `SET_CAPACITY` - set entry soft capacity (default: 10)
    pub fn from_env() -> Result<Self, ConfigError> {
        let redis_addresses = parse_list(
            &env::var("REDIS_ADDRESSES").unwrap_or_else(|_| "redis://127.0.0.1:6379".to_string()),
        );
        if redis_addresses.is_empty() {
            return Err(ConfigError::NoStoreAddress);
        }

        Ok(Self {
            is_prod: parse_flag("IS_PROD")?,
            failover_mode: parse_flag("FAILOVER_MODE")?,
            reco_addr: env::var("RECO_ADDR").unwrap_or_else(|_| "127.0.0.1:9090".to_string()),
            di_addr: env::var("DI_ADDR").unwrap_or_else(|_| "127.0.0.1:9091".to_string()),
            redis_addresses,
            cache_write_probability: match env::var("CACHE_WRITE_PROBABILITY") {
                Err(_) => 1.0,
                Ok(value) => parse_probability("CACHE_WRITE_PROBABILITY", value)?,
            },
            cache_versions: parse_versions(&env::var("CACHE_VERSIONS").unwrap_or_default())?,
            set_capacity: parse_var("SET_CAPACITY", 10)?,
        })
    }

    /// TTL of detail entries.
    pub fn detail_ttl(&self) -> Duration {
        Duration::from_secs(if self.is_prod { 300 } else { 60 })
    }

    /// TTL of list and set entries.
    pub fn listing_ttl(&self) -> Duration {
        Duration::from_secs(if self.is_prod { 7 * DAY } else { 60 })
    }

    /// TTL of process-local memo entries.
    pub fn memo_ttl(&self) -> Duration {
        Duration::from_secs(if self.is_prod { 300 } else { 60 })
    }

    /// Deadline of one origin call. `None` means unbounded.
    pub fn origin_timeout(&self) -> Option<Duration> {
        self.is_prod.then(|| Duration::from_secs(2))
    }

    /// Deadline of a cache read made after the origin failed.
    pub fn degraded_timeout(&self) -> Duration {
        Duration::from_secs(1)
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(1)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            is_prod: false,
            failover_mode: false,
            reco_addr: "127.0.0.1:9090".to_string(),
            di_addr: "127.0.0.1:9091".to_string(),
            redis_addresses: vec!["redis://127.0.0.1:6379".to_string()],
            cache_write_probability: 1.0,
            cache_versions: Vec::new(),
            set_capacity: 10,
        }
    }
}

fn parse_flag(name: &'static str) -> Result<bool, ConfigError> {
    match env::var(name) {
        Err(_) => Ok(false),
        Ok(value) => match value.trim().to_ascii_lowercase().as_str() {
            "" | "0" | "false" | "no" => Ok(false),
            "1" | "true" | "yes" => Ok(true),
            _ => Err(ConfigError::Invalid { name, value }),
        },
    }
}

fn parse_var<T: std::str::FromStr>(name: &'static str, default: T) -> Result<T, ConfigError> {
    match env::var(name) {
        Err(_) => Ok(default),
        Ok(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid { name, value }),
    }
}

/// A finite number; out-of-range values are clamped later by the sampler.
fn parse_probability(name: &'static str, value: String) -> Result<f64, ConfigError> {
    match value.trim().parse::<f64>() {
        Ok(probability) if probability.is_finite() => Ok(probability),
        _ => Err(ConfigError::Invalid { name, value }),
    }
}

fn parse_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

fn parse_versions(value: &str) -> Result<Vec<(String, u32)>, ConfigError> {
    parse_list(value)
        .into_iter()
        .map(|pair| {
            let invalid = || ConfigError::Invalid {
                name: "CACHE_VERSIONS",
                value: pair.clone(),
            };
            let (name, version) = pair.split_once('=').ok_or_else(invalid)?;
            let version = version.trim().parse().map_err(|_| invalid())?;
            Ok((name.trim().to_string(), version))
        })
        .collect()
}
