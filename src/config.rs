use crate::error::{Error, Result};
use dotenvy::dotenv;
use std::env;
use std::net::SocketAddr;
use std::time::Duration;

pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_ENVIRONMENT: &str = "development";
pub const DEFAULT_DATABASE: &str = "testdb";
pub const PRODUCTION: &str = "production";

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub environment: String,
    pub database: DatabaseConfig,
    pub diagnostics_enabled: bool,
    pub trust_proxy: bool,
}

#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub uri: String,
    pub database_name: String,
    pub connect_timeout: Option<Duration>,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenv().ok();
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Builds the configuration from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());

        let uri = get("MONGODB_URI").ok_or_else(|| {
            Error::Config("Missing environment variable: MONGODB_URI".to_string())
        })?;

        let connect_timeout = get("MONGODB_CONNECT_TIMEOUT_SECS")
            .map(|raw| parse_value::<u64>("MONGODB_CONNECT_TIMEOUT_SECS", &raw))
            .transpose()?
            .map(Duration::from_secs);

        Ok(Self {
            host: get("HOST").unwrap_or_else(|| DEFAULT_HOST.to_string()),
            port: get("PORT")
                .map(|raw| parse_value("PORT", &raw))
                .transpose()?
                .unwrap_or(DEFAULT_PORT),
            environment: get("APP_ENV")
                .or_else(|| get("NODE_ENV"))
                .unwrap_or_else(|| DEFAULT_ENVIRONMENT.to_string()),
            database: DatabaseConfig {
                uri,
                database_name: get("MONGODB_DATABASE")
                    .unwrap_or_else(|| DEFAULT_DATABASE.to_string()),
                connect_timeout,
            },
            diagnostics_enabled: get("ENABLE_DIAGNOSTICS")
                .map(|raw| parse_flag("ENABLE_DIAGNOSTICS", &raw))
                .transpose()?
                .unwrap_or(true),
            trust_proxy: get("TRUST_PROXY")
                .map(|raw| parse_flag("TRUST_PROXY", &raw))
                .transpose()?
                .unwrap_or(false),
        })
    }

    pub fn is_production(&self) -> bool {
        self.environment == PRODUCTION
    }

    /// Resolves `HOST` (an IP literal or a host name such as `localhost`)
    /// to the first address the resolver returns.
    pub async fn resolve_addr(&self) -> Result<SocketAddr> {
        let host = self.host.trim();
        tokio::net::lookup_host((host, self.port))
            .await
            .map_err(|e| Error::Config(format!("Invalid value for HOST: {}: {}", host, e)))?
            .next()
            .ok_or_else(|| {
                Error::Config(format!("Invalid value for HOST: {} has no address", host))
            })
    }
}

fn parse_value<T>(name: &str, raw: &str) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    raw.trim()
        .parse()
        .map_err(|e| Error::Config(format!("Invalid value for {}: {}", name, e)))
}

fn parse_flag(name: &str, raw: &str) -> Result<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => Err(Error::Config(format!(
            "Invalid value for {}: expected a boolean, got {:?}",
            name, other
        ))),
    }
}
