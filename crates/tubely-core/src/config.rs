//! Configuration module
//!
//! Everything the service needs (signing secret, asset root, public address, record store)
//! is carried in one explicit [`Config`] value that is passed into setup. Nothing is read
//! from the environment after startup.

use std::env;
use std::path::PathBuf;
use std::str::FromStr;

const SERVER_PORT: u16 = 8091;
const JWT_ISSUER: &str = "tubely-access";
const ASSETS_ROOT: &str = "./assets";
const ASSETS_ROUTE: &str = "assets";
const MAX_UPLOAD_BYTES: usize = 10 << 20;
const MAX_MEMORY_BYTES: usize = 10 << 20;
const DB_MAX_CONNECTIONS: u32 = 10;
const DB_TIMEOUT_SECS: u64 = 30;
const MIN_JWT_SECRET_LEN: usize = 32;

/// Where video records live.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordStoreBackend {
    Postgres,
    Memory,
}

impl FromStr for RecordStoreBackend {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "postgres" | "postgresql" => Ok(RecordStoreBackend::Postgres),
            "memory" => Ok(RecordStoreBackend::Memory),
            other => Err(anyhow::anyhow!(
                "RECORD_STORE must be 'postgres' or 'memory', got '{}'",
                other
            )),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Compact,
    Json,
}

impl FromStr for LogFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "compact" | "pretty" | "text" => Ok(LogFormat::Compact),
            "json" => Ok(LogFormat::Json),
            other => Err(anyhow::anyhow!(
                "LOG_FORMAT must be 'compact' or 'json', got '{}'",
                other
            )),
        }
    }
}

/// Application configuration.
#[derive(Clone, Debug)]
pub struct Config {
    pub server_port: u16,
    pub environment: String,
    pub log_format: LogFormat,
    // Authentication
    pub jwt_secret: String,
    pub jwt_issuer: String,
    // Assets
    pub assets_root: PathBuf,
    /// URL path segment the asset root is served under, e.g. `assets`.
    pub assets_route: String,
    /// Scheme, host and port the assets are reachable at, e.g. `http://localhost:8091`.
    pub public_base_url: String,
    pub max_upload_bytes: usize,
    /// Payload bytes held in memory before spilling to a temporary file.
    pub max_memory_bytes: usize,
    // Record store
    pub record_store: RecordStoreBackend,
    pub database_url: Option<String>,
    pub db_max_connections: u32,
    pub db_timeout_seconds: u64,
}

fn parse_or<T: FromStr>(name: &str, default: T) -> T {
    env::var(name)
        .ok()
        .and_then(|v| v.trim().parse::<T>().ok())
        .unwrap_or(default)
}

impl Config {
    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();

        let server_port = parse_or("PORT", SERVER_PORT);

        let environment = env::var("ENVIRONMENT")
            .or_else(|_| env::var("APP_ENV"))
            .unwrap_or_else(|_| "development".to_string());

        let log_format = match env::var("LOG_FORMAT") {
            Ok(v) => v.parse()?,
            Err(_) => LogFormat::default(),
        };

        let jwt_secret = env::var("JWT_SECRET")
            .map_err(|_| anyhow::anyhow!("JWT_SECRET environment variable must be set"))?;

        let database_url = env::var("DATABASE_URL").ok().filter(|s| !s.is_empty());
        let record_store = match env::var("RECORD_STORE") {
            Ok(v) => v.parse()?,
            Err(_) if database_url.is_some() => RecordStoreBackend::Postgres,
            Err(_) => RecordStoreBackend::Memory,
        };

        let public_base_url = env::var("PUBLIC_BASE_URL")
            .unwrap_or_else(|_| format!("http://localhost:{}", server_port));

        Ok(Config {
            server_port,
            environment,
            log_format,
            jwt_secret,
            jwt_issuer: env::var("JWT_ISSUER").unwrap_or_else(|_| JWT_ISSUER.to_string()),
            assets_root: env::var("ASSETS_ROOT")
                .unwrap_or_else(|_| ASSETS_ROOT.to_string())
                .into(),
            assets_route: env::var("ASSETS_ROUTE").unwrap_or_else(|_| ASSETS_ROUTE.to_string()),
            public_base_url,
            max_upload_bytes: parse_or("MAX_UPLOAD_BYTES", MAX_UPLOAD_BYTES),
            max_memory_bytes: parse_or("MAX_MEMORY_BYTES", MAX_MEMORY_BYTES),
            record_store,
            database_url,
            db_max_connections: parse_or("DB_MAX_CONNECTIONS", DB_MAX_CONNECTIONS),
            db_timeout_seconds: parse_or("DB_TIMEOUT_SECONDS", DB_TIMEOUT_SECS),
        })
    }

    /// Fail fast on configuration that would break requests later.
    pub fn validate(&self) -> Result<(), anyhow::Error> {
        if self.jwt_secret.len() < MIN_JWT_SECRET_LEN {
            return Err(anyhow::anyhow!(
                "JWT_SECRET must be at least {} characters long",
                MIN_JWT_SECRET_LEN
            ));
        }

        let route = self.assets_route.trim_matches('/');
        if route.is_empty() || route.contains("..") || route.contains('/') {
            return Err(anyhow::anyhow!(
                "ASSETS_ROUTE must be a single path segment, got '{}'",
                self.assets_route
            ));
        }

        if !(self.public_base_url.starts_with("http://")
            || self.public_base_url.starts_with("https://"))
        {
            return Err(anyhow::anyhow!(
                "PUBLIC_BASE_URL must start with http:// or https://"
            ));
        }

        if self.max_upload_bytes == 0 {
            return Err(anyhow::anyhow!("MAX_UPLOAD_BYTES cannot be 0"));
        }

        if self.record_store == RecordStoreBackend::Postgres {
            match self.database_url.as_deref() {
                Some(url) if url.starts_with("postgres://") || url.starts_with("postgresql://") => {}
                Some(_) => {
                    return Err(anyhow::anyhow!(
                        "DATABASE_URL must be a valid PostgreSQL connection string"
                    ))
                }
                None => {
                    return Err(anyhow::anyhow!(
                        "DATABASE_URL must be set when RECORD_STORE=postgres"
                    ))
                }
            }
            if self.db_max_connections == 0 {
                return Err(anyhow::anyhow!("Database max connections cannot be 0"));
            }
        }

        Ok(())
    }

    pub fn is_production(&self) -> bool {
        let env = self.environment.to_lowercase();
        env == "production" || env == "prod"
    }

    /// Public URL prefix every asset reference starts with.
    pub fn assets_base_url(&self) -> String {
        format!(
            "{}/{}",
            self.public_base_url.trim_end_matches('/'),
            self.assets_route.trim_matches('/')
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Config {
        Config {
            server_port: 8091,
            environment: "test".to_string(),
            log_format: LogFormat::Compact,
            jwt_secret: "0123456789abcdef0123456789abcdef".to_string(),
            jwt_issuer: JWT_ISSUER.to_string(),
            assets_root: PathBuf::from("./assets"),
            assets_route: "assets".to_string(),
            public_base_url: "http://localhost:8091".to_string(),
            max_upload_bytes: MAX_UPLOAD_BYTES,
            max_memory_bytes: MAX_MEMORY_BYTES,
            record_store: RecordStoreBackend::Memory,
            database_url: None,
            db_max_connections: DB_MAX_CONNECTIONS,
            db_timeout_seconds: DB_TIMEOUT_SECS,
        }
    }

    #[test]
    fn sample_config_is_valid() {
        assert!(sample().validate().is_ok());
    }

    #[test]
    fn short_secret_is_rejected() {
        let mut config = sample();
        config.jwt_secret = "short".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn postgres_requires_database_url() {
        let mut config = sample();
        config.record_store = RecordStoreBackend::Postgres;
        assert!(config.validate().is_err());

        config.database_url = Some("mysql://localhost/tubely".to_string());
        assert!(config.validate().is_err());

        config.database_url = Some("postgres://localhost/tubely".to_string());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn assets_route_must_be_one_segment() {
        let mut config = sample();
        config.assets_route = "static/assets".to_string();
        assert!(config.validate().is_err());
        config.assets_route = "/".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn assets_base_url_joins_without_double_slashes() {
        let mut config = sample();
        config.public_base_url = "http://localhost:8091/".to_string();
        config.assets_route = "/assets/".to_string();
        assert_eq!(config.assets_base_url(), "http://localhost:8091/assets");
    }

    #[test]
    fn record_store_parses() {
        assert_eq!(
            "Postgres".parse::<RecordStoreBackend>().unwrap(),
            RecordStoreBackend::Postgres
        );
        assert_eq!(
            "memory".parse::<RecordStoreBackend>().unwrap(),
            RecordStoreBackend::Memory
        );
        assert!("sqlite".parse::<RecordStoreBackend>().is_err());
    }
}
