use std::env;
use std::time::Duration;

use auth::TokenConfig;
use config::Config as ConfigBuilder;
use config::ConfigError;
use config::Environment;
use config::File;
use secrecy::ExposeSecret;
use secrecy::Secret;
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub database: DatabaseConfig,
    pub redis: RedisConfig,
    pub server: ServerConfig,
    pub jwt: JwtConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

#[derive(Debug, Deserialize, Clone)]
pub struct RedisConfig {
    pub url: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub http_port: u16,
    /// Deadline for each store, ledger and hashing call
    #[serde(default = "default_operation_timeout_ms")]
    pub operation_timeout_ms: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct JwtConfig {
    pub secret: Secret<String>,
    pub ttl_hours: i64,
}

fn default_max_connections() -> u32 {
    5
}

fn default_operation_timeout_ms() -> u64 {
    5_000
}

impl ServerConfig {
    pub fn operation_timeout(&self) -> Duration {
        Duration::from_millis(self.operation_timeout_ms)
    }
}

impl JwtConfig {
    /// Build the immutable token settings handed to the issuer.
    pub fn token_config(&self) -> Result<TokenConfig, ConfigError> {
        let ttl = chrono::Duration::try_hours(self.ttl_hours)
            .ok_or_else(|| ConfigError::Message("jwt.ttl_hours out of range".to_string()))?;

        TokenConfig::new(self.secret.expose_secret().as_bytes(), ttl)
            .map_err(|e| ConfigError::Message(format!("jwt: {}", e)))
    }
}

impl Config {
    /// Load configuration from files with environment variable overrides
    ///
    /// Priority (highest to lowest):
    /// 1. Environment variables (JWT__SECRET, DATABASE__URL, etc.)
    /// 2. Environment-specific config file (config/{environment}.toml)
    /// 3. Default config file (config/default.toml)
    pub fn load() -> Result<Self, ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let configuration = ConfigBuilder::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", run_mode)).required(false))
            // Example: JWT__TTL_HOURS=12 overrides jwt.ttl_hours
            .add_source(Environment::default().separator("__"))
            .build()?;

        let config: Config = configuration.try_deserialize()?;
        config.validate()?;

        Ok(config)
    }

    /// Reject settings the service cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.jwt.token_config()?;

        if self.server.operation_timeout_ms == 0 {
            return Err(ConfigError::Message(
                "server.operation_timeout_ms must be positive".to_string(),
            ));
        }

        Ok(())
    }
}
