use std::env;
use std::time::Duration;

use config::{Config as ConfigBuilder, ConfigError, Environment, File};
use recipehub_shared::{QueueError, QueueSettings};
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub services: ServicesConfig,
    pub database: DatabaseConfig,
    pub jwt: JwtConfig,
    pub queue: QueueConfig,
    #[serde(default)]
    pub otp: OtpConfig,
    #[serde(default)]
    pub observability: ObservabilityConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub gateway_port: u16,
    pub auth_port: u16,
    pub ingredient_port: u16,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServicesConfig {
    /// Base URL of the auth service, used by every gateway auth route.
    pub auth_base_url: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
}

#[derive(Debug, Deserialize, Clone)]
pub struct JwtConfig {
    pub secret: String,
    pub expiration_minutes: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct QueueConfig {
    /// Full `amqp://` URI. Takes precedence over the separate fields below.
    #[serde(default)]
    pub url: Option<String>,
    pub host: String,
    pub port: u16,
    pub username: String,
    pub password: String,
    pub vhost: String,
    pub connection_attempts: u32,
    pub retry_delay_secs: u64,
    pub socket_timeout_secs: u64,
    pub max_channels: usize,
    pub rpc_timeout_secs: u64,
    pub ocr_queue: String,
    pub email_queue: String,
}

impl QueueConfig {
    pub fn settings(&self) -> Result<QueueSettings, QueueError> {
        let settings = QueueSettings {
            host: self.host.clone(),
            port: self.port,
            username: self.username.clone(),
            password: self.password.clone(),
            vhost: self.vhost.clone(),
            tls: false,
            connection_attempts: self.connection_attempts,
            retry_delay: Duration::from_secs(self.retry_delay_secs),
            socket_timeout: Duration::from_secs(self.socket_timeout_secs),
        };

        match self.url.as_deref() {
            Some(url) => settings.with_uri(url),
            None => Ok(settings),
        }
    }

    pub fn rpc_timeout(&self) -> Duration {
        Duration::from_secs(self.rpc_timeout_secs)
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct OtpConfig {
    #[serde(default = "default_otp_ttl_secs")]
    pub ttl_secs: i64,
}

impl Default for OtpConfig {
    fn default() -> Self {
        Self {
            ttl_secs: default_otp_ttl_secs(),
        }
    }
}

fn default_otp_ttl_secs() -> i64 {
    300
}

#[derive(Debug, Deserialize, Clone)]
pub struct ObservabilityConfig {
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Config {
    /// Load configuration from file and environment variables
    ///
    /// Priority (highest to lowest):
    /// 1. Legacy environment variables (JWT_SECRET, AUTH_BASE_URL, RABBITMQ_*, ...)
    /// 2. Prefixed environment variables (RECIPEHUB__QUEUE__HOST, etc.)
    /// 3. Config file specified by path
    /// 4. Hardcoded defaults
    pub fn load(config_path: Option<String>) -> Result<Self, ConfigError> {
        let mut builder = ConfigBuilder::builder()
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.gateway_port", 8000)?
            .set_default("server.auth_port", 8001)?
            .set_default("server.ingredient_port", 8002)?
            .set_default("services.auth_base_url", "http://localhost:8001")?
            .set_default("database.url", "sqlite:recipe_db.db")?
            .set_default("database.max_connections", 5)?
            .set_default("jwt.expiration_minutes", 30)?
            .set_default("queue.host", "localhost")?
            .set_default("queue.port", 5672)?
            .set_default("queue.username", "guest")?
            .set_default("queue.password", "guest")?
            .set_default("queue.vhost", "/")?
            .set_default("queue.connection_attempts", 3)?
            .set_default("queue.retry_delay_secs", 5)?
            .set_default("queue.socket_timeout_secs", 5)?
            .set_default("queue.max_channels", 16)?
            .set_default("queue.rpc_timeout_secs", 30)?
            .set_default("queue.ocr_queue", "ocr_service")?
            .set_default("queue.email_queue", "email")?;

        let config_file_path = config_path
            .or_else(|| env::var("CONFIG_PATH").ok())
            .unwrap_or_else(|| "config/default.toml".to_string());

        if std::path::Path::new(&config_file_path).exists() {
            builder = builder.add_source(File::with_name(&config_file_path));
        }

        builder = builder.add_source(
            Environment::with_prefix("RECIPEHUB")
                .separator("__")
                .try_parsing(true),
        );

        for (key, value) in legacy_overrides(|name| env::var(name).ok()) {
            builder = builder.set_override(key, value)?;
        }

        builder.build()?.try_deserialize()
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.jwt.secret.len() < 32 {
            return Err("JWT secret must be at least 32 characters long".to_string());
        }
        if self.database.max_connections < 1 {
            return Err("Database max_connections must be at least 1".to_string());
        }
        if self.server.gateway_port == 0
            || self.server.auth_port == 0
            || self.server.ingredient_port == 0
        {
            return Err("Server ports must be greater than 0".to_string());
        }
        if self.queue.max_channels < 1 {
            return Err("Queue max_channels must be at least 1".to_string());
        }
        if self.otp.ttl_secs < 1 {
            return Err("OTP ttl_secs must be at least 1".to_string());
        }
        Ok(())
    }
}

/// Maps the unprefixed variables the services have always read onto config keys.
fn legacy_overrides(lookup: impl Fn(&str) -> Option<String>) -> Vec<(&'static str, String)> {
    let mut overrides = Vec::new();

    if let Some(jwt_secret) = lookup("JWT_SECRET") {
        overrides.push(("jwt.secret", jwt_secret));
    }

    if let Some(auth_base_url) = lookup("AUTH_BASE_URL").or_else(|| lookup("HOST_SERVICE_HOST_URL"))
    {
        overrides.push(("services.auth_base_url", auth_base_url));
    }

    if let Some(database_url) = lookup("DATABASE_URL") {
        overrides.push(("database.url", database_url));
    } else if let Some(schema) = lookup("MYSQL_DB") {
        overrides.push(("database.url", format!("sqlite:{schema}.db")));
    }

    if let Some(rabbitmq_url) = lookup("RABBITMQ_URL") {
        if rabbitmq_url.contains("://") {
            overrides.push(("queue.url", rabbitmq_url));
        } else {
            overrides.push(("queue.host", rabbitmq_url));
        }
    }

    for (name, key) in [
        ("RABBITMQ_HOST", "queue.host"),
        ("RABBITMQ_PORT", "queue.port"),
        ("RABBITMQ_USERNAME", "queue.username"),
        ("RABBITMQ_PASSWORD", "queue.password"),
        ("RABBITMQ_VHOST", "queue.vhost"),
    ] {
        if let Some(value) = lookup(name) {
            overrides.push((key, value));
        }
    }

    overrides
}
