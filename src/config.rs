//! Configuration management for the book library server

use config::{builder::DefaultState, Config, ConfigBuilder, ConfigError, Environment, File};
use serde::Deserialize;
use std::env;
use std::time::Duration;

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Hold the listener back until the first successful store connection
    pub wait_for_store: bool,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct MongoConfig {
    pub host: String,
    pub port: u16,
    pub database: String,
    pub username: Option<String>,
    pub password: Option<String>,
    /// Fixed delay between two connection attempts
    pub retry_delay_secs: u64,
    pub server_selection_timeout_secs: u64,
    pub connect_timeout_secs: u64,
}

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct CorsConfig {
    /// Allowed origins; empty or `*` allows any origin
    pub allowed_origins: Vec<String>,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub format: String,
}

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub mongo: MongoConfig,
    pub cors: CorsConfig,
    pub logging: LoggingConfig,
}

/// Legacy environment variables and the keys they override
const ENV_OVERRIDES: &[(&str, &str)] = &[
    ("MONGO_HOST", "mongo.host"),
    ("MONGO_PORT", "mongo.port"),
    ("MONGO_DB", "mongo.database"),
    ("MONGO_USER", "mongo.username"),
    ("MONGO_PASS", "mongo.password"),
    ("PORT", "server.port"),
];

impl AppConfig {
    /// Load configuration from files and environment variables
    pub fn load() -> Result<Self, ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        let builder = Config::builder()
            // Optional base file, built-in defaults apply when absent
            .add_source(File::with_name("config/default").required(false))
            // Layer on the environment-specific file
            .add_source(File::with_name(&format!("config/{}", run_mode)).required(false))
            // Add environment variables (BOOKS__SERVER__PORT, BOOKS__MONGO__HOST, ...)
            .add_source(
                Environment::with_prefix("BOOKS")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            );

        Self::apply_env_overrides(builder, |name| env::var(name).ok())?
            .build()?
            .try_deserialize()
    }

    /// Apply the `MONGO_*` / `PORT` variables on top of every other source.
    fn apply_env_overrides<F>(
        mut builder: ConfigBuilder<DefaultState>,
        lookup: F,
    ) -> Result<ConfigBuilder<DefaultState>, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        for (var, key) in ENV_OVERRIDES {
            let value = lookup(var).filter(|v| !v.is_empty());
            builder = builder.set_override_option(*key, value)?;
        }
        Ok(builder)
    }
}

impl MongoConfig {
    /// Build the connection URI.
    ///
    /// Credentials are only embedded when both username and password are set,
    /// and then authenticate against the `admin` database.
    pub fn uri(&self) -> String {
        match self.credentials() {
            Some((user, pass)) => format!(
                "mongodb://{}:{}@{}:{}/{}?authSource=admin",
                encode_userinfo(user),
                encode_userinfo(pass),
                self.host,
                self.port,
                self.database
            ),
            None => format!("mongodb://{}:{}/{}", self.host, self.port, self.database),
        }
    }

    /// URI with the password masked, for logs
    pub fn redacted_uri(&self) -> String {
        match self.credentials() {
            Some((user, _)) => format!(
                "mongodb://{}:****@{}:{}/{}?authSource=admin",
                encode_userinfo(user),
                self.host,
                self.port,
                self.database
            ),
            None => self.uri(),
        }
    }

    pub fn retry_delay(&self) -> Duration {
        Duration::from_secs(self.retry_delay_secs)
    }

    fn credentials(&self) -> Option<(&str, &str)> {
        match (self.username.as_deref(), self.password.as_deref()) {
            (Some(user), Some(pass)) if !user.is_empty() => Some((user, pass)),
            _ => None,
        }
    }
}

/// Percent-encode the characters that may not appear raw in URI userinfo.
fn encode_userinfo(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for byte in s.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                out.push(byte as char)
            }
            _ => out.push_str(&format!("%{:02X}", byte)),
        }
    }
    out
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
            wait_for_store: false,
        }
    }
}

impl Default for MongoConfig {
    fn default() -> Self {
        Self {
            host: "mongodb".to_string(),
            port: 27017,
            database: "bookLibrary".to_string(),
            username: None,
            password: None,
            retry_delay_secs: 5,
            server_selection_timeout_secs: 3,
            connect_timeout_secs: 3,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}
