use crate::auth::DEFAULT_JWKS_URL;
use crate::error::{to_env_var, ConfigError};
use coach::coach::COACH_TEMPERATURE;
use coach::providers::configs::{OpenAiProviderConfig, OPENAI_HOST, OPENAI_MODEL};
use config::{Config, Environment, File, FileFormat};
use serde::Deserialize;
use std::net::SocketAddr;

/// Optional settings file, read from the working directory. Environment variables win.
pub const CONFIG_FILE: &str = "coach.toml";

#[derive(Debug, Deserialize)]
pub struct ServerSettings {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    /// Wall clock ceiling for one invocation
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_max_body_bytes")]
    pub max_body_bytes: usize,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            timeout_secs: default_timeout_secs(),
            max_body_bytes: default_max_body_bytes(),
        }
    }
}

impl ServerSettings {
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        let addr = format!("{}:{}", self.host, self.port);
        addr.parse().map_err(|e: std::net::AddrParseError| ConfigError::InvalidAddress {
            addr: addr.clone(),
            reason: e.to_string(),
        })
    }
}

#[derive(Debug, Deserialize)]
pub struct ProviderSettings {
    #[serde(default = "default_openai_host")]
    pub host: String,
    #[serde(default = "default_model")]
    pub model: String,
}

impl Default for ProviderSettings {
    fn default() -> Self {
        Self {
            host: default_openai_host(),
            model: default_model(),
        }
    }
}

impl ProviderSettings {
    /// Convert to the coach provider config. Temperature is not configurable.
    pub fn into_config(self, timeout_secs: u64) -> OpenAiProviderConfig {
        OpenAiProviderConfig {
            host: self.host,
            model: self.model,
            temperature: COACH_TEMPERATURE,
            timeout_secs,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct AuthSettings {
    #[serde(default)]
    pub project_id: Option<String>,
    #[serde(default = "default_jwks_url")]
    pub jwks_url: String,
}

impl Default for AuthSettings {
    fn default() -> Self {
        Self {
            project_id: None,
            jwks_url: default_jwks_url(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub server: ServerSettings,
    #[serde(default)]
    pub provider: ProviderSettings,
    #[serde(default)]
    pub auth: AuthSettings,
}

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        Self::load_and_validate(CONFIG_FILE)
    }

    fn load_and_validate(config_file: &str) -> Result<Self, ConfigError> {
        let config = Config::builder()
            // Server defaults
            .set_default("server.host", default_host())?
            .set_default("server.port", default_port())?
            .set_default("server.timeout_secs", default_timeout_secs())?
            .set_default("server.max_body_bytes", default_max_body_bytes() as u64)?
            // Provider defaults
            .set_default("provider.host", default_openai_host())?
            .set_default("provider.model", default_model())?
            .set_default("auth.jwks_url", default_jwks_url())?
            // Layer on the settings file, if present
            .add_source(File::new(config_file, FileFormat::Toml).required(false))
            // Layer on the environment variables
            .add_source(
                Environment::with_prefix("COACH")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let result: Result<Self, config::ConfigError> = config.try_deserialize();

        result.map_err(|err| {
            tracing::debug!("Configuration error: {:?}", &err);
            match invalid_field(&err) {
                Some(field) => ConfigError::InvalidEnvVar {
                    env_var: to_env_var(&field),
                    reason: err.to_string(),
                },
                None => ConfigError::Other(err),
            }
        })
    }
}

/// The field path of a type error, e.g. `server.port` for a non numeric port
fn invalid_field(err: &config::ConfigError) -> Option<String> {
    match err {
        config::ConfigError::Type { key: Some(key), .. } => Some(key.clone()),
        config::ConfigError::NotFound(key) => Some(key.clone()),
        _ => None,
    }
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_timeout_secs() -> u64 {
    60
}

fn default_max_body_bytes() -> usize {
    10 * 1024 * 1024
}

fn default_model() -> String {
    OPENAI_MODEL.to_string()
}

fn default_openai_host() -> String {
    OPENAI_HOST.to_string()
}

fn default_jwks_url() -> String {
    DEFAULT_JWKS_URL.to_string()
}
