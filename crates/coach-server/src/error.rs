use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid value for environment variable {env_var}: {reason}")]
    InvalidEnvVar { env_var: String, reason: String },

    #[error("Invalid server address {addr}: {reason}")]
    InvalidAddress { addr: String, reason: String },

    #[error("Configuration error: {0}")]
    Other(#[from] config::ConfigError),
}

/// Map a configuration field path such as `server.port` to the variable that sets it
pub fn to_env_var(field: &str) -> String {
    format!("COACH_{}", field.replace('.', "__").to_uppercase())
}
