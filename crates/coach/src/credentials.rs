use std::env;
use std::fmt;

#[cfg(test)]
use mockall::automock;

pub const OPENAI_API_KEY_VAR: &str = "OPENAI_API_KEY";

/// An upstream API key. `Debug` is redacted so the value never ends up in logs.
#[derive(Clone, PartialEq, Eq)]
pub struct ApiKey(String);

impl ApiKey {
    pub fn new<S: Into<String>>(key: S) -> Self {
        Self(key.into())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ApiKey(***)")
    }
}

/// Where the coach gets its upstream credential from.
///
/// Looked up on every invocation, so a secret injected or rotated after startup is picked up.
#[cfg_attr(test, automock)]
pub trait CredentialSource: Send + Sync {
    fn api_key(&self) -> Option<ApiKey>;

    fn is_configured(&self) -> bool {
        self.api_key().is_some()
    }
}

/// Reads the key from a process environment variable
#[derive(Debug, Clone)]
pub struct EnvCredentials {
    var: String,
}

impl EnvCredentials {
    pub fn new<S: Into<String>>(var: S) -> Self {
        Self { var: var.into() }
    }
}

impl Default for EnvCredentials {
    fn default() -> Self {
        Self::new(OPENAI_API_KEY_VAR)
    }
}

impl CredentialSource for EnvCredentials {
    fn api_key(&self) -> Option<ApiKey> {
        env::var(&self.var)
            .ok()
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty())
            .map(ApiKey)
    }
}

/// A fixed key, or none at all
#[derive(Debug, Clone, Default)]
pub struct StaticCredentials(Option<ApiKey>);

impl StaticCredentials {
    pub fn new<S: Into<String>>(key: S) -> Self {
        Self(Some(ApiKey::new(key)))
    }

    pub fn missing() -> Self {
        Self(None)
    }
}

impl CredentialSource for StaticCredentials {
    fn api_key(&self) -> Option<ApiKey> {
        self.0.clone()
    }
}
