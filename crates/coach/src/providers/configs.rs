pub const OPENAI_HOST: &str = "https://api.openai.com";
pub const OPENAI_MODEL: &str = "gpt-4o-mini";
pub const OPENAI_TIMEOUT_SECS: u64 = 60;

#[derive(Debug, Clone)]
pub struct OpenAiProviderConfig {
    pub host: String,
    pub model: String,
    pub temperature: f64,
    pub timeout_secs: u64,
}

impl OpenAiProviderConfig {
    pub fn new<S: Into<String>, M: Into<String>>(host: S, model: M, temperature: f64) -> Self {
        Self {
            host: host.into(),
            model: model.into(),
            temperature,
            timeout_secs: OPENAI_TIMEOUT_SECS,
        }
    }
}
