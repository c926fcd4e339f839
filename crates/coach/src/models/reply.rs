use serde::{Deserialize, Serialize};

/// Returned when the model produced no usable text
pub const FALLBACK_REPLY: &str = "I couldn't generate a response. Try again.";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatReply {
    pub reply: String,
}

impl ChatReply {
    /// Build a reply from the model output, substituting the fallback for missing or empty text
    pub fn from_completion(text: Option<String>) -> Self {
        let reply = text
            .filter(|text| !text.is_empty())
            .unwrap_or_else(|| FALLBACK_REPLY.to_string());
        Self { reply }
    }
}
