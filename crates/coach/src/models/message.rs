use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::content::ContentPart;
use super::role::Role;

/// Message content is either plain text or an ordered list of parts
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MessageContent {
    Text(String),
    Parts(Vec<ContentPart>),
}

impl MessageContent {
    /// Get the text if this is plain text content
    pub fn as_text(&self) -> Option<&str> {
        match self {
            MessageContent::Text(text) => Some(text),
            MessageContent::Parts(_) => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
/// A chat message as sent by the app
pub struct IncomingMessage {
    pub role: Role,
    pub content: MessageContent,
}

impl IncomingMessage {
    pub fn text<S: Into<String>>(role: Role, text: S) -> Self {
        IncomingMessage {
            role,
            content: MessageContent::Text(text.into()),
        }
    }

    pub fn parts(role: Role, parts: Vec<ContentPart>) -> Self {
        IncomingMessage {
            role,
            content: MessageContent::Parts(parts),
        }
    }

    /// Create a user message with plain text content
    pub fn user<S: Into<String>>(text: S) -> Self {
        Self::text(Role::User, text)
    }

    /// Create a system message with plain text content
    pub fn system<S: Into<String>>(text: S) -> Self {
        Self::text(Role::System, text)
    }

    /// Parse the raw `messages` array of a callable payload.
    ///
    /// Fails on the first element that is not a well formed message; nothing is returned
    /// for the elements before it.
    pub fn from_values(values: &[Value]) -> Result<Vec<Self>> {
        values
            .iter()
            .enumerate()
            .map(|(index, value)| {
                serde_json::from_value(value.clone())
                    .with_context(|| format!("Malformed message at index {}", index))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_from_values_text_and_parts() -> Result<()> {
        let values = vec![
            json!({"role": "system", "content": "You are a coach."}),
            json!({"role": "user", "content": [
                {"type": "text", "text": "What is in this meal?"},
                {"type": "image_url", "image_url": {"url": "https://cdn.example.com/meal.jpg"}}
            ]}),
        ];

        let messages = IncomingMessage::from_values(&values)?;
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0], IncomingMessage::system("You are a coach."));
        assert_eq!(
            messages[1],
            IncomingMessage::parts(
                Role::User,
                vec![
                    ContentPart::text("What is in this meal?"),
                    ContentPart::image_url("https://cdn.example.com/meal.jpg"),
                ]
            )
        );
        assert_eq!(messages[1].content.as_text(), None);
        Ok(())
    }

    #[test]
    fn test_from_values_rejects_whole_list() {
        let values = vec![
            json!({"role": "user", "content": "fine"}),
            json!({"role": "user", "content": [
                {"type": "text", "text": "ok"},
                {"type": "image_url"}
            ]}),
        ];

        let err = IncomingMessage::from_values(&values).unwrap_err();
        assert!(err.to_string().contains("index 1"));
    }

    #[test]
    fn test_from_values_rejects_bad_role_and_content() {
        assert!(IncomingMessage::from_values(&[json!({"role": "tool", "content": "x"})]).is_err());
        assert!(IncomingMessage::from_values(&[json!({"role": "user", "content": 42})]).is_err());
        assert!(IncomingMessage::from_values(&[json!({"role": "user"})]).is_err());
        assert!(IncomingMessage::from_values(&[json!("just a string")]).is_err());
    }

    #[test]
    fn test_from_values_empty() -> Result<()> {
        assert!(IncomingMessage::from_values(&[])?.is_empty());
        Ok(())
    }
}
