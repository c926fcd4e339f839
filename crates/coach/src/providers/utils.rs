use anyhow::{anyhow, Result};
use serde_json::Value;

use super::base::{Completion, Usage};
use crate::models::content::ContentPart;
use crate::models::message::{IncomingMessage, MessageContent};
use crate::models::request::{OpenAiContent, OpenAiContentPart, OpenAiImageUrl, OpenAiMessage};

/// Convert app messages to OpenAI's API message specification.
///
/// The mapping is one to one: order of messages and of parts within a message is preserved.
pub fn messages_to_openai_spec(messages: &[IncomingMessage]) -> Vec<OpenAiMessage> {
    messages
        .iter()
        .map(|message| OpenAiMessage {
            role: message.role,
            content: match &message.content {
                MessageContent::Text(text) => OpenAiContent::Text(text.clone()),
                MessageContent::Parts(parts) => {
                    OpenAiContent::Parts(parts.iter().map(convert_part).collect())
                }
            },
        })
        .collect()
}

fn convert_part(part: &ContentPart) -> OpenAiContentPart {
    match part {
        ContentPart::Text { text } => OpenAiContentPart::Text { text: text.clone() },
        ContentPart::ImageUrl { image_url } => OpenAiContentPart::ImageUrl {
            image_url: OpenAiImageUrl {
                url: image_url.url.clone(),
            },
        },
    }
}

/// Convert OpenAI's API response to a completion
pub fn openai_response_to_completion(response: &Value) -> Result<Completion> {
    if let Some(error) = response.get("error") {
        return Err(anyhow!("OpenAI API error: {}", error));
    }

    let choices = response
        .get("choices")
        .and_then(|choices| choices.as_array())
        .ok_or_else(|| anyhow!("No choices in response"))?;

    let text = choices
        .first()
        .and_then(|choice| choice.get("message"))
        .and_then(|message| message.get("content"))
        .and_then(|content| content.as_str())
        .map(String::from);

    Ok(Completion {
        text,
        usage: get_usage(response),
    })
}

/// Token usage of a response. Missing usage data is not an error.
pub fn get_usage(data: &Value) -> Usage {
    let Some(usage) = data.get("usage") else {
        return Usage::default();
    };

    let input_tokens = token_count(usage, "prompt_tokens");
    let output_tokens = token_count(usage, "completion_tokens");
    let total_tokens =
        token_count(usage, "total_tokens").or_else(|| match (input_tokens, output_tokens) {
            (Some(input), Some(output)) => input.checked_add(output),
            _ => None,
        });

    Usage::new(input_tokens, output_tokens, total_tokens)
}

/// A token count that does not fit the usage fields is treated as unreported
fn token_count(usage: &Value, field: &str) -> Option<i32> {
    usage
        .get(field)
        .and_then(|v| v.as_i64())
        .and_then(|v| i32::try_from(v).ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::role::Role;
    use serde_json::json;

    #[test]
    fn test_messages_to_openai_spec_text() {
        let messages = vec![
            IncomingMessage::system("You are a strength coach."),
            IncomingMessage::user("How many rest days?"),
            IncomingMessage::text(Role::Assistant, "Two per week."),
            IncomingMessage::user("And for cardio?"),
        ];

        let spec = messages_to_openai_spec(&messages);

        assert_eq!(spec.len(), messages.len());
        for (original, converted) in messages.iter().zip(&spec) {
            assert_eq!(converted.role, original.role);
            assert_eq!(
                converted.content,
                OpenAiContent::Text(original.content.as_text().unwrap().to_string())
            );
        }
    }

    #[test]
    fn test_messages_to_openai_spec_parts() {
        let messages = vec![IncomingMessage::parts(
            Role::User,
            vec![ContentPart::text("a"), ContentPart::image_url("b")],
        )];

        let spec = messages_to_openai_spec(&messages);
        let value = serde_json::to_value(&spec).unwrap();

        assert_eq!(
            value,
            json!([{
                "role": "user",
                "content": [
                    {"type": "text", "text": "a"},
                    {"type": "image_url", "image_url": {"url": "b"}}
                ]
            }])
        );
    }

    #[test]
    fn test_messages_to_openai_spec_keeps_part_order() {
        let parts = vec![
            ContentPart::image_url("first"),
            ContentPart::text("second"),
            ContentPart::image_url("third"),
            ContentPart::text("second"),
        ];
        let spec = messages_to_openai_spec(&[IncomingMessage::parts(Role::User, parts)]);

        let OpenAiContent::Parts(converted) = &spec[0].content else {
            panic!("Expected parts content");
        };
        assert_eq!(converted.len(), 4);
        assert!(matches!(&converted[0], OpenAiContentPart::ImageUrl { image_url } if image_url.url == "first"));
        assert!(matches!(&converted[1], OpenAiContentPart::Text { text } if text == "second"));
        assert!(matches!(&converted[2], OpenAiContentPart::ImageUrl { image_url } if image_url.url == "third"));
        assert!(matches!(&converted[3], OpenAiContentPart::Text { text } if text == "second"));
    }

    #[test]
    fn test_openai_response_to_completion_text() -> Result<()> {
        let response = json!({
            "choices": [{
                "index": 0,
                "message": {"role": "assistant", "content": "Eat more protein."},
                "finish_reason": "stop"
            }],
            "usage": {"prompt_tokens": 10, "completion_tokens": 25, "total_tokens": 35}
        });

        let completion = openai_response_to_completion(&response)?;
        assert_eq!(completion.text.as_deref(), Some("Eat more protein."));
        assert_eq!(completion.usage, Usage::new(Some(10), Some(25), Some(35)));
        Ok(())
    }

    #[test]
    fn test_openai_response_to_completion_null_content() -> Result<()> {
        let response = json!({
            "choices": [{"message": {"role": "assistant", "content": null}}]
        });

        let completion = openai_response_to_completion(&response)?;
        assert_eq!(completion.text, None);
        assert_eq!(completion.usage, Usage::default());
        Ok(())
    }

    #[test]
    fn test_openai_response_to_completion_empty_choices() -> Result<()> {
        let completion = openai_response_to_completion(&json!({"choices": []}))?;
        assert_eq!(completion.text, None);
        Ok(())
    }

    #[test]
    fn test_openai_response_to_completion_malformed() {
        assert!(openai_response_to_completion(&json!({"object": "chat.completion"})).is_err());
    }

    #[test]
    fn test_openai_response_to_completion_error_body() {
        let response = json!({
            "error": {"code": "context_length_exceeded", "message": "This message is too long"}
        });
        let err = openai_response_to_completion(&response).unwrap_err();
        assert!(err.to_string().starts_with("OpenAI API error"));
        assert!(err.to_string().contains("This message is too long"));
    }

    #[test]
    fn test_get_usage_computes_total() {
        let usage = get_usage(&json!({"usage": {"prompt_tokens": 3, "completion_tokens": 4}}));
        assert_eq!(usage.total_tokens, Some(7));
    }

    #[test]
    fn test_get_usage_out_of_range_counts() {
        let usage = get_usage(&json!({"usage": {
            "prompt_tokens": 5_000_000_000i64,
            "completion_tokens": 4,
            "total_tokens": -1
        }}));
        assert_eq!(usage.input_tokens, None);
        assert_eq!(usage.output_tokens, Some(4));
        assert_eq!(usage.total_tokens, Some(-1));

        let usage = get_usage(&json!({"usage": {
            "prompt_tokens": i32::MAX,
            "completion_tokens": 1
        }}));
        assert_eq!(usage.input_tokens, Some(i32::MAX));
        assert_eq!(usage.total_tokens, None);
    }
}
