//! The AI coach invocation pipeline.
//!
//! Every invocation walks the same states in order and stops at the first failure:
//! validating, translating, classifying, invoking, responding. Nothing is shared between
//! invocations and nothing is retried.
use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, error, info};

use crate::classifier::classify;
use crate::credentials::CredentialSource;
use crate::errors::{CallableError, CallableResult};
use crate::models::caller::CallerIdentity;
use crate::models::message::IncomingMessage;
use crate::models::reply::ChatReply;
use crate::providers::base::Provider;
use crate::providers::utils::messages_to_openai_spec;

pub const COACH_TEMPERATURE: f64 = 0.7;

pub struct AiCoach {
    provider: Arc<dyn Provider>,
    credentials: Arc<dyn CredentialSource>,
}

impl AiCoach {
    pub fn new(provider: Arc<dyn Provider>, credentials: Arc<dyn CredentialSource>) -> Self {
        Self {
            provider,
            credentials,
        }
    }

    /// Handle one callable invocation.
    ///
    /// `data` is the raw callable payload, expected to hold a `messages` array.
    /// Failures other than the typed caller errors are logged here and come back as
    /// `CallableError::Internal`, whose message carries none of the underlying detail.
    pub async fn handle(
        &self,
        caller: Option<&CallerIdentity>,
        data: &Value,
    ) -> CallableResult<ChatReply> {
        let result = self.run(caller, data).await;
        if let Err(CallableError::Internal(source)) = &result {
            error!(
                uid = caller.map(|c| c.uid.as_str()).unwrap_or_default(),
                error = ?source,
                "AI coach request failed"
            );
        }
        result
    }

    async fn run(&self, caller: Option<&CallerIdentity>, data: &Value) -> CallableResult<ChatReply> {
        let caller = caller.ok_or(CallableError::Unauthenticated)?;

        let raw_messages = data
            .get("messages")
            .and_then(Value::as_array)
            .ok_or(CallableError::InvalidArgument)?;

        let api_key = self.credentials.api_key();
        info!(
            uid = %caller.uid,
            messages = raw_messages.len(),
            api_key_configured = api_key.is_some(),
            "AI coach request"
        );

        let messages = IncomingMessage::from_values(raw_messages).map_err(CallableError::internal)?;
        let openai_messages = messages_to_openai_spec(&messages);

        let kind = classify(&messages);
        let max_tokens = kind.max_tokens();
        debug!(?kind, max_tokens, "Classified request");

        let api_key = api_key.ok_or(CallableError::FailedPrecondition)?;

        let completion = self
            .provider
            .complete(&api_key, openai_messages, max_tokens)
            .await
            .map_err(CallableError::internal)?;

        info!(
            input_tokens = ?completion.usage.input_tokens,
            output_tokens = ?completion.usage.output_tokens,
            "AI coach reply generated"
        );

        Ok(ChatReply::from_completion(completion.text))
    }
}
