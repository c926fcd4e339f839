//! Sizing of the response budget.
//!
//! A request that asks for a machine readable workout or meal plan needs far more output
//! tokens than a conversational turn. The decision is a substring heuristic over the plain
//! text messages only; messages with mixed text/image content are never scanned, even when
//! one of their text parts would match.
use crate::models::message::IncomingMessage;

const PLAN_PHRASES: [&str; 3] = ["workout plan", "meal plan", "dietary plan"];
const FORMAT_MARKER: &str = "JSON";

pub const STRUCTURED_MAX_TOKENS: u32 = 4000;
pub const CONVERSATIONAL_MAX_TOKENS: u32 = 1000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestKind {
    /// Asks for a workout or meal plan as JSON
    StructuredPlan,
    Conversational,
}

impl RequestKind {
    pub fn max_tokens(&self) -> u32 {
        match self {
            RequestKind::StructuredPlan => STRUCTURED_MAX_TOKENS,
            RequestKind::Conversational => CONVERSATIONAL_MAX_TOKENS,
        }
    }
}

pub fn classify(messages: &[IncomingMessage]) -> RequestKind {
    let structured = messages
        .iter()
        .filter_map(|message| message.content.as_text())
        .any(is_plan_request_text);

    if structured {
        RequestKind::StructuredPlan
    } else {
        RequestKind::Conversational
    }
}

fn is_plan_request_text(text: &str) -> bool {
    text.contains(FORMAT_MARKER) && PLAN_PHRASES.iter().any(|phrase| text.contains(phrase))
}
