//! These models represent the objects passed through the AI coach
//!
//! There are two wire formats we need to interact with:
//! - callable payload messages, sent from the mobile app to the coach
//! - openai chat completion messages, sent from the coach to the LLM
//!
//! The two overlap almost entirely, but we keep separate types for each side so that
//! the translation between them is an explicit, exhaustive mapping.
pub mod caller;
pub mod content;
pub mod message;
pub mod reply;
pub mod request;
pub mod role;
