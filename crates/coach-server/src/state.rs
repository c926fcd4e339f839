use std::sync::Arc;
use std::time::Duration;

use coach::coach::AiCoach;

use crate::auth::IdTokenVerifier;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub coach: Arc<AiCoach>,
    pub verifier: Arc<dyn IdTokenVerifier>,
    /// Wall clock ceiling for one invocation
    pub timeout: Duration,
}

impl AppState {
    pub fn new(coach: AiCoach, verifier: Arc<dyn IdTokenVerifier>, timeout: Duration) -> Self {
        Self {
            coach: Arc::new(coach),
            verifier,
            timeout,
        }
    }
}
