mod auth;
mod configuration;
mod error;
mod logging;
mod routes;
mod state;

use std::sync::Arc;
use std::time::Duration;

use coach::coach::AiCoach;
use coach::credentials::{CredentialSource, EnvCredentials};
use coach::providers::openai::OpenAiProvider;
use tracing::{info, warn};

use crate::auth::{DisabledVerifier, FirebaseVerifier, IdTokenVerifier};
use crate::configuration::Settings;
use crate::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    logging::init();

    let settings = Settings::new()?;
    let timeout_secs = settings.server.timeout_secs;

    let provider = OpenAiProvider::new(settings.provider.into_config(timeout_secs))?;
    info!(model = provider.model(), "Using OpenAI provider");

    // The key itself is read again on every invocation
    let credentials = EnvCredentials::default();
    if !credentials.is_configured() {
        warn!("OPENAI_API_KEY is not set, AI coach requests will be rejected until it is");
    }

    let verifier: Arc<dyn IdTokenVerifier> = match settings.auth.project_id {
        Some(project_id) => {
            info!(project_id = %project_id, "Verifying Firebase ID tokens");
            Arc::new(FirebaseVerifier::new(project_id, settings.auth.jwks_url))
        }
        None => {
            warn!("COACH_AUTH__PROJECT_ID is not set, every AI coach request will be unauthenticated");
            Arc::new(DisabledVerifier)
        }
    };

    let coach = AiCoach::new(Arc::new(provider), Arc::new(credentials));
    let state = AppState::new(coach, verifier, Duration::from_secs(timeout_secs));
    let app = routes::configure(state, &settings.server);

    let listener = tokio::net::TcpListener::bind(settings.server.socket_addr()?).await?;
    info!("listening on {}", listener.local_addr()?);

    axum::serve(listener, app).await?;
    Ok(())
}
