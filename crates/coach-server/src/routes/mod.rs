// Export route modules
pub mod callable;
pub mod health;

use axum::extract::DefaultBodyLimit;
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::configuration::ServerSettings;
use crate::state::AppState;

// Function to configure all routes
pub fn configure(state: AppState, settings: &ServerSettings) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .merge(callable::routes(state))
        .merge(health::routes())
        .layer(DefaultBodyLimit::max(settings.max_body_bytes))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}
