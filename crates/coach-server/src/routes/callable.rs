use crate::auth::caller_from_headers;
use crate::state::AppState;
use axum::{
    body::Bytes,
    extract::{rejection::BytesRejection, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use coach::errors::{CallableError, ErrorStatus};
use coach::models::reply::ChatReply;
use serde::Serialize;
use serde_json::Value;
use tokio::time::timeout;

const DEADLINE_MESSAGE: &str = "The request timed out.";

#[derive(Debug, Serialize)]
struct CallableErrorBody {
    status: ErrorStatus,
    message: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "lowercase")]
enum CallableEnvelope {
    Result(ChatReply),
    Error(CallableErrorBody),
}

/// The response of a callable invocation, in the callable wire format
pub enum CallableResponse {
    Ok(ChatReply),
    Failed(CallableError),
    DeadlineExceeded,
}

impl CallableResponse {
    fn error(status: ErrorStatus, message: String) -> (StatusCode, CallableEnvelope) {
        let code = match status {
            ErrorStatus::Unauthenticated => StatusCode::UNAUTHORIZED,
            ErrorStatus::InvalidArgument | ErrorStatus::FailedPrecondition => {
                StatusCode::BAD_REQUEST
            }
            ErrorStatus::Internal => StatusCode::INTERNAL_SERVER_ERROR,
            ErrorStatus::DeadlineExceeded => StatusCode::GATEWAY_TIMEOUT,
        };
        (code, CallableEnvelope::Error(CallableErrorBody { status, message }))
    }
}

impl IntoResponse for CallableResponse {
    fn into_response(self) -> Response {
        let (code, envelope) = match self {
            CallableResponse::Ok(reply) => (StatusCode::OK, CallableEnvelope::Result(reply)),
            CallableResponse::Failed(err) => Self::error(err.status(), err.to_string()),
            CallableResponse::DeadlineExceeded => {
                Self::error(ErrorStatus::DeadlineExceeded, DEADLINE_MESSAGE.to_string())
            }
        };
        (code, Json(envelope)).into_response()
    }
}

/// Extract the `data` field of a callable request body.
///
/// Anything unreadable is treated as an empty payload so that authentication is still
/// checked first.
fn payload(body: &[u8]) -> Value {
    serde_json::from_slice::<Value>(body)
        .ok()
        .and_then(|mut value| value.get_mut("data").map(Value::take))
        .unwrap_or(Value::Null)
}

async fn ai_chat(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Result<Bytes, BytesRejection>,
) -> CallableResponse {
    let data = match body {
        Ok(body) => payload(&body),
        Err(rejection) => {
            // over the body limit or unreadable
            tracing::warn!(
                status = %rejection.status(),
                "Rejected callable request body: {}",
                rejection.body_text()
            );
            Value::Null
        }
    };

    let invocation = async {
        let caller = caller_from_headers(state.verifier.as_ref(), &headers).await;
        state.coach.handle(caller.as_ref(), &data).await
    };

    match timeout(state.timeout, invocation).await {
        Ok(Ok(reply)) => CallableResponse::Ok(reply),
        Ok(Err(err)) => CallableResponse::Failed(err),
        Err(_) => {
            tracing::warn!(timeout_secs = state.timeout.as_secs(), "AI coach request timed out");
            CallableResponse::DeadlineExceeded
        }
    }
}

// Configure routes for this module
pub fn routes(state: AppState) -> Router {
    Router::new()
        .route("/aiChat", post(ai_chat))
        .with_state(state)
}
