use std::sync::Arc;

use axum::{
    Json,
    body::Bytes,
    extract::State,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
};
use chrono::Utc;
use tracing::info;

use crate::api::{ErrorResponse, HealthResponse, SyncResponse};
use crate::auth::AuthGuard;
use crate::error::SyncError;
use crate::github::GithubClient;
use crate::model::SolutionSubmission;
use crate::sync::{SyncOutcome, sync_solution};
use crate::unpack_error;

#[derive(Clone)]
pub struct AppState {
    pub auth: Arc<AuthGuard>,
    /// Present only when the GitHub credentials were configured. `/sync`
    /// answers 500 without it, `/health` reports it.
    pub store: Option<Arc<GithubClient>>,
}

pub async fn healthcheck(State(state): State<AppState>) -> impl IntoResponse {
    info!("got healthcheck request");
    Json(HealthResponse {
        status: "ok",
        configured: state.store.is_some(),
    })
}

/// `POST /sync`. Takes the body as raw bytes: the HMAC covers the exact
/// bytes the client signed, so deserialization happens only after the
/// signature check passes.
pub async fn sync(State(state): State<AppState>, headers: HeaderMap, body: Bytes) -> Response {
    let timestamp = headers.get("x-timestamp").and_then(|v| v.to_str().ok());
    let signature = headers.get("x-signature").and_then(|v| v.to_str().ok());

    let now = Utc::now().timestamp();
    if let Err(e) = state.auth.verify(timestamp, signature, &body, now) {
        tracing::warn!(error = %e, "rejected sync request");
        return (StatusCode::UNAUTHORIZED, Json(ErrorResponse::new(e.to_string())))
            .into_response();
    }

    let submission: SolutionSubmission = match serde_json::from_slice(&body) {
        Ok(submission) => submission,
        Err(e) => {
            return (
                StatusCode::BAD_REQUEST,
                Json(ErrorResponse::new(format!("Invalid request body: {}", e))),
            )
                .into_response();
        }
    };

    let today = Utc::now().date_naive().to_string();
    let result = if let Err(e) = submission.validate() {
        Err(e)
    } else if let Some(store) = state.store.as_ref() {
        sync_solution(store.as_ref(), &submission, &today).await
    } else {
        Err(SyncError::Config(
            "Server not configured: missing GitHub credentials".to_string(),
        ))
    };

    match result {
        Ok(SyncOutcome::NoChange) => {
            (StatusCode::OK, Json(SyncResponse::no_change())).into_response()
        }
        Ok(SyncOutcome::Synced { path, message }) => {
            (StatusCode::OK, Json(SyncResponse::synced(path, message))).into_response()
        }
        Err(e) => {
            tracing::error!(slug = %submission.slug, error = %e, "sync failed");
            let status = match &e {
                SyncError::Validation(_) => StatusCode::BAD_REQUEST,
                _ => StatusCode::INTERNAL_SERVER_ERROR,
            };
            (status, Json(ErrorResponse::new(unpack_error(&e)))).into_response()
        }
    }
}
