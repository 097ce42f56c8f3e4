//! HTTP routes and handlers

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use postguard_core::{Error, ModerationReport, ModerationRequest, Screening};
use serde::Serialize;
use serde_json::json;
use tracing::{error, info, warn};

use crate::state::AppState;

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/metrics", get(metrics))
        .route("/moderate", post(moderate))
        .fallback(fallback)
        .with_state(state)
}

async fn health_check() -> &'static str {
    "OK"
}

async fn metrics(State(state): State<AppState>) -> String {
    state.metrics_handle.render()
}

/// Verdict body for both approved and rejected posts
#[derive(Debug, Serialize)]
struct ModerationResponse {
    message: String,
    report: ModerationReport,
}

/// Screen a post before it is published
async fn moderate(
    State(state): State<AppState>,
    Json(req): Json<ModerationRequest>,
) -> Result<Response, AppError> {
    metrics::counter!("postguard_requests_total").increment(1);

    let Screening { verdict, report } = state.pipeline.screen(&req).await?;
    let message = verdict.message();

    let status = match verdict.rejected_by() {
        None => {
            info!(models = report.len(), "post approved");
            StatusCode::OK
        }
        Some(model) => {
            warn!(model, "post rejected");
            StatusCode::BAD_REQUEST
        }
    };

    Ok((status, Json(ModerationResponse { message, report })).into_response())
}

async fn fallback() -> (StatusCode, &'static str) {
    (StatusCode::NOT_FOUND, "Not found")
}

/// Error handling
#[derive(Debug)]
enum AppError {
    MissingCredential,
    Unavailable(String),
}

impl From<Error> for AppError {
    fn from(err: Error) -> Self {
        if err.is_config() {
            AppError::MissingCredential
        } else {
            AppError::Unavailable(err.to_string())
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        metrics::counter!("postguard_errors_total").increment(1);

        let body = match self {
            AppError::MissingCredential => {
                error!("moderation requested without a model service credential");
                json!({ "error": "Missing credential" })
            }
            AppError::Unavailable(details) => {
                error!(details = %details, "moderation failed");
                json!({
                    "error": "Moderation service unavailable",
                    "details": details,
                })
            }
        };

        (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response()
    }
}
