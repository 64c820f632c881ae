use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};
use tracing::error;

use super::repository::{RepositoryError, ResultRepository};
use super::service::{AssessmentService, AssessmentServiceError};

/// Router builder exposing the scoring and result lookup endpoints.
pub fn assessment_router<R>(service: Arc<AssessmentService<R>>) -> Router
where
    R: ResultRepository + 'static,
{
    Router::new()
        .route("/api/v1/assessment/score", post(score_handler::<R>))
        .route(
            "/api/v1/assessment/results/:user_id",
            get(latest_handler::<R>),
        )
        .with_state(service)
}

pub(crate) async fn score_handler<R>(
    State(service): State<Arc<AssessmentService<R>>>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Response
where
    R: ResultRepository + 'static,
{
    let body = match payload {
        Ok(Json(body)) => body,
        Err(rejection) => {
            let payload = json!({
                "error": format!("invalid assessment input: {}", rejection.body_text()),
            });
            return (StatusCode::BAD_REQUEST, Json(payload)).into_response();
        }
    };

    match service.submit_json(body) {
        Ok(result) => (StatusCode::OK, Json(result)).into_response(),
        Err(AssessmentServiceError::Input(err)) => {
            let payload = json!({ "error": err.to_string() });
            (StatusCode::BAD_REQUEST, Json(payload)).into_response()
        }
        Err(other) => {
            error!(error = %other, "assessment submission failed");
            let payload = json!({ "error": other.to_string() });
            (StatusCode::INTERNAL_SERVER_ERROR, Json(payload)).into_response()
        }
    }
}

pub(crate) async fn latest_handler<R>(
    State(service): State<Arc<AssessmentService<R>>>,
    Path(user_id): Path<String>,
) -> Response
where
    R: ResultRepository + 'static,
{
    match service.latest(&user_id) {
        Ok(record) => (StatusCode::OK, Json(record)).into_response(),
        Err(AssessmentServiceError::Repository(RepositoryError::NotFound)) => {
            let payload = json!({
                "error": format!("no assessment stored for user '{user_id}'"),
            });
            (StatusCode::NOT_FOUND, Json(payload)).into_response()
        }
        Err(other) => {
            let payload = json!({ "error": other.to_string() });
            (StatusCode::INTERNAL_SERVER_ERROR, Json(payload)).into_response()
        }
    }
}
