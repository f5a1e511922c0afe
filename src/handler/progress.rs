// handlers/progress.rs
use std::sync::Arc;

use axum::{
    extract::Path,
    response::IntoResponse,
    routing::{get, post, put},
    Extension, Json, Router,
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    dtos::common::{ApiResponse, ReviewDecisionDto},
    dtos::progressdtos::SubmitProgressDto,
    error::HttpError,
    AppState,
};

pub fn progress_handler() -> Router {
    Router::new()
        .route("/", post(submit_progress_update))
        .route("/:update_id", get(get_progress_update))
        .route("/:update_id/review", put(review_progress_update))
        .route("/project/:project_id", get(get_project_progress))
}

pub async fn submit_progress_update(
    Extension(app_state): Extension<Arc<AppState>>,
    Json(body): Json<SubmitProgressDto>,
) -> Result<impl IntoResponse, HttpError> {
    body.validate()
        .map_err(|e| HttpError::bad_request(e.to_string()))?;

    let update = app_state.progress_service.submit_update(body).await?;

    Ok(Json(ApiResponse::success(
        "Progress update submitted successfully",
        update,
    )))
}

pub async fn review_progress_update(
    Extension(app_state): Extension<Arc<AppState>>,
    Path(update_id): Path<Uuid>,
    Json(body): Json<ReviewDecisionDto>,
) -> Result<impl IntoResponse, HttpError> {
    body.validate()
        .map_err(|e| HttpError::bad_request(e.to_string()))?;

    let update = app_state
        .progress_service
        .review_update(update_id, body)
        .await?;

    Ok(Json(ApiResponse::success(
        "Progress update reviewed successfully",
        update,
    )))
}

pub async fn get_progress_update(
    Extension(app_state): Extension<Arc<AppState>>,
    Path(update_id): Path<Uuid>,
) -> Result<impl IntoResponse, HttpError> {
    let update = app_state.progress_service.get_update(update_id).await?;

    Ok(Json(ApiResponse::success(
        "Progress update retrieved successfully",
        update,
    )))
}

pub async fn get_project_progress(
    Extension(app_state): Extension<Arc<AppState>>,
    Path(project_id): Path<Uuid>,
) -> Result<impl IntoResponse, HttpError> {
    let updates = app_state
        .progress_service
        .get_updates_for_project(project_id)
        .await?;

    Ok(Json(ApiResponse::success(
        "Project progress retrieved successfully",
        updates,
    )))
}
