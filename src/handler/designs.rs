// handlers/designs.rs
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
    dtos::designdtos::SubmitDesignDto,
    error::HttpError,
    AppState,
};

pub fn designs_handler() -> Router {
    Router::new()
        .route("/", post(submit_design))
        .route("/:design_id", get(get_design))
        .route("/:design_id/review", put(review_design))
        .route("/project/:project_id", get(get_project_designs))
}

pub async fn submit_design(
    Extension(app_state): Extension<Arc<AppState>>,
    Json(body): Json<SubmitDesignDto>,
) -> Result<impl IntoResponse, HttpError> {
    body.validate()
        .map_err(|e| HttpError::bad_request(e.to_string()))?;

    let design = app_state.design_service.submit_design(body).await?;

    Ok(Json(ApiResponse::success(
        "Design submitted successfully",
        design,
    )))
}

pub async fn review_design(
    Extension(app_state): Extension<Arc<AppState>>,
    Path(design_id): Path<Uuid>,
    Json(body): Json<ReviewDecisionDto>,
) -> Result<impl IntoResponse, HttpError> {
    body.validate()
        .map_err(|e| HttpError::bad_request(e.to_string()))?;

    let design = app_state
        .design_service
        .review_design(design_id, body)
        .await?;

    Ok(Json(ApiResponse::success(
        "Design reviewed successfully",
        design,
    )))
}

pub async fn get_design(
    Extension(app_state): Extension<Arc<AppState>>,
    Path(design_id): Path<Uuid>,
) -> Result<impl IntoResponse, HttpError> {
    let design = app_state.design_service.get_design(design_id).await?;

    Ok(Json(ApiResponse::success(
        "Design retrieved successfully",
        design,
    )))
}

pub async fn get_project_designs(
    Extension(app_state): Extension<Arc<AppState>>,
    Path(project_id): Path<Uuid>,
) -> Result<impl IntoResponse, HttpError> {
    let designs = app_state
        .design_service
        .get_designs_for_project(project_id)
        .await?;

    Ok(Json(ApiResponse::success(
        "Project designs retrieved successfully",
        designs,
    )))
}
