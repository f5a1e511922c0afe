// handlers/bids.rs
use std::sync::Arc;

use axum::{
    extract::Path,
    response::IntoResponse,
    routing::{delete, get, post, put},
    Extension, Json, Router,
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    dtos::biddtos::{RespondToBidDto, SubmitBidDto},
    dtos::common::ApiResponse,
    error::HttpError,
    AppState,
};

pub fn bids_handler() -> Router {
    Router::new()
        .route("/", post(submit_bid))
        .route("/:bid_id", get(get_bid))
        .route("/:bid_id", delete(withdraw_bid))
        .route("/:bid_id/status", put(respond_to_bid))
        .route("/project/:project_id", get(get_project_bids))
        .route("/material-request/:request_id", get(get_material_request_bids))
        .route("/bidder/:user_id", get(get_bidder_bids))
}

pub async fn submit_bid(
    Extension(app_state): Extension<Arc<AppState>>,
    Json(body): Json<SubmitBidDto>,
) -> Result<impl IntoResponse, HttpError> {
    body.validate()
        .map_err(|e| HttpError::bad_request(e.to_string()))?;

    let bid = app_state.bid_service.submit_bid(body).await?;

    Ok(Json(ApiResponse::success(
        "Bid submitted successfully",
        bid,
    )))
}

pub async fn respond_to_bid(
    Extension(app_state): Extension<Arc<AppState>>,
    Path(bid_id): Path<Uuid>,
    Json(body): Json<RespondToBidDto>,
) -> Result<impl IntoResponse, HttpError> {
    body.validate()
        .map_err(|e| HttpError::bad_request(e.to_string()))?;

    let bid = app_state.bid_service.respond_to_bid(bid_id, body).await?;

    Ok(Json(ApiResponse::success(
        "Bid status updated successfully",
        bid,
    )))
}

pub async fn withdraw_bid(
    Extension(app_state): Extension<Arc<AppState>>,
    Path(bid_id): Path<Uuid>,
) -> Result<impl IntoResponse, HttpError> {
    app_state.bid_service.withdraw_bid(bid_id).await?;

    Ok(Json(ApiResponse::success(
        "Bid withdrawn successfully",
        (),
    )))
}

pub async fn get_bid(
    Extension(app_state): Extension<Arc<AppState>>,
    Path(bid_id): Path<Uuid>,
) -> Result<impl IntoResponse, HttpError> {
    let bid = app_state.bid_service.get_bid(bid_id).await?;

    Ok(Json(ApiResponse::success(
        "Bid retrieved successfully",
        bid,
    )))
}

pub async fn get_project_bids(
    Extension(app_state): Extension<Arc<AppState>>,
    Path(project_id): Path<Uuid>,
) -> Result<impl IntoResponse, HttpError> {
    let bids = app_state.bid_service.get_bids_for_project(project_id).await?;

    Ok(Json(ApiResponse::success(
        "Project bids retrieved successfully",
        bids,
    )))
}

pub async fn get_material_request_bids(
    Extension(app_state): Extension<Arc<AppState>>,
    Path(request_id): Path<Uuid>,
) -> Result<impl IntoResponse, HttpError> {
    let bids = app_state
        .bid_service
        .get_bids_for_material_request(request_id)
        .await?;

    Ok(Json(ApiResponse::success(
        "Material request bids retrieved successfully",
        bids,
    )))
}

pub async fn get_bidder_bids(
    Extension(app_state): Extension<Arc<AppState>>,
    Path(user_id): Path<Uuid>,
) -> Result<impl IntoResponse, HttpError> {
    let bids = app_state.bid_service.get_bids_by_bidder(user_id).await?;

    Ok(Json(ApiResponse::success(
        "Bidder bids retrieved successfully",
        bids,
    )))
}
