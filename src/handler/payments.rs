// handlers/payments.rs
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
    dtos::common::ApiResponse,
    dtos::paymentdtos::{CreatePaymentDto, UpdatePaymentStatusDto},
    error::HttpError,
    AppState,
};

pub fn payments_handler() -> Router {
    Router::new()
        .route("/", post(create_payment))
        .route("/:payment_id", get(get_payment))
        .route("/:payment_id/status", put(update_payment_status))
        .route("/user/:user_id", get(get_user_payments))
}

pub async fn create_payment(
    Extension(app_state): Extension<Arc<AppState>>,
    Json(body): Json<CreatePaymentDto>,
) -> Result<impl IntoResponse, HttpError> {
    body.validate()
        .map_err(|e| HttpError::bad_request(e.to_string()))?;

    let payment = app_state.payment_service.create_payment(body).await?;

    Ok(Json(ApiResponse::success(
        "Payment created successfully",
        payment,
    )))
}

pub async fn update_payment_status(
    Extension(app_state): Extension<Arc<AppState>>,
    Path(payment_id): Path<Uuid>,
    Json(body): Json<UpdatePaymentStatusDto>,
) -> Result<impl IntoResponse, HttpError> {
    body.validate()
        .map_err(|e| HttpError::bad_request(e.to_string()))?;

    let payment = app_state
        .payment_service
        .update_status(payment_id, body)
        .await?;

    Ok(Json(ApiResponse::success(
        "Payment status updated successfully",
        payment,
    )))
}

pub async fn get_payment(
    Extension(app_state): Extension<Arc<AppState>>,
    Path(payment_id): Path<Uuid>,
) -> Result<impl IntoResponse, HttpError> {
    let payment = app_state.payment_service.get_payment(payment_id).await?;

    Ok(Json(ApiResponse::success(
        "Payment retrieved successfully",
        payment,
    )))
}

pub async fn get_user_payments(
    Extension(app_state): Extension<Arc<AppState>>,
    Path(user_id): Path<Uuid>,
) -> Result<impl IntoResponse, HttpError> {
    let payments = app_state
        .payment_service
        .get_payments_for_user(user_id)
        .await?;

    Ok(Json(ApiResponse::success(
        "User payments retrieved successfully",
        payments,
    )))
}
