// handlers/notifications.rs
use std::sync::Arc;

use axum::{
    extract::{Path, Query},
    response::IntoResponse,
    routing::{get, put},
    Extension, Json, Router,
};
use uuid::Uuid;

use crate::{
    dtos::common::{ApiResponse, PaginatedResponse},
    dtos::notificationdtos::{NotificationQueryDto, UnreadCountDto},
    error::HttpError,
    AppState,
};

pub fn notifications_handler() -> Router {
    Router::new()
        .route("/user/:user_id", get(get_user_notifications))
        .route("/user/:user_id/unread-count", get(get_unread_count))
        .route("/user/:user_id/read-all", put(mark_all_notifications_read))
        .route("/:notification_id/read", put(mark_notification_read))
}

pub async fn get_user_notifications(
    Extension(app_state): Extension<Arc<AppState>>,
    Path(user_id): Path<Uuid>,
    Query(pagination): Query<NotificationQueryDto>,
) -> Result<impl IntoResponse, HttpError> {
    let page = pagination.page.unwrap_or(1).max(1);
    let limit = pagination.limit.unwrap_or(20).min(100);
    let offset = ((page - 1) * limit) as i64;
    let unread_only = pagination.unread_only.unwrap_or(false);

    let (notifications, total) = app_state
        .notification_service
        .get_user_notifications(user_id, unread_only, limit as i64, offset)
        .await?;

    Ok(Json(PaginatedResponse::new(notifications, total, page, limit)))
}

pub async fn get_unread_count(
    Extension(app_state): Extension<Arc<AppState>>,
    Path(user_id): Path<Uuid>,
) -> Result<impl IntoResponse, HttpError> {
    let unread_count = app_state.notification_service.unread_count(user_id).await?;

    Ok(Json(ApiResponse::success(
        "Unread count retrieved successfully",
        UnreadCountDto { unread_count },
    )))
}

pub async fn mark_notification_read(
    Extension(app_state): Extension<Arc<AppState>>,
    Path(notification_id): Path<Uuid>,
) -> Result<impl IntoResponse, HttpError> {
    let notification = app_state
        .notification_service
        .mark_read(notification_id)
        .await?;

    Ok(Json(ApiResponse::success(
        "Notification marked as read",
        notification,
    )))
}

pub async fn mark_all_notifications_read(
    Extension(app_state): Extension<Arc<AppState>>,
    Path(user_id): Path<Uuid>,
) -> Result<impl IntoResponse, HttpError> {
    let updated = app_state.notification_service.mark_all_read(user_id).await?;

    Ok(Json(ApiResponse::success(
        "All notifications marked as read",
        serde_json::json!({ "updated_count": updated }),
    )))
}
