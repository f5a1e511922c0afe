// routes.rs
use std::sync::Arc;

use axum::{routing::get, Extension, Json, Router};
use serde_json::json;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

use crate::{
    handler::{
        bids::bids_handler, designs::designs_handler, notifications::notifications_handler,
        payments::payments_handler, progress::progress_handler,
    },
    AppState,
};

async fn health_check() -> Json<serde_json::Value> {
    Json(json!({
        "success": true,
        "message": "Server is running"
    }))
}

pub fn create_router(app_state: Arc<AppState>) -> Router {
    let api_route = Router::new()
        .nest("/bids", bids_handler())
        .nest("/progress", progress_handler())
        .nest("/designs", designs_handler())
        .nest("/payments", payments_handler())
        .nest("/notifications", notifications_handler())
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(Extension(app_state)),
        );

    Router::new()
        .route("/health", get(health_check))
        .nest("/api", api_route)
}
