// src/web/handlers/system_handlers.rs
use crate::web::types::TextResponse;

use rocket::serde::json::Json;
use tracing::debug;

pub async fn health_handler() -> Json<TextResponse> {
    debug!("Health check");
    Json(TextResponse::success(
        format!("{} {} is running", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION")),
        None,
    ))
}
