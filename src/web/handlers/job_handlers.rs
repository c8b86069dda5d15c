// src/web/handlers/job_handlers.rs
use super::ApiError;
use crate::scraper::{is_valid_job_url, JobSource};
use crate::web::types::{
    DataResponse, ExtractJobRequest, ExtractedJob, StandardErrorResponse, StandardRequest,
    WithConversationId,
};
use crate::web::AppState;

use rocket::http::Status;
use rocket::response::status::Custom;
use rocket::serde::json::Json;
use rocket::State;
use tracing::{info, warn};

pub async fn extract_job_handler(
    request: Json<StandardRequest<ExtractJobRequest>>,
    state: &State<AppState>,
) -> Result<Json<DataResponse<ExtractedJob>>, ApiError> {
    let conversation_id = request.conversation_id();

    let url = match request.data.url.as_deref().map(str::trim) {
        Some(url) if !url.is_empty() => url.to_string(),
        _ => {
            warn!("Extraction requested without a URL");
            return Err(Custom(
                Status::BadRequest,
                Json(StandardErrorResponse::new(
                    "URL é obrigatória".to_string(),
                    "MISSING_URL".to_string(),
                    vec!["Send the posting address in the 'url' field".to_string()],
                    conversation_id,
                )),
            ));
        }
    };

    info!("Extracting job posting: {}", url);
    let source = JobSource::classify(&url);
    let extraction = state.scraper.extract(&url).await;

    let message = if extraction.is_degraded() {
        "Job information could not be read from the page; review the values".to_string()
    } else {
        "Job information extracted".to_string()
    };

    Ok(Json(DataResponse::success(
        message,
        ExtractedJob::new(extraction, source),
        conversation_id,
    )))
}

pub async fn validate_job_url_handler(url: Option<String>) -> Json<DataResponse<bool>> {
    let url = url.unwrap_or_default();
    let valid = is_valid_job_url(&url);
    info!("URL {} valid: {}", url, valid);

    let message = if valid {
        "URL belongs to a supported job board".to_string()
    } else {
        "URL is not from a supported job board".to_string()
    };
    Json(DataResponse::success(message, valid, None))
}
