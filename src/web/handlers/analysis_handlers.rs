// src/web/handlers/analysis_handlers.rs
use super::ApiError;
use crate::analysis::ResumeUpload;
use crate::error::AnalysisError;
use crate::web::types::{
    DataResponse, ResumeAnalysisData, ResumeAnalysisForm, StandardErrorResponse,
};
use crate::web::AppState;

use rocket::form::Form;
use rocket::fs::TempFile;
use rocket::http::Status;
use rocket::response::status::Custom;
use rocket::serde::json::Json;
use rocket::State;
use tokio::io::AsyncReadExt;
use tracing::{error, info, warn};

pub async fn analyze_resume_handler(
    form: Form<ResumeAnalysisForm<'_>>,
    state: &State<AppState>,
) -> Result<Json<DataResponse<ResumeAnalysisData>>, ApiError> {
    let form = form.into_inner();
    let conversation_id = form.conversation_id.clone();

    let upload = match &form.resume {
        Some(file) => match read_upload(file).await {
            Ok(upload) => Some(upload),
            Err(e) => {
                error!("Failed to read uploaded résumé: {}", e);
                return Err(Custom(
                    Status::BadRequest,
                    Json(StandardErrorResponse::new(
                        "Failed to process uploaded file".to_string(),
                        "FILE_READ_ERROR".to_string(),
                        vec!["Try uploading the file again".to_string()],
                        conversation_id,
                    )),
                ));
            }
        },
        None => None,
    };

    info!(
        "Résumé analysis requested: file={:?} job_url={:?}",
        upload.as_ref().map(|u| u.file_name.as_str()),
        form.job_url
    );

    match state
        .analyzer
        .analyze(upload, form.job_url.as_deref())
        .await
    {
        Ok(report) => {
            info!("Analysis {} finished", report.id);
            Ok(Json(DataResponse::success(
                "Análise concluída".to_string(),
                ResumeAnalysisData::from(report),
                conversation_id,
            )))
        }
        Err(e) => Err(analysis_error(e, conversation_id)),
    }
}

fn analysis_error(err: AnalysisError, conversation_id: Option<String>) -> ApiError {
    let status = if err.is_client_error() {
        warn!("Résumé analysis rejected ({}): {}", err.code(), err);
        Status::BadRequest
    } else {
        error!("Résumé analysis failed ({}): {}", err.code(), err);
        Status::InternalServerError
    };
    Custom(
        status,
        Json(StandardErrorResponse::from_analysis_error(&err, conversation_id)),
    )
}

async fn read_upload(file: &TempFile<'_>) -> std::io::Result<ResumeUpload> {
    // The sanitized name drops the extension, which the format checks need.
    let file_name = file
        .raw_name()
        .map(|name| name.dangerous_unsafe_unsanitized_raw().as_str())
        .and_then(|raw| raw.rsplit(['/', '\\']).next())
        .filter(|name| !name.is_empty())
        .unwrap_or("resume")
        .to_string();

    let content_type = file
        .content_type()
        .map(|ct| format!("{}/{}", ct.top(), ct.sub()));

    let mut bytes = Vec::with_capacity(file.len() as usize);
    let reader = file.open().await?;
    tokio::pin!(reader);
    reader.read_to_end(&mut bytes).await?;

    Ok(ResumeUpload {
        file_name,
        content_type,
        bytes,
    })
}
