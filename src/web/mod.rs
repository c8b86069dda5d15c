// src/web/mod.rs

pub mod handlers;
pub mod types;

pub use handlers::ApiError;
pub use types::*;

use crate::analysis::ResumeAnalyzer;
use crate::core::{AppConfig, ConversionServiceClient, OpenRouterClient};
use crate::scraper::JobScraper;
use anyhow::{Context, Result};
use rocket::data::{Limits, ToByteUnit};
use rocket::fairing::{Fairing, Info, Kind};
use rocket::form::Form;
use rocket::http::{Header, Status};
use rocket::serde::json::Json;
use rocket::{catchers, get, options, post, routes, Build, Request, Response, Rocket, State};
use std::sync::Arc;
use tracing::info;

/// Shared services handed to every route.
pub struct AppState {
    pub scraper: JobScraper,
    pub analyzer: ResumeAnalyzer,
}

impl AppState {
    pub fn new(scraper: JobScraper, analyzer: ResumeAnalyzer) -> Self {
        Self { scraper, analyzer }
    }

    /// Production wiring: real HTTP clients built from `config`.
    pub fn from_config(config: &AppConfig) -> Result<Self> {
        let scraper = JobScraper::new(&config.scraper).context("Failed to create job scraper")?;
        let llm = OpenRouterClient::new(config.llm.clone())
            .context("Failed to create language model client")?;
        let converter = ConversionServiceClient::new(&config.converter)
            .context("Failed to create document conversion client")?;

        Ok(Self::new(
            scraper,
            ResumeAnalyzer::new(Arc::new(llm), Arc::new(converter)),
        ))
    }
}

// CORS Fairing
pub struct Cors;

#[rocket::async_trait]
impl Fairing for Cors {
    fn info(&self) -> Info {
        Info {
            name: "Add CORS headers to responses",
            kind: Kind::Response,
        }
    }

    async fn on_response<'r>(&self, _request: &'r Request<'_>, response: &mut Response<'r>) {
        response.set_header(Header::new("Access-Control-Allow-Origin", "*"));
        response.set_header(Header::new(
            "Access-Control-Allow-Methods",
            "POST, GET, OPTIONS",
        ));
        response.set_header(Header::new("Access-Control-Allow-Headers", "*"));
    }
}

#[post("/extract-job", data = "<request>")]
pub async fn extract_job(
    request: Json<StandardRequest<ExtractJobRequest>>,
    state: &State<AppState>,
) -> Result<Json<DataResponse<ExtractedJob>>, ApiError> {
    handlers::extract_job_handler(request, state).await
}

#[get("/validate-job-url?<url>")]
pub async fn validate_job_url(url: Option<String>) -> Json<DataResponse<bool>> {
    handlers::validate_job_url_handler(url).await
}

#[post("/analyze-resume", data = "<form>")]
pub async fn analyze_resume(
    form: Form<ResumeAnalysisForm<'_>>,
    state: &State<AppState>,
) -> Result<Json<DataResponse<ResumeAnalysisData>>, ApiError> {
    handlers::analyze_resume_handler(form, state).await
}

#[get("/health")]
pub async fn health() -> Json<TextResponse> {
    handlers::health_handler().await
}

#[options("/<_..>")]
pub async fn options() -> Status {
    Status::Ok
}

fn error_body(error: &str, code: &str, suggestions: &[&str]) -> Json<StandardErrorResponse> {
    Json(StandardErrorResponse::new(
        error.to_string(),
        code.to_string(),
        suggestions.iter().map(|s| s.to_string()).collect(),
        None,
    ))
}

// Error catchers
#[rocket::catch(400)]
pub fn bad_request() -> Json<StandardErrorResponse> {
    error_body(
        "Invalid request format",
        "BAD_REQUEST",
        &[
            "Check your request JSON format",
            "Verify all required fields are present",
        ],
    )
}

#[rocket::catch(404)]
pub fn not_found() -> Json<StandardErrorResponse> {
    error_body(
        "Endpoint not found",
        "NOT_FOUND",
        &["Check the request path and method"],
    )
}

#[rocket::catch(413)]
pub fn payload_too_large() -> Json<StandardErrorResponse> {
    error_body(
        "Arquivo muito grande. Tamanho máximo permitido: 10MB",
        "FILE_TOO_LARGE",
        &["Upload a file of at most 10MB"],
    )
}

#[rocket::catch(422)]
pub fn unprocessable() -> Json<StandardErrorResponse> {
    error_body(
        "Request body could not be parsed",
        "UNPROCESSABLE_REQUEST",
        &[
            "Send JSON with a 'url' string for /api/extract-job",
            "Send multipart form data with 'resume' and 'jobUrl' for /api/analyze-resume",
        ],
    )
}

#[rocket::catch(500)]
pub fn internal_error() -> Json<StandardErrorResponse> {
    error_body(
        "Internal server error",
        "INTERNAL_ERROR",
        &[
            "Try again in a few moments",
            "Contact support if the problem persists",
        ],
    )
}

/// Assembles the application without launching it.
pub fn build_rocket(state: AppState, config: &AppConfig) -> Rocket<Build> {
    // Headroom above the résumé limit so the handler can report the size itself.
    // The file limit must match the form limit: a file part cut short by its
    // own limit would reach the handler as a missing field.
    let form_limit = config.server.max_upload_bytes + 2 * 1024 * 1024;
    let limits = Limits::default()
        .limit("file", form_limit.bytes())
        .limit("data-form", form_limit.bytes())
        .limit("json", 1.mebibytes());

    let figment = rocket::Config::figment()
        .merge(("address", config.server.address.clone()))
        .merge(("port", config.server.port))
        .merge(("limits", limits));

    rocket::custom(figment)
        .attach(Cors)
        .manage(state)
        .register(
            "/api",
            catchers![
                bad_request,
                not_found,
                payload_too_large,
                unprocessable,
                internal_error
            ],
        )
        .mount(
            "/api",
            routes![
                extract_job,
                validate_job_url,
                analyze_resume,
                health,
                options,
            ],
        )
}

// Main server start function
pub async fn start_web_server(config: AppConfig) -> Result<()> {
    let state = AppState::from_config(&config)?;

    info!(
        "Starting job tracker API on {}:{}",
        config.server.address, config.server.port
    );
    info!("Language model: {}", config.llm.model);
    info!("Document conversion service: {}", config.converter.base_url);

    let _rocket = build_rocket(state, &config)
        .launch()
        .await
        .map_err(|e| anyhow::anyhow!("Rocket server failed: {}", e))?;

    Ok(())
}
