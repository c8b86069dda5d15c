// src/web/types.rs
use crate::analysis::{AnalysisReport, AnalysisSource, CompatibilityBreakdown};
use crate::error::AnalysisError;
use crate::scraper::{Extraction, JobInfo, JobSource, Quality};

use rocket::form::FromForm;
use rocket::fs::TempFile;
use rocket::serde::{Deserialize, Serialize};

#[derive(Serialize)]
#[serde(crate = "rocket::serde", rename_all = "lowercase")]
pub enum ResponseType {
    Text,
    Data,
    Error,
}

#[derive(Serialize)]
#[serde(crate = "rocket::serde")]
pub struct TextResponse {
    #[serde(rename = "type")]
    pub response_type: ResponseType,
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub conversation_id: Option<String>,
}

#[derive(Serialize)]
#[serde(crate = "rocket::serde")]
pub struct DataResponse<T> {
    #[serde(rename = "type")]
    pub response_type: ResponseType,
    pub success: bool,
    pub message: String,
    pub data: T,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub conversation_id: Option<String>,
}

#[derive(Serialize)]
#[serde(crate = "rocket::serde")]
pub struct StandardErrorResponse {
    #[serde(rename = "type")]
    pub response_type: ResponseType,
    pub success: bool,
    pub error: String,
    pub error_code: String,
    pub suggestions: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub conversation_id: Option<String>,
}

// Request types with conversation_id support
#[derive(Deserialize)]
#[serde(crate = "rocket::serde")]
pub struct StandardRequest<T> {
    #[serde(flatten)]
    pub data: T,
    #[serde(default)]
    pub conversation_id: Option<String>,
}

pub trait WithConversationId {
    fn conversation_id(&self) -> Option<String>;
}

impl<T> WithConversationId for StandardRequest<T> {
    fn conversation_id(&self) -> Option<String> {
        self.conversation_id.clone()
    }
}

#[derive(Deserialize)]
#[serde(crate = "rocket::serde")]
pub struct ExtractJobRequest {
    #[serde(default)]
    pub url: Option<String>,
}

/// Multipart body of `POST /api/analyze-resume`. Both fields are optional
/// here so that their absence is reported by the analyzer, not by Rocket.
#[derive(FromForm)]
pub struct ResumeAnalysisForm<'f> {
    pub resume: Option<TempFile<'f>>,
    #[field(name = "jobUrl")]
    pub job_url: Option<String>,
    pub conversation_id: Option<String>,
}

#[derive(Serialize)]
#[serde(crate = "rocket::serde")]
pub struct ExtractedJob {
    #[serde(flatten)]
    pub job: JobInfo,
    pub quality: Quality,
    pub source: JobSource,
}

impl ExtractedJob {
    pub fn new(extraction: Extraction, source: JobSource) -> Self {
        Self {
            job: extraction.info,
            quality: extraction.quality,
            source,
        }
    }
}

#[derive(Serialize)]
#[serde(crate = "rocket::serde", rename_all = "camelCase")]
pub struct ResumeAnalysisData {
    pub analysis_id: String,
    pub compatibility: u8,
    pub compatibility_breakdown: CompatibilityBreakdown,
    pub strengths: Vec<String>,
    pub weaknesses: Vec<String>,
    pub suggestions: Vec<String>,
    /// Base64-encoded `.docx`.
    pub improved_resume: String,
    pub source: AnalysisSource,
    pub analyzed_at: String,
}

impl From<AnalysisReport> for ResumeAnalysisData {
    fn from(report: AnalysisReport) -> Self {
        let improved_resume = report.improved_resume_base64();
        let result = report.result;
        Self {
            analysis_id: report.id.to_string(),
            compatibility: result.compatibility.overall,
            compatibility_breakdown: result.compatibility,
            strengths: result.strengths,
            weaknesses: result.weaknesses,
            suggestions: result.suggestions,
            improved_resume,
            source: result.source,
            analyzed_at: report.analyzed_at.to_rfc3339(),
        }
    }
}

// Helper functions to create standard responses
impl TextResponse {
    pub fn success(message: String, conversation_id: Option<String>) -> Self {
        Self {
            response_type: ResponseType::Text,
            success: true,
            message,
            conversation_id,
        }
    }
}

impl<T> DataResponse<T> {
    pub fn success(message: String, data: T, conversation_id: Option<String>) -> Self {
        Self {
            response_type: ResponseType::Data,
            success: true,
            message,
            data,
            conversation_id,
        }
    }
}

impl StandardErrorResponse {
    pub fn new(
        error: String,
        error_code: String,
        suggestions: Vec<String>,
        conversation_id: Option<String>,
    ) -> Self {
        Self {
            response_type: ResponseType::Error,
            success: false,
            error,
            error_code,
            suggestions,
            conversation_id,
        }
    }

    pub fn from_analysis_error(err: &AnalysisError, conversation_id: Option<String>) -> Self {
        Self::new(
            err.to_string(),
            err.code().to_string(),
            err.suggestions(),
            conversation_id,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::AnalysisResult;
    use chrono::Utc;
    use uuid::Uuid;

    #[test]
    fn test_extracted_job_flattens_fields() {
        let extraction = Extraction::inferred(JobInfo {
            company: Some("Acme".to_string()),
            ..Default::default()
        });
        let json = serde_json::to_value(ExtractedJob::new(extraction, JobSource::Generic)).unwrap();
        assert_eq!(json["company"], "Acme");
        assert_eq!(json["quality"], "inferred");
        assert_eq!(json["source"], "generic");
        assert!(json.get("position").is_none());
    }

    #[test]
    fn test_analysis_data_shape() {
        let report = AnalysisReport {
            id: Uuid::new_v4(),
            result: AnalysisResult {
                compatibility: CompatibilityBreakdown::uniform(70),
                strengths: vec![],
                weaknesses: vec![],
                suggestions: vec![],
                improved_resume_text: String::new(),
                source: AnalysisSource::Heuristic,
            },
            improved_resume_docx: b"doc".to_vec(),
            analyzed_at: Utc::now(),
        };

        let json = serde_json::to_value(ResumeAnalysisData::from(report)).unwrap();
        assert_eq!(json["compatibility"], 70);
        assert_eq!(json["compatibilityBreakdown"]["skills"], 70);
        assert_eq!(json["improvedResume"], "ZG9j");
        assert_eq!(json["source"], "heuristic");
    }

    #[test]
    fn test_error_envelope() {
        let response =
            StandardErrorResponse::from_analysis_error(&AnalysisError::PdfNotSupported, None);
        let json = serde_json::to_value(response).unwrap();
        assert_eq!(json["type"], "error");
        assert_eq!(json["success"], false);
        assert_eq!(json["error_code"], "PDF_NOT_SUPPORTED");
    }
}
