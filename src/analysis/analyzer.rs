// src/analysis/analyzer.rs
use super::prompts::{build_analysis_prompt, parse_model_response};
use super::scorer::fallback_analysis;
use super::{AnalysisResult, AnalysisSource};
use crate::core::{ChatCompletion, DocumentConverter};
use crate::error::{AnalysisError, Result};
use crate::scraper::extract_job_description;
use crate::utils::preview;
use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tracing::{debug, info, instrument, warn, Span};
use uuid::Uuid;

pub const MAX_RESUME_BYTES: u64 = 10 * 1024 * 1024;
pub const IMPROVED_RESUME_HEADER: &str = "CURRÍCULO MELHORADO";

const PDF_MIME: &str = "application/pdf";
const WORD_MIMES: [&str; 2] = [
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
    "application/msword",
];

/// An uploaded résumé file, held in memory.
#[derive(Debug, Clone)]
pub struct ResumeUpload {
    pub file_name: String,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

impl ResumeUpload {
    fn is_named(&self, extensions: &[&str]) -> bool {
        let name = self.file_name.to_lowercase();
        extensions.iter().any(|ext| name.ends_with(ext))
    }

    fn has_mime(&self, mimes: &[&str]) -> bool {
        self.content_type
            .as_deref()
            .map(|ct| mimes.iter().any(|m| ct.eq_ignore_ascii_case(m)))
            .unwrap_or(false)
    }

    pub fn is_pdf(&self) -> bool {
        self.is_named(&[".pdf"]) || self.has_mime(&[PDF_MIME])
    }

    pub fn is_word(&self) -> bool {
        self.is_named(&[".doc", ".docx"]) || self.has_mime(&WORD_MIMES)
    }
}

/// Input gate, in order: presence, size, PDF rejection, Word check.
pub fn check_resume_file<'a>(
    resume: Option<&'a ResumeUpload>,
    job_url: Option<&str>,
) -> Result<&'a ResumeUpload> {
    let resume = match (resume, job_url.map(str::trim)) {
        (Some(resume), Some(url)) if !url.is_empty() => resume,
        _ => return Err(AnalysisError::MissingInput),
    };

    let size = resume.bytes.len() as u64;
    if size > MAX_RESUME_BYTES {
        return Err(AnalysisError::FileTooLarge {
            size,
            limit: MAX_RESUME_BYTES,
        });
    }

    if resume.is_pdf() {
        return Err(AnalysisError::PdfNotSupported);
    }

    if !resume.is_word() {
        let described = resume
            .content_type
            .clone()
            .unwrap_or_else(|| resume.file_name.clone());
        return Err(AnalysisError::UnsupportedFormat(described));
    }

    Ok(resume)
}

#[derive(Debug, Clone)]
pub struct AnalysisReport {
    pub id: Uuid,
    pub result: AnalysisResult,
    pub improved_resume_docx: Vec<u8>,
    pub analyzed_at: DateTime<Utc>,
}

impl AnalysisReport {
    pub fn improved_resume_base64(&self) -> String {
        BASE64.encode(&self.improved_resume_docx)
    }
}

pub struct ResumeAnalyzer {
    llm: Arc<dyn ChatCompletion>,
    converter: Arc<dyn DocumentConverter>,
}

impl ResumeAnalyzer {
    pub fn new(llm: Arc<dyn ChatCompletion>, converter: Arc<dyn DocumentConverter>) -> Self {
        Self { llm, converter }
    }

    /// Runs the whole flow. Every step fails fast except an unusable model
    /// answer, which is replaced by keyword scoring.
    #[instrument(skip_all, fields(analysis_id = tracing::field::Empty))]
    pub async fn analyze(
        &self,
        resume: Option<ResumeUpload>,
        job_url: Option<&str>,
    ) -> Result<AnalysisReport> {
        let id = Uuid::new_v4();
        Span::current().record("analysis_id", tracing::field::display(id));

        let upload = check_resume_file(resume.as_ref(), job_url)?;
        // Presence was checked above.
        let job_url = job_url.unwrap_or_default().trim();
        info!("Analyzing {} against {}", upload.file_name, job_url);

        let resume_text = self
            .converter
            .to_text(upload.bytes.clone(), &upload.file_name)
            .await
            .map_err(AnalysisError::UnreadableDocument)?;
        if resume_text.trim().is_empty() {
            return Err(AnalysisError::EmptyResume);
        }
        debug!("Résumé text: {}", preview(&resume_text, 100));

        let job_description = extract_job_description(job_url);
        debug!("Job description: {}", preview(&job_description, 100));

        if !self.llm.is_configured() {
            return Err(AnalysisError::LlmNotConfigured);
        }
        let prompt = build_analysis_prompt(&resume_text, &job_description);
        let reply = self
            .llm
            .complete(&prompt)
            .await
            .map_err(AnalysisError::Llm)?;

        let result = match parse_model_response(&reply) {
            Some(model) => AnalysisResult::from(model),
            None => {
                warn!("Falling back to keyword scoring");
                fallback_analysis(&resume_text, &job_description)
            }
        };

        let improved_resume_docx = self
            .converter
            .to_document(IMPROVED_RESUME_HEADER, &result.improved_resume_text)
            .await
            .map_err(AnalysisError::Rendering)?;

        info!(
            compatibility = result.compatibility.overall,
            heuristic = result.source == AnalysisSource::Heuristic,
            "Analysis complete"
        );

        Ok(AnalysisReport {
            id,
            result,
            improved_resume_docx,
            analyzed_at: Utc::now(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::scorer;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    struct FakeLlm {
        reply: anyhow::Result<String>,
        configured: bool,
    }

    impl FakeLlm {
        fn replying(text: &str) -> Self {
            Self {
                reply: Ok(text.to_string()),
                configured: true,
            }
        }
    }

    #[rocket::async_trait]
    impl ChatCompletion for FakeLlm {
        fn is_configured(&self) -> bool {
            self.configured
        }

        async fn complete(&self, _prompt: &str) -> anyhow::Result<String> {
            match &self.reply {
                Ok(text) => Ok(text.clone()),
                Err(e) => Err(anyhow::anyhow!("{}", e)),
            }
        }
    }

    #[derive(Default)]
    struct FakeConverter {
        text: String,
        text_calls: AtomicUsize,
        rendered: Mutex<Vec<(String, String)>>,
    }

    impl FakeConverter {
        fn with_text(text: &str) -> Self {
            Self {
                text: text.to_string(),
                ..Default::default()
            }
        }
    }

    #[rocket::async_trait]
    impl DocumentConverter for FakeConverter {
        async fn to_text(&self, _bytes: Vec<u8>, _file_name: &str) -> anyhow::Result<String> {
            self.text_calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.text.clone())
        }

        async fn to_document(&self, header: &str, body: &str) -> anyhow::Result<Vec<u8>> {
            self.rendered
                .lock()
                .unwrap()
                .push((header.to_string(), body.to_string()));
            Ok(format!("{}\n{}", header, body).into_bytes())
        }
    }

    fn docx(name: &str) -> ResumeUpload {
        ResumeUpload {
            file_name: name.to_string(),
            content_type: None,
            bytes: b"PK fake docx".to_vec(),
        }
    }

    const JOB_URL: &str = "https://www.linkedin.com/jobs/view/42";
    const RESUME: &str = "React developer, 6 years, Bachelor, projects in TypeScript";

    #[test]
    fn test_gate_order() {
        assert!(matches!(
            check_resume_file(None, Some(JOB_URL)),
            Err(AnalysisError::MissingInput)
        ));
        assert!(matches!(
            check_resume_file(Some(&docx("cv.docx")), Some("  ")),
            Err(AnalysisError::MissingInput)
        ));

        let mut big_pdf = docx("cv.pdf");
        big_pdf.bytes = vec![0; MAX_RESUME_BYTES as usize + 1];
        assert!(matches!(
            check_resume_file(Some(&big_pdf), Some(JOB_URL)),
            Err(AnalysisError::FileTooLarge { .. })
        ));

        assert!(matches!(
            check_resume_file(Some(&docx("notes.txt")), Some(JOB_URL)),
            Err(AnalysisError::UnsupportedFormat(_))
        ));
        assert!(check_resume_file(Some(&docx("CV.DOCX")), Some(JOB_URL)).is_ok());
        assert!(check_resume_file(Some(&docx("cv.doc")), Some(JOB_URL)).is_ok());
    }

    #[test]
    fn test_word_mime_without_extension() {
        let upload = ResumeUpload {
            content_type: Some(WORD_MIMES[0].to_string()),
            ..docx("resume")
        };
        assert!(check_resume_file(Some(&upload), Some(JOB_URL)).is_ok());
    }

    #[test]
    fn test_pdf_rejected_whatever_the_mime() {
        for mime in [None, Some(WORD_MIMES[0]), Some("application/pdf")] {
            let upload = ResumeUpload {
                content_type: mime.map(str::to_string),
                ..docx("resume.pdf")
            };
            assert!(matches!(
                check_resume_file(Some(&upload), Some(JOB_URL)),
                Err(AnalysisError::PdfNotSupported)
            ));
        }
    }

    #[tokio::test]
    async fn test_pdf_rejected_before_text_extraction() {
        let converter = Arc::new(FakeConverter::with_text(RESUME));
        let analyzer = ResumeAnalyzer::new(Arc::new(FakeLlm::replying("{}")), converter.clone());

        let err = analyzer
            .analyze(Some(docx("resume.pdf")), Some(JOB_URL))
            .await
            .unwrap_err();

        assert!(matches!(err, AnalysisError::PdfNotSupported));
        assert!(err.to_string().contains("Word"));
        assert_eq!(converter.text_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_non_json_reply_falls_back_to_scorer() {
        let converter = Arc::new(FakeConverter::with_text(RESUME));
        let analyzer = ResumeAnalyzer::new(
            Arc::new(FakeLlm::replying("I think this candidate is a good fit!")),
            converter.clone(),
        );

        let report = analyzer
            .analyze(Some(docx("cv.docx")), Some(JOB_URL))
            .await
            .unwrap();

        let expected = scorer::score(RESUME, &extract_job_description(JOB_URL));
        assert_eq!(report.result.compatibility, expected);
        assert_eq!(report.result.source, AnalysisSource::Heuristic);
        assert_eq!(report.result.improved_resume_text, RESUME);

        let rendered = converter.rendered.lock().unwrap();
        assert_eq!(rendered[0], (IMPROVED_RESUME_HEADER.to_string(), RESUME.to_string()));
    }

    #[tokio::test]
    async fn test_model_reply_is_used() {
        let reply = r#"```json
{"compatibility": 77, "strengths": ["a"], "weaknesses": ["b"], "suggestions": ["c"],
 "improvedResume": "Improved"}
```"#;
        let analyzer = ResumeAnalyzer::new(
            Arc::new(FakeLlm::replying(reply)),
            Arc::new(FakeConverter::with_text(RESUME)),
        );

        let report = analyzer
            .analyze(Some(docx("cv.docx")), Some(JOB_URL))
            .await
            .unwrap();

        assert_eq!(report.result.source, AnalysisSource::Model);
        assert_eq!(report.result.compatibility.overall, 77);
        assert_eq!(report.result.compatibility.skills, 77);
        assert_eq!(report.improved_resume_docx, "CURRÍCULO MELHORADO\nImproved".as_bytes());
        assert_eq!(
            report.improved_resume_base64(),
            BASE64.encode("CURRÍCULO MELHORADO\nImproved".as_bytes())
        );
    }

    #[tokio::test]
    async fn test_blank_document_text() {
        let analyzer = ResumeAnalyzer::new(
            Arc::new(FakeLlm::replying("{}")),
            Arc::new(FakeConverter::with_text(" \n\t ")),
        );
        let err = analyzer
            .analyze(Some(docx("cv.docx")), Some(JOB_URL))
            .await
            .unwrap_err();
        assert!(matches!(err, AnalysisError::EmptyResume));
    }

    #[tokio::test]
    async fn test_llm_failures_are_hard_errors() {
        let unconfigured = FakeLlm {
            reply: Ok(String::new()),
            configured: false,
        };
        let analyzer = ResumeAnalyzer::new(
            Arc::new(unconfigured),
            Arc::new(FakeConverter::with_text(RESUME)),
        );
        let err = analyzer
            .analyze(Some(docx("cv.docx")), Some(JOB_URL))
            .await
            .unwrap_err();
        assert!(matches!(err, AnalysisError::LlmNotConfigured));

        let failing = FakeLlm {
            reply: Err(anyhow::anyhow!("status 502")),
            configured: true,
        };
        let analyzer = ResumeAnalyzer::new(
            Arc::new(failing),
            Arc::new(FakeConverter::with_text(RESUME)),
        );
        let err = analyzer
            .analyze(Some(docx("cv.docx")), Some(JOB_URL))
            .await
            .unwrap_err();
        assert!(matches!(err, AnalysisError::Llm(_)));
    }
}
