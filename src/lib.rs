//! Job-posting extraction and résumé-to-posting compatibility analysis.

pub mod analysis;
pub mod core;
pub mod error;
pub mod scraper;
pub mod utils;
pub mod web;

pub use analysis::{AnalysisResult, CompatibilityBreakdown};
pub use error::AnalysisError;
pub use scraper::{is_valid_job_url, JobInfo, JobScraper};
pub use web::{build_rocket, start_web_server, AppState};
