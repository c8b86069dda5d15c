// src/scraper/mod.rs
use serde::{Deserialize, Serialize};

pub mod adapters;
pub mod descriptions;
pub mod job_scraper;
pub mod patterns;
pub mod sanitize;
pub mod validator;

pub use descriptions::extract_job_description;
pub use job_scraper::{JobScraper, JobSource};
pub use validator::is_valid_job_url;

use sanitize::non_empty;

/// Normalized job posting. Every present field is a trimmed, non-empty string.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobInfo {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub salary: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub requirements: Option<Vec<String>>,
}

impl JobInfo {
    /// Trims every field and drops the blank ones.
    pub fn normalized(self) -> Self {
        let requirements = self
            .requirements
            .map(|items| items.into_iter().filter_map(non_empty).collect::<Vec<_>>())
            .filter(|items| !items.is_empty());

        Self {
            company: self.company.and_then(non_empty),
            position: self.position.and_then(non_empty),
            location: self.location.and_then(non_empty),
            description: self.description.and_then(non_empty),
            salary: self.salary.and_then(non_empty),
            requirements,
        }
    }

    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}

/// How much of a [`JobInfo`] came from the posting itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Quality {
    /// Values were read from the fetched page.
    Scraped,
    /// Values were guessed from the URL.
    Inferred,
    /// Fixed stub text or an explanatory placeholder; nothing was read.
    Placeholder,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Extraction {
    pub info: JobInfo,
    pub quality: Quality,
}

impl Extraction {
    pub fn scraped(info: JobInfo) -> Self {
        Self::new(info, Quality::Scraped)
    }

    pub fn inferred(info: JobInfo) -> Self {
        Self::new(info, Quality::Inferred)
    }

    pub fn placeholder(info: JobInfo) -> Self {
        Self::new(info, Quality::Placeholder)
    }

    fn new(info: JobInfo, quality: Quality) -> Self {
        Self {
            info: info.normalized(),
            quality,
        }
    }

    pub fn is_degraded(&self) -> bool {
        self.quality != Quality::Scraped
    }

    pub fn into_info(self) -> JobInfo {
        self.info
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalized_drops_blank_fields() {
        let info = JobInfo {
            company: Some("  Acme  ".to_string()),
            position: Some("".to_string()),
            location: Some(" \t".to_string()),
            description: None,
            salary: Some(" 10k ".to_string()),
            requirements: Some(vec![" ".to_string()]),
        }
        .normalized();

        assert_eq!(info.company.as_deref(), Some("Acme"));
        assert_eq!(info.position, None);
        assert_eq!(info.location, None);
        assert_eq!(info.salary.as_deref(), Some("10k"));
        assert_eq!(info.requirements, None);
    }

    #[test]
    fn test_serialization_omits_absent_fields() {
        let info = JobInfo {
            position: Some("Engineer".to_string()),
            ..Default::default()
        };
        let json = serde_json::to_value(&info).unwrap();
        assert_eq!(json, serde_json::json!({ "position": "Engineer" }));
    }

    #[test]
    fn test_extraction_quality() {
        let extraction = Extraction::placeholder(JobInfo::default());
        assert!(extraction.is_degraded());
        assert!(extraction.into_info().is_empty());
        assert!(!Extraction::scraped(JobInfo::default()).is_degraded());
    }
}
