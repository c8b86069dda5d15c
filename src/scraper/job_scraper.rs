// src/scraper/job_scraper.rs
use super::adapters::{generic, linkedin, stub};
use super::{Extraction, JobInfo};
use crate::core::config_manager::ScraperSettings;
use anyhow::{Context, Result};
use reqwest::{Client, Url};
use serde::Serialize;
use std::time::Duration;
use tracing::{info, instrument, Span};

/// Job boards with a dedicated extraction strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum JobSource {
    LinkedIn,
    Indeed,
    Glassdoor,
    Generic,
}

impl JobSource {
    /// Checked in order LinkedIn, Indeed, Glassdoor; anything else, including
    /// an unparseable URL, is Generic.
    pub fn classify(url: &str) -> Self {
        let host = Url::parse(url)
            .ok()
            .and_then(|parsed| parsed.host_str().map(str::to_lowercase))
            .unwrap_or_default();

        if host.contains("linkedin.com") {
            Self::LinkedIn
        } else if host.contains("indeed.com") {
            Self::Indeed
        } else if host.contains("glassdoor.com") {
            Self::Glassdoor
        } else {
            Self::Generic
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::LinkedIn => "linkedin",
            Self::Indeed => "indeed",
            Self::Glassdoor => "glassdoor",
            Self::Generic => "generic",
        }
    }
}

pub struct JobScraper {
    client: Client,
    user_agent: String,
}

impl JobScraper {
    pub fn new(settings: &ScraperSettings) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(settings.timeout_seconds))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            user_agent: settings.user_agent.clone(),
        })
    }

    /// Best-effort extraction. Never fails: adapter problems surface as
    /// placeholder records, distinguishable through [`Extraction::quality`].
    #[instrument(skip(self), fields(source = tracing::field::Empty))]
    pub async fn extract(&self, url: &str) -> Extraction {
        let source = JobSource::classify(url);
        Span::current().record("source", source.name());

        let extraction = match source {
            JobSource::LinkedIn => linkedin::extract(&self.client, &self.user_agent, url).await,
            JobSource::Indeed => stub::indeed(),
            JobSource::Glassdoor => stub::glassdoor(),
            JobSource::Generic => generic::extract(url),
        };

        info!("Extraction finished with quality {:?}", extraction.quality);
        extraction
    }

    pub async fn extract_job_info(&self, url: &str) -> JobInfo {
        self.extract(url).await.into_info()
    }
}
