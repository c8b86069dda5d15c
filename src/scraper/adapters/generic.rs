// src/scraper/adapters/generic.rs
//! Fallback for boards without a dedicated adapter: no fetch, the URL path is
//! the only signal (`.../<company>/<position>`).

use super::UNKNOWN_COMPANY;
use crate::scraper::sanitize::non_empty;
use crate::scraper::{Extraction, JobInfo};
use reqwest::Url;
use tracing::warn;

pub const UNKNOWN_POSITION: &str = "Cargo não identificado";
pub const NO_DESCRIPTION: &str = "Descrição não disponível automaticamente.";

pub fn extract(url: &str) -> Extraction {
    let parsed = match Url::parse(url) {
        Ok(parsed) => parsed,
        Err(e) => {
            warn!("Cannot infer job details from invalid URL {:?}: {}", url, e);
            return Extraction::placeholder(JobInfo::default());
        }
    };

    let segments: Vec<&str> = parsed
        .path_segments()
        .map(|segments| segments.filter(|s| !s.is_empty()).collect())
        .unwrap_or_default();

    let position = segments.last().and_then(|s| non_empty(humanize(s)));
    let company = segments
        .len()
        .checked_sub(2)
        .and_then(|i| non_empty(humanize(segments[i])));

    Extraction::inferred(JobInfo {
        company: Some(company.unwrap_or_else(|| UNKNOWN_COMPANY.to_string())),
        position: Some(position.unwrap_or_else(|| UNKNOWN_POSITION.to_string())),
        description: Some(NO_DESCRIPTION.to_string()),
        ..Default::default()
    })
}

/// `senior-backend-engineer` -> `Senior Backend Engineer`
fn humanize(segment: &str) -> String {
    let mut at_word_start = true;

    segment
        .replace('-', " ")
        .chars()
        .map(|c| {
            let is_word = c.is_alphanumeric() || c == '_';
            let out = if is_word && at_word_start {
                c.to_uppercase().collect::<String>()
            } else {
                c.to_string()
            };
            at_word_start = !is_word;
            out
        })
        .collect()
}
