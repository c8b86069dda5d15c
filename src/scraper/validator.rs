// src/scraper/validator.rs
use reqwest::Url;

/// Hosts accepted as job boards. Matching is by substring of the host, so
/// subdomains such as `br.linkedin.com` are accepted too.
pub const VALID_JOB_DOMAINS: [&str; 8] = [
    "linkedin.com",
    "indeed.com",
    "glassdoor.com",
    "jobs.google.com",
    "github.com",
    "stackoverflow.com",
    "remoteok.com",
    "weworkremotely.com",
];

/// True when `url` parses and its host belongs to a known job board.
pub fn is_valid_job_url(url: &str) -> bool {
    Url::parse(url.trim())
        .ok()
        .and_then(|parsed| parsed.host_str().map(str::to_lowercase))
        .is_some_and(|host| VALID_JOB_DOMAINS.iter().any(|domain| host.contains(domain)))
}
