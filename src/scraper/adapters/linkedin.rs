// src/scraper/adapters/linkedin.rs
use super::UNKNOWN_COMPANY;
use crate::scraper::patterns::{first_match, ExtractionPattern, Field, PageDocument};
use crate::scraper::sanitize::{clean, non_empty};
use crate::scraper::{Extraction, JobInfo};
use anyhow::{Context, Result};
use once_cell::sync::Lazy;
use regex::Regex;
use reqwest::header::{ACCEPT, ACCEPT_LANGUAGE, USER_AGENT};
use reqwest::Client;
use tracing::{debug, info, warn};

pub const UNKNOWN_LOCATION: &str = "Localização não identificada";
pub const CLOSED_POSITION: &str = "Vaga Fechada - LinkedIn";
pub const UNKNOWN_POSITION: &str = "Vaga do LinkedIn";

pub const CLOSED_NOTE: &str =
    "Esta vaga não está mais aceitando candidaturas. As informações podem estar incompletas.";
pub const NOT_FOUND_NOTE: &str =
    "Informações não disponíveis automaticamente. Por favor, preencha manualmente.";
pub const FETCH_FAILED_NOTE: &str =
    "Não foi possível extrair informações automaticamente. Por favor, preencha manualmente.";

const CLOSED_MARKERS: [&str; 3] = [
    "No longer accepting applications",
    "This job is no longer accepting applications",
    "Vaga não está mais aceitando candidaturas",
];

static TITLE_RULES: Lazy<Vec<ExtractionPattern>> =
    Lazy::new(|| vec![ExtractionPattern::markup(Field::Position, r"(?i)<title[^>]*>([^<]+)</title>")]);

static COMPANY_RULES: Lazy<Vec<ExtractionPattern>> = Lazy::new(|| {
    vec![
        ExtractionPattern::json_field(Field::Company, "companyName"),
        ExtractionPattern::json_ld(Field::Company, &["hiringOrganization", "name"]),
        ExtractionPattern::markup(Field::Company, r#"(?i)<span[^>]*class="[^"]*company[^"]*"[^>]*>([^<]+)</span>"#),
        ExtractionPattern::markup(Field::Company, r#"(?i)<div[^>]*class="[^"]*company[^"]*"[^>]*>([^<]+)</div>"#),
        ExtractionPattern::markup(Field::Company, r#"(?i)<a[^>]*class="[^"]*company[^"]*"[^>]*>([^<]+)</a>"#),
        ExtractionPattern::markup(Field::Company, r#"(?i)<span[^>]*class="[^"]*job-details-jobs-unified-top-card__company-name[^"]*"[^>]*>([^<]+)</span>"#),
        ExtractionPattern::markup(Field::Company, r#"(?i)<span[^>]*class="[^"]*jobs-unified-top-card__company-name[^"]*"[^>]*>([^<]+)</span>"#),
        ExtractionPattern::markup(Field::Company, r#"(?i)<a[^>]*class="[^"]*jobs-unified-top-card__company-name[^"]*"[^>]*>([^<]+)</a>"#),
        ExtractionPattern::markup(Field::Company, r#"(?i)<div[^>]*class="[^"]*jobs-unified-top-card__company-name[^"]*"[^>]*>([^<]+)</div>"#),
    ]
});

static LOCATION_RULES: Lazy<Vec<ExtractionPattern>> = Lazy::new(|| {
    vec![
        ExtractionPattern::json_ld(Field::Location, &["jobLocation", "address", "addressLocality"]),
        ExtractionPattern::markup(Field::Location, r#""jobLocation":\s*\{\s*"addressLocality":\s*"([^"]+)""#),
        ExtractionPattern::markup(Field::Location, r#"(?i)<span[^>]*class="[^"]*location[^"]*"[^>]*>([^<]+)</span>"#),
        ExtractionPattern::markup(Field::Location, r#"(?i)<div[^>]*class="[^"]*location[^"]*"[^>]*>([^<]+)</div>"#),
        ExtractionPattern::markup(Field::Location, r#"(?i)<span[^>]*class="[^"]*jobs-unified-top-card__bullet[^"]*"[^>]*>([^<]+)</span>"#),
        ExtractionPattern::markup(Field::Location, r#"(?i)<span[^>]*class="[^"]*jobs-unified-top-card__location[^"]*"[^>]*>([^<]+)</span>"#),
    ]
});

static DESCRIPTION_RULES: Lazy<Vec<ExtractionPattern>> = Lazy::new(|| {
    vec![
        ExtractionPattern::json_field(Field::Description, "description"),
        ExtractionPattern::markup(Field::Description, r#"(?i)<div[^>]*class="[^"]*description[^"]*"[^>]*>([\s\S]*?)</div>"#),
        ExtractionPattern::markup(Field::Description, r#"(?i)<section[^>]*class="[^"]*description[^"]*"[^>]*>([\s\S]*?)</section>"#),
        ExtractionPattern::markup(Field::Description, r#"(?i)<div[^>]*class="[^"]*show-more-less-html[^"]*"[^>]*>([\s\S]*?)</div>"#),
        ExtractionPattern::markup(Field::Description, r#"(?i)<div[^>]*class="[^"]*jobs-box__html-content[^"]*"[^>]*>([\s\S]*?)</div>"#),
    ]
});

static TITLE_SUFFIX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s*\|\s*LinkedIn").expect("valid title suffix regex"));
static HIRING_TITLE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^(.+?)\s+hiring\s+(.+?)\s+in\s+(.+)$").expect("valid hiring title regex")
});
static KEY_RESPONSIBILITIES: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)key responsibilities\s*").expect("valid section regex"));
static ABOUT_YOU: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)about you\s*").expect("valid section regex"));
static ABOUT_THE_COMPANY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)about the company").expect("valid section regex"));

/// Fetches a LinkedIn posting and parses it. Fetch failures become a placeholder.
pub async fn extract(client: &Client, user_agent: &str, url: &str) -> Extraction {
    match fetch(client, user_agent, url).await {
        Ok(html) => parse(&html),
        Err(e) => {
            warn!("LinkedIn extraction failed for {}: {:#}", url, e);
            Extraction::placeholder(unavailable(UNKNOWN_POSITION, FETCH_FAILED_NOTE))
        }
    }
}

async fn fetch(client: &Client, user_agent: &str, url: &str) -> Result<String> {
    let response = client
        .get(url)
        .header(USER_AGENT, user_agent)
        .header(
            ACCEPT,
            "text/html,application/xhtml+xml,application/xml;q=0.9,image/webp,*/*;q=0.8",
        )
        .header(ACCEPT_LANGUAGE, "en-US,en;q=0.5")
        .header("Upgrade-Insecure-Requests", "1")
        .send()
        .await
        .context("Failed to fetch LinkedIn posting")?;

    if !response.status().is_success() {
        anyhow::bail!("HTTP error: {}", response.status());
    }

    let html = response
        .text()
        .await
        .context("Failed to read response body")?;
    debug!("Fetched {} bytes of LinkedIn markup", html.len());
    Ok(html)
}

/// Parses fetched LinkedIn markup.
///
/// Title-derived fields are applied first; company and location rules then
/// override them when they match. Position only ever comes from the title.
pub fn parse(html: &str) -> Extraction {
    if CLOSED_MARKERS.iter().any(|marker| html.contains(marker)) {
        info!("LinkedIn posting is closed");
        return Extraction::placeholder(unavailable(CLOSED_POSITION, CLOSED_NOTE));
    }

    let document = PageDocument::parse(html);
    let mut job = JobInfo::default();

    if let Some(title) = first_match(&document, &TITLE_RULES) {
        apply_title(&mut job, &title);
    }

    if let Some(company) = first_match(&document, &COMPANY_RULES).and_then(|c| non_empty(clean(&c))) {
        job.company = Some(company);
    }

    if let Some(location) = first_match(&document, &LOCATION_RULES).and_then(|l| non_empty(clean(&l))) {
        job.location = Some(location);
    }

    job.description = first_match(&document, &DESCRIPTION_RULES)
        .map(|raw| focus_sections(&clean(&raw)))
        .and_then(non_empty);

    if job.position.is_none() && job.company.is_none() {
        info!("No company or position found in LinkedIn markup");
        return Extraction::placeholder(unavailable(UNKNOWN_POSITION, NOT_FOUND_NOTE));
    }

    info!(
        "Extracted LinkedIn job: {:?} at {:?}",
        job.position.as_deref(),
        job.company.as_deref()
    );
    Extraction::scraped(job)
}

/// Splits `"<Company> hiring <Position> in <Location>"`; otherwise the whole
/// title is the position.
fn apply_title(job: &mut JobInfo, raw_title: &str) {
    let title = clean(&TITLE_SUFFIX.replace(raw_title, ""));

    match HIRING_TITLE.captures(&title) {
        Some(caps) => {
            job.company = non_empty(&caps[1]);
            job.position = non_empty(&caps[2]);
            job.location = non_empty(&caps[3]);
        }
        None => job.position = non_empty(&title),
    }
}

/// Keeps only the "Key Responsibilities" and "About You" sections when present.
fn focus_sections(description: &str) -> String {
    let mut sections = Vec::new();

    if let Some(body) = section_after(description, &KEY_RESPONSIBILITIES, &ABOUT_YOU) {
        sections.push(format!("Key Responsibilities\n{body}"));
    }
    if let Some(body) = section_after(description, &ABOUT_YOU, &ABOUT_THE_COMPANY) {
        sections.push(format!("About You\n{body}"));
    }

    if sections.is_empty() {
        description.to_string()
    } else {
        sections.join("\n\n")
    }
}

fn section_after<'a>(text: &'a str, heading: &Regex, next_heading: &Regex) -> Option<&'a str> {
    let start = heading.find(text)?.end();
    let rest = &text[start..];
    let end = next_heading.find(rest).map_or(rest.len(), |m| m.start());
    Some(rest[..end].trim())
}

fn unavailable(position: &str, note: &str) -> JobInfo {
    JobInfo {
        company: Some(UNKNOWN_COMPANY.to_string()),
        position: Some(position.to_string()),
        location: Some(UNKNOWN_LOCATION.to_string()),
        description: Some(note.to_string()),
        ..Default::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scraper::Quality;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    #[test]
    fn test_closed_posting_wins_over_everything() {
        let html = r#"<title>Acme hiring Rust Engineer in Porto | LinkedIn</title>
            <script>{"companyName":"Acme"}</script>
            <p>No longer accepting applications</p>"#;
        let extraction = parse(html);

        assert_eq!(extraction.quality, Quality::Placeholder);
        assert_eq!(extraction.info.position.as_deref(), Some(CLOSED_POSITION));
        assert_eq!(extraction.info.company.as_deref(), Some(UNKNOWN_COMPANY));
        assert_eq!(extraction.info.description.as_deref(), Some(CLOSED_NOTE));
    }

    #[test]
    fn test_closed_posting_portuguese_marker() {
        let extraction = parse("<div>Vaga não está mais aceitando candidaturas</div>");
        assert_eq!(extraction.info.position.as_deref(), Some(CLOSED_POSITION));
    }

    #[test]
    fn test_hiring_title_split() {
        let extraction = parse("<title>Acme Corp hiring Senior Rust Engineer in Lisbon, Portugal | LinkedIn</title>");

        assert_eq!(extraction.quality, Quality::Scraped);
        assert_eq!(extraction.info.company.as_deref(), Some("Acme Corp"));
        assert_eq!(extraction.info.position.as_deref(), Some("Senior Rust Engineer"));
        assert_eq!(extraction.info.location.as_deref(), Some("Lisbon, Portugal"));
    }

    #[test]
    fn test_unsplittable_title_is_position_only() {
        let extraction = parse("<title>Platform Engineer &amp; SRE | LinkedIn</title>");

        assert_eq!(extraction.info.position.as_deref(), Some("Platform Engineer & SRE"));
        assert_eq!(extraction.info.company, None);
        assert_eq!(extraction.info.location, None);
    }

    #[test]
    fn test_json_company_beats_css_company() {
        let html = r#"<html><script>{"companyName":"Acme"}</script>
            <span class="company">Other</span></html>"#;
        let extraction = parse(html);

        assert_eq!(extraction.info.company.as_deref(), Some("Acme"));
    }

    #[test]
    fn test_company_and_location_rules_override_title() {
        let html = r#"<title>Initech hiring Backend Developer in Remote | LinkedIn</title>
            <span class="topcard__company-name">Initrode</span>
            <span class="topcard__location">São Paulo, SP</span>"#;
        let extraction = parse(html);

        assert_eq!(extraction.info.company.as_deref(), Some("Initrode"));
        assert_eq!(extraction.info.position.as_deref(), Some("Backend Developer"));
        assert_eq!(extraction.info.location.as_deref(), Some("São Paulo, SP"));
    }

    #[test]
    fn test_json_ld_company_and_location() {
        let html = r#"<title>Data Engineer</title>
            <script type="application/ld+json">{"@type":"JobPosting",
              "hiringOrganization":{"@type":"Organization","name":"Globex"},
              "jobLocation":{"@type":"Place","address":{"addressLocality":"Recife"}}}</script>"#;
        let extraction = parse(html);

        assert_eq!(extraction.info.company.as_deref(), Some("Globex"));
        assert_eq!(extraction.info.location.as_deref(), Some("Recife"));
        assert_eq!(extraction.info.position.as_deref(), Some("Data Engineer"));
    }

    #[test]
    fn test_description_keeps_focused_sections() {
        let html = r#"<title>Acme hiring Engineer in Porto</title>
            <div class="show-more-less-html__markup">
              <p>We are Acme.</p>
              <strong>Key Responsibilities</strong>
              <ul>
                <li>Ship services</li>
                <li>Review code</li>
              </ul>
              <strong>About You</strong>
              <p>You like Rust.</p>
              <strong>About the Company</strong>
              <p>Founded 1999.</p>
            </div>"#;
        let extraction = parse(html);

        assert_eq!(
            extraction.info.description.as_deref(),
            Some("Key Responsibilities\nShip services Review code\n\nAbout You\nYou like Rust.")
        );
    }

    #[test]
    fn test_description_without_sections_is_kept_whole() {
        let html = r#"<title>Engineer</title>
            <div class="jobs-description__content"><p>Build&nbsp;things</p> <p>with us</p></div>"#;
        let extraction = parse(html);

        assert_eq!(extraction.info.description.as_deref(), Some("Build things with us"));
    }

    #[test]
    fn test_nothing_found_is_placeholder() {
        let extraction = parse("<html><body><p>Sign in to continue</p></body></html>");

        assert_eq!(extraction.quality, Quality::Placeholder);
        assert_eq!(extraction.info.position.as_deref(), Some(UNKNOWN_POSITION));
        assert_eq!(extraction.info.description.as_deref(), Some(NOT_FOUND_NOTE));
    }

    async fn serve_once(status_line: &'static str, body: &'static str) -> (String, tokio::task::JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let handle = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut buf = vec![0u8; 8192];
            let n = socket.read(&mut buf).await.unwrap();
            let request = String::from_utf8_lossy(&buf[..n]).to_string();
            let response = format!(
                "{status_line}\r\nContent-Type: text/html\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                body.len()
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            request
        });
        (format!("http://{addr}/jobs/view/42"), handle)
    }

    fn test_client() -> Client {
        Client::builder().no_proxy().build().unwrap()
    }

    #[tokio::test]
    async fn test_extract_sends_browser_user_agent() {
        let (url, server) = serve_once(
            "HTTP/1.1 200 OK",
            "<title>Acme hiring Engineer in Porto | LinkedIn</title>",
        )
        .await;

        let extraction = extract(&test_client(), "Mozilla/5.0 (test)", &url).await;
        let request = server.await.unwrap().to_lowercase();

        assert!(request.contains("user-agent: mozilla/5.0 (test)"));
        assert_eq!(extraction.info.company.as_deref(), Some("Acme"));
    }

    #[tokio::test]
    async fn test_extract_http_error_is_placeholder() {
        let (url, server) = serve_once("HTTP/1.1 503 Service Unavailable", "busy").await;

        let extraction = extract(&test_client(), "Mozilla/5.0", &url).await;
        server.await.unwrap();

        assert_eq!(extraction.quality, Quality::Placeholder);
        assert_eq!(extraction.info.description.as_deref(), Some(FETCH_FAILED_NOTE));
    }
}
