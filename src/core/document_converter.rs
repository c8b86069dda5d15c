// src/core/document_converter.rs
//! Word document conversion through the external conversion service.

use super::config_manager::ConverterSettings;
use anyhow::{Context, Result};
use reqwest::multipart::{Form, Part};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{error, info, trace};

const EXTRACT_TEXT_ENDPOINT: &str = "/extract-text";
const RENDER_DOCX_ENDPOINT: &str = "/render-docx";

const DOCX_MIME: &str = "application/vnd.openxmlformats-officedocument.wordprocessingml.document";
const DOC_MIME: &str = "application/msword";

#[rocket::async_trait]
pub trait DocumentConverter: Send + Sync {
    /// Plain text of a Word document. Fails on corrupt input.
    async fn to_text(&self, bytes: Vec<u8>, file_name: &str) -> Result<String>;

    /// A `.docx` with `header` as a bold first paragraph followed by `body`.
    async fn to_document(&self, header: &str, body: &str) -> Result<Vec<u8>>;
}

#[derive(Debug, Deserialize)]
struct ExtractTextResponse {
    text: String,
}

#[derive(Debug, Serialize)]
struct RenderRequest<'a> {
    paragraphs: Vec<RenderParagraph<'a>>,
}

#[derive(Debug, Serialize)]
struct RenderParagraph<'a> {
    text: &'a str,
    bold: bool,
    /// Half-points, as Word measures font size.
    size: u32,
}

pub struct ConversionServiceClient {
    client: Client,
    base_url: String,
}

impl ConversionServiceClient {
    pub fn new(settings: &ConverterSettings) -> Result<Self> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(settings.timeout_seconds))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self::with_client(client, settings.base_url.clone()))
    }

    pub fn with_client(client: Client, base_url: String) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    async fn error_body(response: reqwest::Response) -> String {
        response
            .text()
            .await
            .unwrap_or_else(|_| "Unknown error".to_string())
    }
}

#[rocket::async_trait]
impl DocumentConverter for ConversionServiceClient {
    async fn to_text(&self, bytes: Vec<u8>, file_name: &str) -> Result<String> {
        let url = format!("{}{}", self.base_url, EXTRACT_TEXT_ENDPOINT);
        let mime = if file_name.to_lowercase().ends_with(".doc") {
            DOC_MIME
        } else {
            DOCX_MIME
        };

        let form = Form::new().part(
            "file",
            Part::bytes(bytes)
                .file_name(file_name.to_string())
                .mime_str(mime)
                .context("Failed to create multipart")?,
        );

        info!("Calling document text extraction: {}", url);

        let response = self
            .client
            .post(&url)
            .multipart(form)
            .send()
            .await
            .context("Document conversion request failed")?;

        let status = response.status();
        trace!("Response status: {}", status);

        if !status.is_success() {
            let error_text = Self::error_body(response).await;
            error!("Text extraction error response: {}", error_text);
            anyhow::bail!("Conversion service returned error status {}: {}", status, error_text);
        }

        let extracted: ExtractTextResponse = response
            .json()
            .await
            .context("Failed to parse text extraction response")?;
        Ok(extracted.text)
    }

    async fn to_document(&self, header: &str, body: &str) -> Result<Vec<u8>> {
        let url = format!("{}{}", self.base_url, RENDER_DOCX_ENDPOINT);
        let request = RenderRequest {
            paragraphs: vec![
                RenderParagraph {
                    text: header,
                    bold: true,
                    size: 24,
                },
                RenderParagraph {
                    text: body,
                    bold: false,
                    size: 20,
                },
            ],
        };

        info!("Calling document rendering: {}", url);

        let response = self
            .client
            .post(&url)
            .json(&request)
            .send()
            .await
            .context("Document rendering request failed")?;

        let status = response.status();
        if !status.is_success() {
            let error_text = Self::error_body(response).await;
            error!("Rendering error response: {}", error_text);
            anyhow::bail!("Conversion service returned error status {}: {}", status, error_text);
        }

        let bytes = response
            .bytes()
            .await
            .context("Failed to read rendered document")?;
        Ok(bytes.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_trailing_slash() {
        let converter = ConversionServiceClient::with_client(
            Client::new(),
            "http://converter:5555/".to_string(),
        );
        assert_eq!(converter.base_url, "http://converter:5555");
    }

    #[test]
    fn test_render_request_shape() {
        let request = RenderRequest {
            paragraphs: vec![RenderParagraph {
                text: "CURRÍCULO MELHORADO",
                bold: true,
                size: 24,
            }],
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["paragraphs"][0]["bold"], true);
        assert_eq!(json["paragraphs"][0]["text"], "CURRÍCULO MELHORADO");
    }

    #[tokio::test]
    async fn test_unreachable_service_is_an_error() {
        let converter = ConversionServiceClient::with_client(
            Client::builder().no_proxy().build().unwrap(),
            "http://127.0.0.1:9".to_string(),
        );
        assert!(converter.to_text(vec![1, 2, 3], "cv.docx").await.is_err());
    }
}
