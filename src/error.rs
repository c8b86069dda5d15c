//! Failures of the résumé analysis flow that are reported to the caller.
//!
//! Job extraction never produces these: it degrades to placeholder data.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum AnalysisError {
    #[error("Currículo e URL da vaga são obrigatórios")]
    MissingInput,

    #[error(
        "Arquivo muito grande ({size} bytes). Tamanho máximo permitido: {}MB",
        .limit / (1024 * 1024)
    )]
    FileTooLarge { size: u64, limit: u64 },

    #[error(
        "Processamento de PDF temporariamente indisponível. Por favor, converta seu PDF para \
         Word (.docx) antes de fazer upload."
    )]
    PdfNotSupported,

    #[error("Formato de arquivo não suportado: {0}. Use Word (.doc, .docx).")]
    UnsupportedFormat(String),

    #[error("Erro ao processar arquivo Word: {0}")]
    UnreadableDocument(#[source] anyhow::Error),

    #[error("Não foi possível extrair texto do arquivo. Verifique se o arquivo contém texto.")]
    EmptyResume,

    #[error("OPENROUTER_API_KEY não configurada")]
    LlmNotConfigured,

    #[error("Erro na API do modelo de linguagem: {0}")]
    Llm(#[source] anyhow::Error),

    #[error("Erro ao gerar o currículo melhorado: {0}")]
    Rendering(#[source] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, AnalysisError>;

impl AnalysisError {
    pub fn code(&self) -> &'static str {
        match self {
            Self::MissingInput => "MISSING_INPUT",
            Self::FileTooLarge { .. } => "FILE_TOO_LARGE",
            Self::PdfNotSupported => "PDF_NOT_SUPPORTED",
            Self::UnsupportedFormat(_) => "UNSUPPORTED_FORMAT",
            Self::UnreadableDocument(_) => "UNREADABLE_DOCUMENT",
            Self::EmptyResume => "EMPTY_RESUME",
            Self::LlmNotConfigured => "LLM_NOT_CONFIGURED",
            Self::Llm(_) => "LLM_ERROR",
            Self::Rendering(_) => "RENDERING_ERROR",
        }
    }

    /// Problems with the upload itself; everything else is on our side.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            Self::MissingInput
                | Self::FileTooLarge { .. }
                | Self::PdfNotSupported
                | Self::UnsupportedFormat(_)
                | Self::UnreadableDocument(_)
                | Self::EmptyResume
        )
    }

    pub fn suggestions(&self) -> Vec<String> {
        let items: &[&str] = match self {
            Self::MissingInput => &[
                "Send the résumé as the 'resume' form field",
                "Send the posting address as the 'jobUrl' form field",
            ],
            Self::FileTooLarge { .. } => &[
                "Upload a file of at most 10MB",
                "Remove embedded images from the document",
            ],
            Self::PdfNotSupported => &[
                "Convert the PDF to Word (.docx) with Google Docs or Microsoft Word Online",
                "Upload the converted .docx file",
            ],
            Self::UnsupportedFormat(_) => &["Upload a .doc or .docx file"],
            Self::UnreadableDocument(_) => &[
                "Check that the file is not corrupted",
                "Save the document again as .docx and retry",
            ],
            Self::EmptyResume => &["Make sure the document contains text, not only images"],
            Self::LlmNotConfigured => &["Set OPENROUTER_API_KEY or llm.api_key in config.yaml"],
            Self::Llm(_) => &["Retry in a few moments", "Check the language model service status"],
            Self::Rendering(_) => &["Check that the document conversion service is running"],
        };
        items.iter().map(|s| s.to_string()).collect()
    }
}
