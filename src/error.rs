//! Error handling for the resume skills engine

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ResumeSkillsError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("PDF extraction error: {0}")]
    PdfExtraction(String),

    #[error("DOCX extraction error: {0}")]
    DocxExtraction(String),

    #[error("Text processing error: {0}")]
    TextProcessing(String),

    #[error("Embedding generation error: {0}")]
    Embedding(String),

    #[error("Inference server error (status {status}): {message}")]
    InferenceServer { status: u16, message: String },

    #[error("Inference request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Malformed model output: {0}")]
    MalformedModelOutput(String),

    #[error("Model loading error: {0}")]
    ModelLoading(String),

    #[error("Model error: {0}")]
    ModelError(String),

    #[error("Catalog error: {0}")]
    Catalog(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("File format not supported: {0}")]
    UnsupportedFormat(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Model not found: {0}")]
    ModelNotFound(String),
}

pub type Result<T> = std::result::Result<T, ResumeSkillsError>;

/// Convert anyhow errors to our custom error type
impl From<anyhow::Error> for ResumeSkillsError {
    fn from(err: anyhow::Error) -> Self {
        ResumeSkillsError::ModelError(err.to_string())
    }
}

/// Convert candle core errors to our custom error type
impl From<candle_core::Error> for ResumeSkillsError {
    fn from(err: candle_core::Error) -> Self {
        ResumeSkillsError::ModelError(err.to_string())
    }
}
