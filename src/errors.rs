// ABOUTME: Error types for the prompt2pptx application
// ABOUTME: Provides structured error handling for each stage of the pipeline

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Prompt2PptxError {
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Network request failed: {0}")]
    NetworkError(#[from] reqwest::Error),

    #[error("Request to {url} failed with HTTP {status}: {body}")]
    HttpStatusError {
        url: String,
        status: u16,
        body: String,
    },

    #[error("Failed to convert PPTX to images (HTTP {status}): {body}")]
    ConversionError { status: u16, body: String },

    #[error("Failed to parse JSON: {0}")]
    ParseError(String),

    #[error("Invalid presentation node at {path}: {message}")]
    ValidationError { path: String, message: String },

    #[error("Model returned an unusable response: {0}")]
    ModelError(String),

    #[error("Presentation builder failed: {0}")]
    BuilderError(String),

    #[error("Archive error: {0}")]
    ArchiveError(String),

    #[error("Image decoding error: {0}")]
    ImageError(String),

    #[error("No slide images found in {0}")]
    NoSlidesFoundError(String),

    #[error("Path not found: {0}")]
    PathNotFoundError(PathBuf),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

impl Prompt2PptxError {
    pub(crate) fn validation(path: impl Into<String>, message: impl Into<String>) -> Self {
        Prompt2PptxError::ValidationError {
            path: path.into(),
            message: message.into(),
        }
    }
}

// Implement conversion from zip errors
impl From<zip::result::ZipError> for Prompt2PptxError {
    fn from(err: zip::result::ZipError) -> Self {
        Prompt2PptxError::ArchiveError(format!("ZIP operation failed: {}", err))
    }
}

impl From<image::ImageError> for Prompt2PptxError {
    fn from(err: image::ImageError) -> Self {
        Prompt2PptxError::ImageError(err.to_string())
    }
}

impl From<url::ParseError> for Prompt2PptxError {
    fn from(err: url::ParseError) -> Self {
        Prompt2PptxError::ConfigError(format!("Invalid URL: {}", err))
    }
}

pub type Result<T> = std::result::Result<T, Prompt2PptxError>;
