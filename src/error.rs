use thiserror::Error;

#[derive(Error, Debug)]
pub enum EpisubError {
    #[error("Invalid timecode: {0}")]
    InvalidTimecode(String),

    #[error("Chapter synthesis failed: {0}")]
    Chapters(String),

    #[error("Unsupported subtitle format: {0}")]
    UnsupportedFormat(String),

    #[error("File not found: {0}")]
    FileNotFound(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, EpisubError>;
