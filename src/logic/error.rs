//! Error Taxonomy - lỗi có phân loại cho từng engine
//!
//! Mỗi operation trả về đúng nhóm lỗi của nó. Lớp api chuyển về String
//! cho caller, phần kind luôn đứng đầu message để route được.

use thiserror::Error;

use super::pipeline::Stage;

/// Metadata validation failures (no content is read at this point)
#[derive(Debug, Clone, Error)]
pub enum ValidationError {
    #[error("unsupported format: '{name}' is not a .csv dataset")]
    UnsupportedFormat { name: String },

    #[error("file too large: {size_bytes} bytes exceeds the {limit_bytes} byte upload ceiling")]
    TooLarge { size_bytes: u64, limit_bytes: u64 },
}

/// Preview parsing failures
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("empty dataset: no header row found")]
    Empty,

    #[error("malformed input: {0}")]
    MalformedInput(String),

    #[error("could not read dataset: {0}")]
    Io(#[from] std::io::Error),
}

/// Pipeline lifecycle failures
#[derive(Debug, Clone, Error, serde::Serialize)]
pub enum PipelineError {
    #[error("no input: select and parse a dataset before starting analysis")]
    NoInput,

    #[error("already complete: a pipeline instance runs exactly once, build a new one")]
    AlreadyComplete,

    #[error("timeout: deadline exceeded before stage '{stage}' finished")]
    Timeout { stage: Stage },

    #[error("cancelled: analysis was stopped before completion")]
    Cancelled,

    #[error("stage '{stage}' failed: {message}")]
    StageFailed { stage: Stage, message: String },
}

/// History store failures
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

impl From<std::io::Error> for StoreError {
    fn from(e: std::io::Error) -> Self {
        StoreError::Unavailable(e.to_string())
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(e: serde_json::Error) -> Self {
        StoreError::Unavailable(e.to_string())
    }
}

/// Export boundary failures
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("could not serialize result: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("could not write export file: {0}")]
    Io(#[from] std::io::Error),
}
