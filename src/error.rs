use std::path::PathBuf;

use serde_json::Value;
use thiserror::Error;

use crate::extract::ExtractMethod;

/// Errors that abort loading a capture. Everything past the load degrades
/// into [`crate::builder::BuildIssue`]s instead.
#[derive(Debug, Error)]
pub enum CaptureError {
    #[error("capture file not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed capture: {0}")]
    MalformedCapture(String),
}

impl From<serde_json::Error> for CaptureError {
    fn from(e: serde_json::Error) -> Self {
        if e.is_io() {
            return CaptureError::Io(e.into());
        }
        CaptureError::MalformedCapture(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, CaptureError>;

/// A field payload that could not be coerced to its declared type. The
/// destination field keeps its zero value.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("field `{source_field}` could not be read as {method:?}: {raw}")]
pub struct FieldError {
    pub source_field: &'static str,
    pub method: ExtractMethod,
    pub raw: Value,
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum BlobDecodeError {
    #[error("blob is empty")]
    Empty,

    #[error("invalid hex: {0}")]
    InvalidHex(#[from] hex::FromHexError),

    #[error("codec rejected blob: {0}")]
    Rejected(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("unsupported goal type: {code}")]
pub struct UnknownGoalType {
    pub code: u8,
}
