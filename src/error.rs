//! Error types and handling for the redaction library
//! Created: 2025-06-03 11:31:05 UTC
//! Author: kartik4905

use std::{io, result::Result as StdResult};

use thiserror::Error;
use tokio::sync::TryAcquireError;

/// Custom result type for redaction operations
pub type Result<T> = StdResult<T, Error>;

/// Message shown to the user when a document cannot be decoded
pub const DECODE_ALERT: &str = "Error processing file. Please ensure it is a valid PDF.";

/// Core error type for redaction operations
#[derive(Error, Debug)]
#[non_exhaustive]
#[allow(clippy::enum_variant_names)]
pub enum Error {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Document decode error: {0}")]
    DecodeError(#[from] DecodeError),

    #[error("Render error: {0}")]
    RenderError(#[from] RenderError),

    #[error("Surface error: {0}")]
    SurfaceError(#[from] SurfaceError),

    #[error("Export error: {0}")]
    ExportError(#[from] ExportError),

    #[error("Oracle error: {0}")]
    OracleError(#[from] OracleError),

    #[error("A redaction is already in progress")]
    Busy,

    #[error("I/O error: {0}")]
    IoError(#[from] io::Error),
}

impl Error {
    /// Only decode failures are surfaced to the user; everything else is
    /// either recovered locally or treated as an internal failure.
    pub fn is_user_visible(&self) -> bool {
        matches!(self, Error::DecodeError(_))
    }
}

impl From<TryAcquireError> for Error {
    fn from(_: TryAcquireError) -> Self {
        Error::Busy
    }
}

// -------------------- Sub-Error Categories --------------------

#[derive(Error, Debug)]
#[non_exhaustive]
pub enum DecodeError {
    #[error("Input is empty")]
    Empty,

    #[error("Malformed PDF: {0}")]
    Malformed(String),

    #[error("Page {0} is out of range")]
    PageOutOfRange(u32),

    #[error("Page {page} could not be rendered: {reason}")]
    PageUnrenderable { page: u32, reason: String },
}

#[derive(Error, Debug)]
#[non_exhaustive]
pub enum RenderError {
    #[error("Renderer not available: {0}")]
    BackendNotAvailable(String),

    #[error("Rendered image could not be read: {0}")]
    Image(String),
}

#[derive(Error, Debug)]
#[non_exhaustive]
pub enum SurfaceError {
    #[error("Drawing context unavailable for a {width}x{height} surface")]
    ContextUnavailable { width: u32, height: u32 },
}

#[derive(Error, Debug)]
#[non_exhaustive]
pub enum ExportError {
    #[error("Nothing to export")]
    NoPages,

    #[error("Image encoding failed: {0}")]
    Encoding(String),

    #[error("Document assembly failed: {0}")]
    Assembly(String),
}

#[derive(Error, Debug)]
#[non_exhaustive]
pub enum OracleError {
    #[error("API key not configured")]
    MissingApiKey,

    #[error("Request failed: {0}")]
    Transport(String),

    #[error("API error ({status}): {body}")]
    Status { status: u16, body: String },

    #[error("Response had no candidate text")]
    EmptyResponse,

    #[error("Response was not a JSON array of strings: {0}")]
    MalformedResponse(String),
}
